//! Constraint Tree
//!
//! Correctness constraints of a rule. Leaves are value and arithmetic
//! constraints and predicates; internal nodes are logical connectives.

use super::method::MethodSignature;
use super::predicate::Predicate;
use crate::shared::constants::rule_names::TRANSFORMATION_DELIMITER;
use crate::shared::models::ConstValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Positional splitter for composite string values
///
/// `"AES/CBC/PKCS5Padding"` split at `/`, index 1 → `"CBC"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Splitter {
    pub index: usize,
    pub delimiter: String,
}

impl Splitter {
    pub fn new(index: usize, delimiter: impl Into<String>) -> Self {
        Self {
            index,
            delimiter: delimiter.into(),
        }
    }

    /// Part at `index`, trimmed; `None` if the value has fewer parts
    pub fn split(&self, value: &str) -> Option<String> {
        value
            .split(self.delimiter.as_str())
            .nth(self.index)
            .map(|part| part.trim().to_string())
    }
}

/// Reference to a declared specification object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpecObject {
    pub name: String,
    pub ty: String,
    pub splitter: Option<Splitter>,
}

impl SpecObject {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            splitter: None,
        }
    }

    pub fn split(mut self, index: usize, delimiter: impl Into<String>) -> Self {
        self.splitter = Some(Splitter::new(index, delimiter));
        self
    }

    /// `alg(x)`: first part of a transformation string
    pub fn alg(self) -> Self {
        self.split(0, TRANSFORMATION_DELIMITER)
    }

    /// `mode(x)`: second part of a transformation string
    pub fn mode(self) -> Self {
        self.split(1, TRANSFORMATION_DELIMITER)
    }

    /// `pad(x)`: third part of a transformation string
    pub fn pad(self) -> Self {
        self.split(2, TRANSFORMATION_DELIMITER)
    }
}

impl fmt::Display for SpecObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.splitter {
            Some(s) => write!(f, "part({}, \"{}\", {})", s.index, s.delimiter, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Operand of an arithmetic constraint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    Var(SpecObject),
    Literal(ConstValue),
    /// `length(x)`
    Length(SpecObject),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(o) => write!(f, "{}", o),
            Self::Literal(v) => write!(f, "{}", v),
            Self::Length(o) => write!(f, "length({})", o),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mod,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mod => write!(f, "%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompOp {
    Eq,
    Neq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "=="),
            Self::Neq => write!(f, "!="),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogOp {
    And,
    Or,
    Implies,
}

impl fmt::Display for LogOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
            Self::Implies => write!(f, "=>"),
        }
    }
}

/// `var in {allowed...}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueConstraint {
    pub var: SpecObject,
    pub allowed: Vec<String>,
}

/// `left op right`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArithmeticConstraint {
    pub left: Operand,
    pub right: Operand,
    pub op: ArithOp,
}

impl ArithmeticConstraint {
    pub fn new(left: Operand, op: ArithOp, right: Operand) -> Self {
        Self { left, right, op }
    }

    /// Lift a single operand into `operand + 0`
    pub fn operand(operand: Operand) -> Self {
        Self::new(operand, ArithOp::Add, Operand::Literal(ConstValue::Int(0)))
    }

    /// Whether this is the identity lift produced by [`Self::operand`]
    pub fn is_identity(&self) -> bool {
        self.op == ArithOp::Add && self.right == Operand::Literal(ConstValue::Int(0))
    }
}

impl fmt::Display for ArithmeticConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            write!(f, "{}", self.left)
        } else {
            write!(f, "{} {} {}", self.left, self.op, self.right)
        }
    }
}

/// `left op right` over two arithmetic expressions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComparisonConstraint {
    pub left: ArithmeticConstraint,
    pub right: ArithmeticConstraint,
    pub op: CompOp,
}

/// Logical connective
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalConstraint {
    pub left: Box<Constraint>,
    pub right: Box<Constraint>,
    pub op: LogOp,
}

/// Declared exception of a method, consumed by control-flow instrumentation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExceptionConstraint {
    pub method: MethodSignature,
    pub exception: String,
}

/// Constraint tree node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    Value(ValueConstraint),
    Arithmetic(ArithmeticConstraint),
    Comparison(ComparisonConstraint),
    Logical(LogicalConstraint),
    Predicate(Predicate),
    Exception(ExceptionConstraint),
}

impl Constraint {
    /// `var in {values...}`
    pub fn value_in(var: SpecObject, allowed: &[&str]) -> Self {
        Self::Value(ValueConstraint {
            var,
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn compare(left: ArithmeticConstraint, op: CompOp, right: ArithmeticConstraint) -> Self {
        Self::Comparison(ComparisonConstraint { left, right, op })
    }

    pub fn logical(left: Constraint, op: LogOp, right: Constraint) -> Self {
        Self::Logical(LogicalConstraint {
            left: Box::new(left),
            right: Box::new(right),
            op,
        })
    }

    pub fn and(left: Constraint, right: Constraint) -> Self {
        Self::logical(left, LogOp::And, right)
    }

    pub fn or(left: Constraint, right: Constraint) -> Self {
        Self::logical(left, LogOp::Or, right)
    }

    pub fn implies(left: Constraint, right: Constraint) -> Self {
        Self::logical(left, LogOp::Implies, right)
    }

    pub fn as_predicate(&self) -> Option<&Predicate> {
        match self {
            Self::Predicate(p) => Some(p),
            _ => None,
        }
    }

    /// Specification variables mentioned anywhere in the tree
    pub fn involved_var_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Value(v) => {
                    names.insert(v.var.name.clone());
                }
                Self::Arithmetic(a) => collect_arith_vars(a, &mut names),
                Self::Comparison(c) => {
                    collect_arith_vars(&c.left, &mut names);
                    collect_arith_vars(&c.right, &mut names);
                }
                Self::Logical(l) => {
                    stack.push(&l.left);
                    stack.push(&l.right);
                }
                Self::Predicate(p) => names.extend(p.involved_var_names()),
                Self::Exception(_) => {}
            }
        }
        names
    }

    /// Visit every predicate in the tree (including predicate guards)
    pub fn predicates(&self) -> Vec<&Predicate> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Logical(l) => {
                    stack.push(&l.left);
                    stack.push(&l.right);
                }
                Self::Predicate(p) => {
                    found.push(p);
                    if let Some(guard) = &p.guard {
                        stack.push(guard);
                    }
                }
                _ => {}
            }
        }
        found
    }
}

fn collect_arith_vars(a: &ArithmeticConstraint, names: &mut BTreeSet<String>) {
    for operand in [&a.left, &a.right] {
        match operand {
            Operand::Var(o) | Operand::Length(o) => {
                names.insert(o.name.clone());
            }
            Operand::Literal(_) => {}
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{} in {{{}}}", v.var, v.allowed.join(", ")),
            Self::Arithmetic(a) => write!(f, "{}", a),
            Self::Comparison(c) => write!(f, "{} {} {}", c.left, c.op, c.right),
            Self::Logical(l) => write!(f, "({} {} {})", l.left, l.op, l.right),
            Self::Predicate(p) => write!(f, "{}", p),
            Self::Exception(e) => write!(f, "{} throws {}", e.method.short_name(), e.exception),
        }
    }
}

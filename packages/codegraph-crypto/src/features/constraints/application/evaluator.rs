/*
 * Constraint Evaluator
 *
 * Three-valued evaluation of one constraint tree against one tracked
 * object's bindings.
 *
 * # Value semantics
 * - A constraint must hold for every value (combination) bound to its
 *   variables; one offending value makes it False
 * - A value the oracle could not resolve (or that a splitter cannot cut)
 *   makes it Imprecise unless another value already makes it False
 * - A variable with no bindings at all constrains nothing
 * - String comparison is case-insensitive
 *
 * # Built-ins
 * - callTo[m..]: some observed call matches one of the methods
 * - noCallTo[m..]: no observed call matches any of the methods
 * - neverTypeOf[x, T]: no value of x has (a subtype of) type T
 * - instanceOf[x, T]: every value of x has (a subtype of) type T
 * - length[x]: every value of x has a known length
 * - notHardCoded[x]: no value of x is a literal
 *
 * Other predicates are delegated to the [`FactLookup`] port.
 */

use crate::features::constraints::domain::{Evaluation, Truth};
use crate::features::constraints::ports::FactLookup;
use crate::features::rule_model::domain::{
    ArithOp, ArithmeticConstraint, BuiltinPredicate, CompOp, ComparisonConstraint, Constraint,
    LogOp, LogicalConstraint, Operand, Predicate, PredicateParam, SpecObject, ValueConstraint,
};
use crate::features::typestate::application::MethodMatcher;
use crate::features::typestate::ports::SubtypeOracle;
use crate::shared::constants::partition::DEFAULT_MAX_VALUE_COMBINATIONS;
use crate::shared::models::{CallSiteId, ConstValue, ExtractedValue, ObjectView, ValueFact};
use std::cmp::Ordering;

/// Scalar an operand evaluates to
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scalar {
    Int(i64),
    Text(String),
}

impl Scalar {
    fn from_const(value: &ConstValue) -> Option<Self> {
        match value {
            ConstValue::Int(v) => Some(Self::Int(*v)),
            ConstValue::String(s) => Some(Self::Text(s.clone())),
            ConstValue::Bool(b) => Some(Self::Text(b.to_string())),
            ConstValue::Array(_) | ConstValue::Null => None,
        }
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One candidate value of an arithmetic expression
///
/// `value` is `None` when the value could not be determined.
#[derive(Debug, Clone)]
struct Candidate<'a> {
    value: Option<Scalar>,
    sites: Vec<&'a CallSiteId>,
}

impl<'a> Candidate<'a> {
    fn literal(value: Option<Scalar>) -> Self {
        Self {
            value,
            sites: Vec::new(),
        }
    }
}

/// Evaluator bound to one object
pub struct ConstraintEvaluator<'a> {
    view: ObjectView<'a>,
    facts: &'a dyn FactLookup,
    subtypes: &'a dyn SubtypeOracle,
    max_combinations: usize,
}

impl<'a> ConstraintEvaluator<'a> {
    pub fn new(
        view: ObjectView<'a>,
        facts: &'a dyn FactLookup,
        subtypes: &'a dyn SubtypeOracle,
    ) -> Self {
        Self {
            view,
            facts,
            subtypes,
            max_combinations: DEFAULT_MAX_VALUE_COMBINATIONS,
        }
    }

    pub fn with_max_combinations(mut self, max: usize) -> Self {
        self.max_combinations = max.max(1);
        self
    }

    pub fn view(&self) -> &ObjectView<'a> {
        &self.view
    }

    pub fn evaluate(&self, constraint: &Constraint) -> Evaluation {
        match constraint {
            Constraint::Value(v) => self.value(v),
            Constraint::Arithmetic(a) => self.arithmetic(a),
            Constraint::Comparison(c) => self.comparison(c),
            Constraint::Logical(l) => self.logical(l),
            Constraint::Predicate(p) => self.predicate(p),
            Constraint::Exception(_) => Evaluation::holds(),
        }
    }

    /// Evaluate a predicate, honoring its guard and negation
    pub fn predicate(&self, predicate: &Predicate) -> Evaluation {
        if let Some(guard) = &predicate.guard {
            if self.evaluate(guard).truth.is_false() {
                return Evaluation::holds();
            }
        }

        match predicate.builtin() {
            Some(builtin) => {
                let eval = self.builtin(builtin, predicate);
                if predicate.negated {
                    Evaluation {
                        truth: eval.truth.not(),
                        sites: eval.sites,
                    }
                } else {
                    eval
                }
            }
            None => self.facts.lookup(predicate, &self.view),
        }
    }

    fn value(&self, constraint: &ValueConstraint) -> Evaluation {
        let mut failing = Vec::new();
        let mut imprecise = Vec::new();

        for (site, value) in self.view.values_of(&constraint.var.name) {
            match text_of(&constraint.var, value) {
                Some(text) => {
                    if !constraint.allowed.iter().any(|a| a.eq_ignore_ascii_case(&text)) {
                        failing.push(site);
                    }
                }
                None => imprecise.push(site),
            }
        }
        verdict(failing, imprecise)
    }

    /// Standalone arithmetic holds when it evaluates to a non-zero number
    fn arithmetic(&self, constraint: &ArithmeticConstraint) -> Evaluation {
        let Some(candidates) = self.arith_candidates(constraint) else {
            return Evaluation::new(Truth::Imprecise);
        };

        let mut failing = Vec::new();
        let mut imprecise = Vec::new();
        for c in &candidates {
            match c.value.as_ref().and_then(Scalar::as_int) {
                Some(0) => failing.extend(c.sites.iter().copied()),
                Some(_) => {}
                None => imprecise.extend(c.sites.iter().copied()),
            }
        }
        verdict(failing, imprecise)
    }

    fn comparison(&self, constraint: &ComparisonConstraint) -> Evaluation {
        let (Some(left), Some(right)) = (
            self.arith_candidates(&constraint.left),
            self.arith_candidates(&constraint.right),
        ) else {
            return Evaluation::new(Truth::Imprecise);
        };
        if left.len().saturating_mul(right.len()) > self.max_combinations {
            return Evaluation::new(Truth::Imprecise);
        }

        let mut failing = Vec::new();
        let mut imprecise = Vec::new();
        for l in &left {
            for r in &right {
                let sites = l.sites.iter().chain(r.sites.iter()).copied();
                match (&l.value, &r.value) {
                    (Some(a), Some(b)) => match compare(a, b, constraint.op) {
                        Truth::True => {}
                        Truth::False => failing.extend(sites),
                        Truth::Imprecise => imprecise.extend(sites),
                    },
                    _ => imprecise.extend(sites),
                }
            }
        }
        verdict(failing, imprecise)
    }

    fn logical(&self, constraint: &LogicalConstraint) -> Evaluation {
        let left = self.evaluate(&constraint.left);
        let mut right: Option<Evaluation> = None;
        let mut eval_right = || {
            let r = self.evaluate(&constraint.right);
            let truth = r.truth;
            right = Some(r);
            truth
        };

        let truth = match constraint.op {
            LogOp::And => left.truth.and_then(&mut eval_right),
            LogOp::Or => left.truth.or_else(&mut eval_right),
            LogOp::Implies => left.truth.implies(&mut eval_right),
        };

        let mut eval = Evaluation::new(truth).with_sites(&left.sites);
        if let Some(r) = &right {
            eval = eval.with_sites(&r.sites);
        }
        eval
    }

    fn builtin(&self, builtin: BuiltinPredicate, predicate: &Predicate) -> Evaluation {
        match builtin {
            BuiltinPredicate::CallTo => {
                let matching = self.matching_calls(predicate);
                Evaluation::new(Truth::from_bool(!matching.is_empty())).with_sites(matching)
            }
            BuiltinPredicate::NoCallTo => {
                let matching = self.matching_calls(predicate);
                Evaluation::new(Truth::from_bool(matching.is_empty())).with_sites(matching)
            }
            BuiltinPredicate::NeverTypeOf => self.typed(predicate, |value_type, ty| {
                !self.subtypes.is_subtype(value_type, ty)
            }),
            BuiltinPredicate::InstanceOf => self.typed(predicate, |value_type, ty| {
                self.subtypes.is_subtype(value_type, ty)
            }),
            BuiltinPredicate::Length => self.per_value(predicate, |value| {
                value.as_constant().and_then(ConstValue::length).map(|_| true)
            }),
            BuiltinPredicate::NotHardCoded => self.per_value(predicate, |value| match &value.fact {
                ValueFact::Constant(_) => Some(false),
                ValueFact::Object(_) => Some(true),
                ValueFact::Unresolvable => None,
            }),
        }
    }

    fn matching_calls(&self, predicate: &Predicate) -> Vec<&'a CallSiteId> {
        let matcher = MethodMatcher::new(self.subtypes, true);
        let methods: Vec<_> = predicate
            .params
            .iter()
            .filter_map(|p| match p {
                PredicateParam::Method(m) => Some(m),
                _ => None,
            })
            .collect();

        self.view
            .calls
            .iter()
            .filter(|call| {
                methods
                    .iter()
                    .any(|m| matcher.match_method(m, &call.method).is_some())
            })
            .map(|call| &call.site)
            .collect()
    }

    /// `pred[x, T]`: check every value's propagated type against `T`
    fn typed(&self, predicate: &Predicate, check: impl Fn(&str, &str) -> bool) -> Evaluation {
        let (Some(var), Some(ty)) = (first_object(predicate), type_argument(predicate)) else {
            return Evaluation::new(Truth::Imprecise);
        };
        let mut failing = Vec::new();
        let mut imprecise = Vec::new();
        for (site, value) in self.view.values_of(&var.name) {
            match &value.value_type {
                Some(value_type) if check(value_type, ty) => {}
                Some(_) => failing.push(site),
                None => imprecise.push(site),
            }
        }
        verdict(failing, imprecise)
    }

    /// `pred[x]`: `check` returns whether a value passes, `None` if unknown
    fn per_value(
        &self,
        predicate: &Predicate,
        check: impl Fn(&ExtractedValue) -> Option<bool>,
    ) -> Evaluation {
        let Some(var) = first_object(predicate) else {
            return Evaluation::new(Truth::Imprecise);
        };
        let mut failing = Vec::new();
        let mut imprecise = Vec::new();
        for (site, value) in self.view.values_of(&var.name) {
            match check(value) {
                Some(true) => {}
                Some(false) => failing.push(site),
                None => imprecise.push(site),
            }
        }
        verdict(failing, imprecise)
    }

    /// Candidate values of an arithmetic expression
    ///
    /// `None` if the operand product exceeds the combination bound.
    fn arith_candidates(&self, expr: &ArithmeticConstraint) -> Option<Vec<Candidate<'a>>> {
        let left = self.operand_candidates(&expr.left);
        if expr.is_identity() {
            return Some(left);
        }
        let right = self.operand_candidates(&expr.right);
        if left.len().saturating_mul(right.len()) > self.max_combinations {
            return None;
        }

        let mut out = Vec::with_capacity(left.len() * right.len());
        for l in &left {
            for r in &right {
                let value = match (
                    l.value.as_ref().and_then(Scalar::as_int),
                    r.value.as_ref().and_then(Scalar::as_int),
                ) {
                    (Some(a), Some(b)) => apply(expr.op, a, b).map(Scalar::Int),
                    _ => None,
                };
                let mut sites = l.sites.clone();
                sites.extend(r.sites.iter().copied());
                out.push(Candidate { value, sites });
            }
        }
        Some(out)
    }

    fn operand_candidates(&self, operand: &Operand) -> Vec<Candidate<'a>> {
        match operand {
            Operand::Literal(value) => vec![Candidate::literal(Scalar::from_const(value))],
            Operand::Var(var) => self
                .view
                .values_of(&var.name)
                .into_iter()
                .map(|(site, value)| Candidate {
                    value: scalar_of(var, value),
                    sites: vec![site],
                })
                .collect(),
            Operand::Length(var) => self
                .view
                .values_of(&var.name)
                .into_iter()
                .map(|(site, value)| Candidate {
                    value: length_of(var, value).map(|len| Scalar::Int(len as i64)),
                    sites: vec![site],
                })
                .collect(),
        }
    }
}

fn verdict(failing: Vec<&CallSiteId>, imprecise: Vec<&CallSiteId>) -> Evaluation {
    if !failing.is_empty() {
        Evaluation::new(Truth::False).with_sites(failing)
    } else if !imprecise.is_empty() {
        Evaluation::new(Truth::Imprecise).with_sites(imprecise)
    } else {
        Evaluation::holds()
    }
}

fn first_object(predicate: &Predicate) -> Option<&SpecObject> {
    predicate.params.iter().find_map(PredicateParam::as_object)
}

fn type_argument(predicate: &Predicate) -> Option<&str> {
    predicate.params.iter().find_map(|p| match p {
        PredicateParam::TypeName(t) => Some(t.as_str()),
        _ => None,
    })
}

/// Text of a constant value after applying the variable's splitter
fn text_of(var: &SpecObject, value: &ExtractedValue) -> Option<String> {
    let text = value.as_constant()?.as_text()?;
    match &var.splitter {
        Some(splitter) => splitter.split(&text),
        None => Some(text),
    }
}

fn scalar_of(var: &SpecObject, value: &ExtractedValue) -> Option<Scalar> {
    if var.splitter.is_some() {
        return text_of(var, value).map(Scalar::Text);
    }
    Scalar::from_const(value.as_constant()?)
}

fn length_of(var: &SpecObject, value: &ExtractedValue) -> Option<usize> {
    if var.splitter.is_some() {
        return text_of(var, value).map(|s| s.chars().count());
    }
    value.as_constant()?.length()
}

fn apply(op: ArithOp, a: i64, b: i64) -> Option<i64> {
    match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => a.checked_sub(b),
        ArithOp::Mod => a.checked_rem(b),
    }
}

fn compare(left: &Scalar, right: &Scalar, op: CompOp) -> Truth {
    let ordering = match (left.as_int(), right.as_int()) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => None,
    };

    match (op, ordering) {
        (_, Some(ord)) => Truth::from_bool(match op {
            CompOp::Eq => ord == Ordering::Equal,
            CompOp::Neq => ord != Ordering::Equal,
            CompOp::Gt => ord == Ordering::Greater,
            CompOp::Ge => ord != Ordering::Less,
            CompOp::Lt => ord == Ordering::Less,
            CompOp::Le => ord != Ordering::Greater,
        }),
        (CompOp::Eq | CompOp::Neq, None) => {
            let equal = match (left, right) {
                (Scalar::Text(a), Scalar::Text(b)) => a.eq_ignore_ascii_case(b),
                _ => false,
            };
            Truth::from_bool(equal == (op == CompOp::Eq))
        }
        // Ordering between non-numeric values is undefined
        (_, None) => Truth::Imprecise,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::constraints::ports::NoFacts;
    use crate::features::rule_model::domain::MethodSignature;
    use crate::features::typestate::infrastructure::ClassHierarchy;
    use crate::features::typestate::ports::ExactTypesOnly;
    use crate::shared::models::{
        CallSiteBinding, CalledMethod, ObjectId, ObservedCall, ValueId,
    };

    struct Fixture {
        object: ObjectId,
        this: ValueId,
        bindings: Vec<CallSiteBinding>,
        calls: Vec<ObservedCall>,
    }

    impl Fixture {
        fn new(bindings: Vec<CallSiteBinding>) -> Self {
            Self {
                object: ObjectId::new("obj"),
                this: ValueId::new("obj@1"),
                bindings,
                calls: Vec::new(),
            }
        }

        fn with_calls(mut self, calls: Vec<ObservedCall>) -> Self {
            self.calls = calls;
            self
        }

        fn view(&self) -> ObjectView<'_> {
            ObjectView::new(&self.object, &self.this, &self.bindings, &self.calls)
        }
    }

    fn eval(fixture: &Fixture, constraint: &Constraint) -> Evaluation {
        ConstraintEvaluator::new(fixture.view(), &NoFacts, &ExactTypesOnly).evaluate(constraint)
    }

    fn key_size_at_least(min: i64) -> Constraint {
        Constraint::compare(
            ArithmeticConstraint::operand(Operand::Var(SpecObject::new("keySize", "int"))),
            CompOp::Ge,
            ArithmeticConstraint::operand(Operand::Literal(ConstValue::Int(min))),
        )
    }

    #[test]
    fn test_value_constraint_with_splitter() {
        let fixture = Fixture::new(vec![CallSiteBinding::new(
            "s1",
            "transformation",
            0,
            vec![ExtractedValue::string("aes/GCM/NoPadding")],
        )]);
        let alg = SpecObject::new("transformation", "java.lang.String").alg();
        assert_eq!(eval(&fixture, &Constraint::value_in(alg.clone(), &["AES"])).truth, Truth::True);
        let result = eval(&fixture, &Constraint::value_in(alg, &["DES"]));
        assert_eq!(result.truth, Truth::False);
        assert_eq!(result.sites, vec![CallSiteId::new("s1")]);
    }

    #[test]
    fn test_splitter_out_of_range_is_imprecise() {
        let fixture = Fixture::new(vec![CallSiteBinding::new(
            "s1",
            "transformation",
            0,
            vec![ExtractedValue::string("AES")],
        )]);
        let pad = SpecObject::new("transformation", "java.lang.String").pad();
        assert_eq!(
            eval(&fixture, &Constraint::value_in(pad, &["NoPadding"])).truth,
            Truth::Imprecise
        );
    }

    #[test]
    fn test_comparison_checks_every_value() {
        let fixture = Fixture::new(vec![
            CallSiteBinding::new("s1", "keySize", 0, vec![ExtractedValue::int(256)]),
            CallSiteBinding::new("s2", "keySize", 0, vec![ExtractedValue::int(64)]),
        ]);
        let result = eval(&fixture, &key_size_at_least(128));
        assert_eq!(result.truth, Truth::False);
        assert_eq!(result.sites, vec![CallSiteId::new("s2")]);
    }

    #[test]
    fn test_false_dominates_imprecise() {
        let fixture = Fixture::new(vec![
            CallSiteBinding::new("s1", "keySize", 0, vec![ExtractedValue::unresolvable()]),
            CallSiteBinding::new("s2", "keySize", 0, vec![ExtractedValue::int(64)]),
        ]);
        assert_eq!(eval(&fixture, &key_size_at_least(128)).truth, Truth::False);

        let only_unknown = Fixture::new(vec![CallSiteBinding::new(
            "s1",
            "keySize",
            0,
            vec![ExtractedValue::unresolvable()],
        )]);
        let result = eval(&only_unknown, &key_size_at_least(128));
        assert_eq!(result.truth, Truth::Imprecise);
        assert_eq!(result.sites, vec![CallSiteId::new("s1")]);
    }

    #[test]
    fn test_combination_bound_is_imprecise() {
        let values: Vec<ExtractedValue> = (0..20).map(|i| ExtractedValue::int(i + 200)).collect();
        let fixture = Fixture::new(vec![
            CallSiteBinding::new("s1", "a", 0, values.clone()),
            CallSiteBinding::new("s2", "b", 0, values),
        ]);
        let c = Constraint::compare(
            ArithmeticConstraint::operand(Operand::Var(SpecObject::new("a", "int"))),
            CompOp::Ge,
            ArithmeticConstraint::operand(Operand::Var(SpecObject::new("b", "int"))),
        );
        let evaluator = ConstraintEvaluator::new(fixture.view(), &NoFacts, &ExactTypesOnly)
            .with_max_combinations(100);
        assert_eq!(evaluator.evaluate(&c).truth, Truth::Imprecise);
    }

    #[test]
    fn test_length_and_modulo() {
        let fixture = Fixture::new(vec![CallSiteBinding::new(
            "s1",
            "iv",
            0,
            vec![ExtractedValue::constant(ConstValue::Array(vec![ConstValue::Int(0); 12]))],
        )]);
        let iv = SpecObject::new("iv", "byte[]");
        let min_len = Constraint::compare(
            ArithmeticConstraint::operand(Operand::Length(iv.clone())),
            CompOp::Ge,
            ArithmeticConstraint::operand(Operand::Literal(ConstValue::Int(16))),
        );
        assert_eq!(eval(&fixture, &min_len).truth, Truth::False);

        let multiple_of_four = Constraint::compare(
            ArithmeticConstraint::new(
                Operand::Length(iv),
                ArithOp::Mod,
                Operand::Literal(ConstValue::Int(4)),
            ),
            CompOp::Eq,
            ArithmeticConstraint::operand(Operand::Literal(ConstValue::Int(0))),
        );
        assert_eq!(eval(&fixture, &multiple_of_four).truth, Truth::True);
    }

    #[test]
    fn test_implication_skips_consequent() {
        let fixture = Fixture::new(vec![
            CallSiteBinding::new("s1", "mode", 0, vec![ExtractedValue::int(2)]),
            CallSiteBinding::new("s2", "keySize", 0, vec![ExtractedValue::int(64)]),
        ]);
        let c = Constraint::implies(
            Constraint::value_in(SpecObject::new("mode", "int"), &["1"]),
            key_size_at_least(128),
        );
        assert_eq!(eval(&fixture, &c).truth, Truth::True);
    }

    #[test]
    fn test_unbound_variable_is_vacuous() {
        let fixture = Fixture::new(Vec::new());
        assert_eq!(eval(&fixture, &key_size_at_least(128)).truth, Truth::True);
    }

    #[test]
    fn test_not_hard_coded() {
        let fixture = Fixture::new(vec![
            CallSiteBinding::new("s1", "password", 0, vec![ExtractedValue::object("pw@3")]),
            CallSiteBinding::new("s2", "password", 0, vec![ExtractedValue::string("hunter2")]),
        ]);
        let c = Constraint::Predicate(Predicate::not_hard_coded(SpecObject::new(
            "password", "char[]",
        )));
        let result = eval(&fixture, &c);
        assert_eq!(result.truth, Truth::False);
        assert_eq!(result.sites, vec![CallSiteId::new("s2")]);
    }

    #[test]
    fn test_never_type_of_uses_hierarchy() {
        let fixture = Fixture::new(vec![CallSiteBinding::new(
            "s1",
            "password",
            0,
            vec![ExtractedValue::object("pw@3").with_type("com.acme.SecretString")],
        )]);
        let hierarchy = ClassHierarchy::new().with("com.acme.SecretString", "java.lang.String");
        let c = Constraint::Predicate(Predicate::never_type_of(
            SpecObject::new("password", "char[]"),
            "java.lang.String",
        ));
        let evaluator = ConstraintEvaluator::new(fixture.view(), &NoFacts, &hierarchy);
        assert_eq!(evaluator.evaluate(&c).truth, Truth::False);

        let untyped = Fixture::new(vec![CallSiteBinding::new(
            "s1",
            "password",
            0,
            vec![ExtractedValue::object("pw@3")],
        )]);
        assert_eq!(eval(&untyped, &c).truth, Truth::Imprecise);
    }

    #[test]
    fn test_instance_of() {
        let fixture = Fixture::new(vec![CallSiteBinding::new(
            "s1",
            "key",
            1,
            vec![ExtractedValue::object("k@1").with_type("javax.crypto.SecretKey")],
        )]);
        let c = Constraint::Predicate(Predicate::instance_of(
            SpecObject::new("key", "java.security.Key"),
            "javax.crypto.SecretKey",
        ));
        assert_eq!(eval(&fixture, &c).truth, Truth::True);
    }

    #[test]
    fn test_call_to_and_no_call_to() {
        let clear = MethodSignature::new("javax.crypto.spec.PBEKeySpec.clearPassword", &[]);
        let fixture = Fixture::new(Vec::new()).with_calls(vec![ObservedCall::new(
            "s9",
            CalledMethod::qualified("javax.crypto.spec.PBEKeySpec.clearPassword", &[]),
            "javax.crypto.spec.PBEKeySpec",
        )]);

        let call_to = Constraint::Predicate(Predicate::call_to(vec![clear.clone()]));
        assert_eq!(eval(&fixture, &call_to).truth, Truth::True);

        let no_call_to = Constraint::Predicate(Predicate::no_call_to(vec![clear]));
        let result = eval(&fixture, &no_call_to);
        assert_eq!(result.truth, Truth::False);
        assert_eq!(result.sites, vec![CallSiteId::new("s9")]);
    }

    #[test]
    fn test_guard_false_makes_predicate_vacuous() {
        let fixture = Fixture::new(vec![
            CallSiteBinding::new("s1", "mode", 0, vec![ExtractedValue::int(2)]),
            CallSiteBinding::new("s2", "password", 0, vec![ExtractedValue::string("hunter2")]),
        ]);
        let guarded = Predicate::not_hard_coded(SpecObject::new("password", "char[]"))
            .guarded_by(Constraint::value_in(SpecObject::new("mode", "int"), &["1"]));
        assert_eq!(eval(&fixture, &Constraint::Predicate(guarded)).truth, Truth::True);
    }

    #[test]
    fn test_string_equality_ignores_case() {
        assert_eq!(
            compare(&Scalar::Text("SHA-256".into()), &Scalar::Text("sha-256".into()), CompOp::Eq),
            Truth::True
        );
        assert_eq!(
            compare(&Scalar::Text("AES".into()), &Scalar::Text("DES".into()), CompOp::Lt),
            Truth::Imprecise
        );
        assert_eq!(compare(&Scalar::Text("128".into()), &Scalar::Int(128), CompOp::Eq), Truth::True);
    }
}

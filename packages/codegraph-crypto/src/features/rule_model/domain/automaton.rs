/*
 * Usage Automaton
 *
 * Defines the legal call order on an object of the rule's type.
 *
 * # Example: Cipher
 * ```text
 * States: {Start, Ready*, Used*}      (* = accepting)
 * Transitions:
 *   Start --getInstance()--> Ready
 *   Ready --init()--> Ready
 *   Ready --doFinal()--> Used
 * ```
 *
 * # Time Complexity
 * - outgoing: O(transitions)
 * - unreachable_states: O(states + transitions)
 */

use super::method::MethodSignature;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// State identifier in the usage automaton
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub String);

impl StateId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StateId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// State with its accepting flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNode {
    pub id: StateId,

    /// Object may legally end its life in this state
    pub accepting: bool,
}

/// Labelled transition
///
/// Any method in `label` triggers the transition. Each label entry's
/// parameter list doubles as the argument → variable binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    pub label: Vec<MethodSignature>,
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.label.iter().map(|m| m.short_name()).collect();
        write!(f, "{} --{{{}}}--> {}", self.from, names.join(", "), self.to)
    }
}

/// Finite usage automaton of a rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageAutomaton {
    /// States in declaration order
    pub states: Vec<StateNode>,

    /// Initial states (one or more)
    pub initial: BTreeSet<StateId>,

    pub transitions: Vec<Transition>,
}

impl UsageAutomaton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add state (updates the accepting flag if it already exists)
    pub fn add_state(&mut self, id: StateId, accepting: bool) {
        match self.states.iter_mut().find(|s| s.id == id) {
            Some(existing) => existing.accepting = accepting,
            None => self.states.push(StateNode { id, accepting }),
        }
    }

    /// Mark a state as initial
    pub fn add_initial(&mut self, id: StateId) {
        self.initial.insert(id);
    }

    /// Add transition
    ///
    /// States referenced here are not added implicitly; validation reports
    /// unknown states instead.
    pub fn add_transition(&mut self, from: StateId, label: Vec<MethodSignature>, to: StateId) {
        self.transitions.push(Transition { from, to, label });
    }

    pub fn state(&self, id: &StateId) -> Option<&StateNode> {
        self.states.iter().find(|s| &s.id == id)
    }

    pub fn contains_state(&self, id: &StateId) -> bool {
        self.state(id).is_some()
    }

    pub fn is_accepting(&self, id: &StateId) -> bool {
        self.state(id).map(|s| s.accepting).unwrap_or(false)
    }

    pub fn initial_states(&self) -> BTreeSet<StateId> {
        self.initial.clone()
    }

    /// Outgoing transitions of a state
    pub fn outgoing<'a>(&'a self, from: &'a StateId) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions.iter().filter(move |t| &t.from == from)
    }

    /// All methods named by any label (the rule's event alphabet)
    pub fn alphabet(&self) -> Vec<&MethodSignature> {
        let mut seen = Vec::new();
        for method in self.transitions.iter().flat_map(|t| t.label.iter()) {
            if !seen.contains(&method) {
                seen.push(method);
            }
        }
        seen
    }

    /// Methods that can fire from any of the given states
    pub fn expected_methods(&self, current: &BTreeSet<StateId>) -> Vec<&MethodSignature> {
        let mut expected = Vec::new();
        let from_current = self.transitions.iter().filter(|t| current.contains(&t.from));
        for method in from_current.flat_map(|t| t.label.iter()) {
            if !expected.contains(&method) {
                expected.push(method);
            }
        }
        expected
    }

    /// Target states of transitions carrying the given methods
    ///
    /// A transition qualifies if its label equals `methods`, or, when a
    /// single method is given, if its label contains that method.
    pub fn states_after(&self, methods: &[MethodSignature]) -> BTreeSet<StateId> {
        if methods.is_empty() {
            return BTreeSet::new();
        }
        self.transitions
            .iter()
            .filter(|t| {
                !t.label.is_empty()
                    && (t.label.as_slice() == methods
                        || (methods.len() == 1 && t.label.contains(&methods[0])))
            })
            .map(|t| t.to.clone())
            .collect()
    }

    /// States not reachable from any initial state
    ///
    /// Transitions referencing unknown states are ignored here.
    pub fn unreachable_states(&self) -> Vec<StateId> {
        let mut graph: DiGraph<StateId, ()> = DiGraph::new();
        let mut nodes: FxHashMap<&StateId, NodeIndex> = FxHashMap::default();
        for state in &self.states {
            nodes.insert(&state.id, graph.add_node(state.id.clone()));
        }
        for t in &self.transitions {
            if let (Some(&a), Some(&b)) = (nodes.get(&t.from), nodes.get(&t.to)) {
                graph.add_edge(a, b, ());
            }
        }

        let mut reached = vec![false; graph.node_count()];
        for init in &self.initial {
            if let Some(&start) = nodes.get(init) {
                let mut bfs = Bfs::new(&graph, start);
                while let Some(nx) = bfs.next(&graph) {
                    reached[nx.index()] = true;
                }
            }
        }

        graph
            .node_indices()
            .filter(|ix| !reached[ix.index()])
            .map(|ix| graph[ix].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(name: &str) -> MethodSignature {
        MethodSignature::new(format!("javax.crypto.Cipher.{}", name), &[])
    }

    fn cipher() -> UsageAutomaton {
        let mut a = UsageAutomaton::new();
        a.add_state(StateId::new("Start"), false);
        a.add_state(StateId::new("Ready"), true);
        a.add_state(StateId::new("Used"), true);
        a.add_initial(StateId::new("Start"));
        a.add_transition("Start".into(), vec![m("init")], "Ready".into());
        a.add_transition("Ready".into(), vec![m("encrypt"), m("update")], "Used".into());
        a
    }

    #[test]
    fn test_accepting_flags() {
        let a = cipher();
        assert!(!a.is_accepting(&StateId::new("Start")));
        assert!(a.is_accepting(&StateId::new("Ready")));
        assert!(!a.is_accepting(&StateId::new("Missing")));
    }

    #[test]
    fn test_outgoing() {
        let a = cipher();
        let start = StateId::new("Start");
        let out: Vec<_> = a.outgoing(&start).collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to, StateId::new("Ready"));
    }

    #[test]
    fn test_alphabet_dedup() {
        let mut a = cipher();
        a.add_transition("Used".into(), vec![m("encrypt")], "Used".into());
        assert_eq!(a.alphabet().len(), 3);
    }

    #[test]
    fn test_states_after_single_method_contained() {
        let a = cipher();
        let after = a.states_after(&[m("update")]);
        assert_eq!(after, BTreeSet::from([StateId::new("Used")]));
        assert!(a.states_after(&[]).is_empty());
    }

    #[test]
    fn test_unreachable_states() {
        let mut a = cipher();
        assert!(a.unreachable_states().is_empty());

        a.add_state(StateId::new("Orphan"), true);
        assert_eq!(a.unreachable_states(), vec![StateId::new("Orphan")]);
    }

    #[test]
    fn test_expected_methods() {
        let a = cipher();
        let current = BTreeSet::from([StateId::new("Ready")]);
        let expected: Vec<&str> = a
            .expected_methods(&current)
            .iter()
            .map(|m| m.short_name())
            .collect();
        assert_eq!(expected, vec!["encrypt", "update"]);
    }

    #[test]
    fn test_expected_methods_borrow_only_the_automaton() {
        let a = cipher();
        let expected = {
            let current = BTreeSet::from([StateId::new("Start"), StateId::new("Ready")]);
            a.expected_methods(&current)
        };
        let names: Vec<&str> = expected.iter().map(|m| m.short_name()).collect();
        assert_eq!(names, vec!["init", "encrypt", "update"]);
    }
}

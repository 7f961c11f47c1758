/*
 * Typestate Engine
 *
 * Walks a rule's usage automaton per tracked object:
 * - Ordering violations (call not allowed in the current states)
 * - Forbidden calls (regardless of position)
 * - Incomplete operations (object ends outside an accepting state)
 *
 * Architecture:
 * - Domain: MatchKind, FiredTransition, GenerationEvent, AdvanceOutcome
 * - Application: TypestateEngine, MethodMatcher (exact / fuzzy)
 * - Infrastructure: ClassHierarchy
 * - Ports: SubtypeOracle
 *
 * State tracking is a set of automaton states; acceptance at end of life
 * means some state in the set is accepting.
 *
 * References:
 * - Strom & Yellin (1993) "Typestate"
 * - Krüger et al. (2018) "CrySL: An Extensible Approach to Validating the
 *   Correct Usage of Cryptographic APIs"
 */

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{MethodMatcher, TypestateConfig, TypestateEngine};
pub use domain::{AdvanceOutcome, FiredTransition, GenerationEvent, MatchKind};
pub use infrastructure::ClassHierarchy;
pub use ports::{ExactTypesOnly, SubtypeOracle};

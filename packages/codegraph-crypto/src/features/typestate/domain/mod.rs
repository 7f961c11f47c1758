/*
 * Typestate Domain Models
 */

mod outcome;

pub use outcome::{AdvanceOutcome, FiredTransition, GenerationEvent, MatchKind};

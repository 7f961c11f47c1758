/*
 * Typestate Application Layer
 */

mod engine;
mod matcher;

pub use engine::{TypestateConfig, TypestateEngine};
pub use matcher::MethodMatcher;

/*
 * Rule Model Application Layer
 */

mod load_rules;

pub use load_rules::{load_rules, RuleSet};

/*
 * Rule Model Infrastructure
 *
 * Rule construction, validation and serialized rule loading.
 */

mod builder;
mod json_source;
mod validator;

pub use builder::RuleBuilder;
pub use json_source::{rules_to_json, JsonRuleSource};
pub use validator::RuleValidator;

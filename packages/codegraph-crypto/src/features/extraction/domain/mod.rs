/*
 * Extraction Domain
 */

mod pending;
mod query;

pub use pending::{BindingListener, PendingBindings};
pub use query::BindingQuery;

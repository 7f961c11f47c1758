//! Predicate fact storage

mod fact_store;

pub use fact_store::PredicateFactStore;

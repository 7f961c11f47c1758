//! Predicate application layer

mod resolver;

pub use resolver::FactResolver;

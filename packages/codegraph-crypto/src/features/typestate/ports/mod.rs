/*
 * Typestate Ports
 *
 * Interfaces for external integration.
 */

/// Subtype oracle
///
/// Decides whether `child` is `parent` or extends/implements it
/// transitively. Injected so the engine never needs a class hierarchy of
/// its own.
pub trait SubtypeOracle: Send + Sync {
    fn is_subtype(&self, child: &str, parent: &str) -> bool;
}

/// Oracle knowing only type equality (fuzzy matching never succeeds)
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactTypesOnly;

impl SubtypeOracle for ExactTypesOnly {
    fn is_subtype(&self, child: &str, parent: &str) -> bool {
        child == parent
    }
}

//! Centralized Configuration Constants
//!
//! Reserved names of the rule language and tunable defaults.

/// Thread pool configuration
pub mod thread_pool {
    /// Percentage of available CPU cores to use for the evaluation pool
    /// 75% = 3/4 of cores, leaving 25% for OS and other tasks
    pub const CPU_UTILIZATION_PERCENT: f64 = 0.75;

    /// Minimum number of threads (always use at least 1)
    pub const MIN_THREADS: usize = 1;

    /// Below this many tracked objects the session evaluates sequentially
    pub const PARALLEL_THRESHOLD: usize = 8;
}

/// Reserved names in rule models
pub mod rule_names {
    /// Receiver of the tracked object
    pub const THIS: &str = "this";

    /// Unnamed binding (`_`)
    pub const NO_NAME: &str = "_";

    /// Parameter type matching any argument type
    pub const ANY_TYPE: &str = "AnyType";

    /// Return type of methods without a return binding
    pub const VOID: &str = "void";

    /// Built-in predicates resolved structurally instead of via facts
    pub const BUILTIN_PREDICATES: [&str; 6] = [
        "callTo",
        "noCallTo",
        "neverTypeOf",
        "length",
        "notHardCoded",
        "instanceOf",
    ];

    /// Delimiter used by the `alg(..)`, `mode(..)` and `pad(..)` splitters
    pub const TRANSFORMATION_DELIMITER: &str = "/";
}

/// Constraint partitioning defaults
pub mod partition {
    /// Variables used purely for identity; an unbound keying variable does
    /// not block direct evaluation
    pub const DEFAULT_KEYING_VARIABLES: [&str; 1] = ["speccedKey"];

    /// Variables never used to anchor a required predicate at a call site
    pub const DEFAULT_SKIPPED_ANCHORS: [&str; 1] = ["transformation"];

    /// Upper bound on operand value combinations in one comparison
    pub const DEFAULT_MAX_VALUE_COMBINATIONS: usize = 256;
}

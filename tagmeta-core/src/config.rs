//! Engine configuration
//!
//! Limits that keep elaboration of recursive or runaway metaprograms finite.

/// Default bound on nested operation invocations
///
/// Each level costs several native frames; this bound stays within a 2 MiB
/// thread stack in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default bound on the number of elements a traversal will visit
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum nesting of operation invocations before `RecursionLimit`
    pub max_depth: usize,
    /// Maximum number of elements a generic traversal visits before `SequenceTooLong`
    pub max_sequence_length: usize,
    /// Cache results of (operation, arguments) pairs
    pub memoize: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            memoize: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_sequence_length(mut self, max_sequence_length: usize) -> Self {
        self.max_sequence_length = max_sequence_length;
        self
    }

    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = EngineConfig::new()
            .with_max_depth(16)
            .with_memoize(false);

        assert_eq!(config.max_depth, 16);
        assert_eq!(config.max_sequence_length, DEFAULT_MAX_SEQUENCE_LENGTH);
        assert!(!config.memoize);
    }
}

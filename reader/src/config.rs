//! Reader configuration options

/// Default upper bound on the number of directory entries an archive may declare
pub const DEFAULT_MAX_RESOURCE_COUNT: u32 = 65536;

/// Configuration options shared by the archive and script readers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Check every descriptor against the archive length while loading the directory
    pub validate_resource_bounds: bool,
    /// Largest directory an archive may declare before loading is refused
    pub max_resource_count: u32,
    /// Reject scripts whose declared size differs from the buffer length
    pub strict_program_size: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            validate_resource_bounds: true,
            max_resource_count: DEFAULT_MAX_RESOURCE_COUNT,
            strict_program_size: false,
        }
    }
}

impl ReaderConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable eager descriptor bounds validation
    pub fn with_resource_bounds_validation(mut self, enabled: bool) -> Self {
        self.validate_resource_bounds = enabled;
        self
    }

    /// Set the maximum number of resources an archive may declare
    pub fn with_max_resource_count(mut self, limit: u32) -> Self {
        self.max_resource_count = limit;
        self
    }

    /// Enable or disable strict program size checking
    pub fn with_strict_program_size(mut self, strict: bool) -> Self {
        self.strict_program_size = strict;
        self
    }
}

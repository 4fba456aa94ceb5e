use serde::{Deserialize, Serialize};

/// Largest page edge accepted by [`PackerConfig::validate`]; placements are stored as `i32`.
pub const MAX_PAGE_LIMIT: u32 = i32::MAX as u32 / 2;

/// Packing configuration.
/// Key notes:
///   - `max_page_size` bounds both page edges; a single source bigger than that is an error
///   - `padding` is reserved to the right of and below every packed source
///   - `combine_duplicates` stores sources with identical trimmed pixels only once
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackerConfig {
    /// Trim fully transparent borders (alpha == 0) before packing.
    pub trim: bool,
    /// Maximum page width and height in pixels.
    pub max_page_size: u32,
    /// Pixels kept free between packed sources.
    pub padding: u32,
    /// Round finished page dimensions up to powers of two.
    pub power_of_two: bool,
    /// Detect sources with identical trimmed content and pack them once.
    pub combine_duplicates: bool,

    /// Composite pages in parallel when feature "parallel" is on.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            trim: true,
            max_page_size: 8192,
            padding: 1,
            power_of_two: false,
            combine_duplicates: false,
            parallel: default_parallel(),
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - `max_page_size` is zero or larger than [`MAX_PAGE_LIMIT`]
    /// - `padding` alone would fill a whole page
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::PackerError;

        if self.max_page_size == 0 || self.max_page_size > MAX_PAGE_LIMIT {
            return Err(PackerError::InvalidConfig(format!(
                "max_page_size must be in 1..={}, got {}",
                MAX_PAGE_LIMIT, self.max_page_size
            )));
        }

        if self.padding >= self.max_page_size {
            return Err(PackerError::InvalidConfig(format!(
                "padding ({}) leaves no usable space on a {}px page",
                self.padding, self.max_page_size
            )));
        }

        Ok(())
    }

    /// Largest page edge a layout may use. With `power_of_two` this is the largest power of two
    /// not above `max_page_size`, so rounding never pushes a page past the limit.
    pub fn effective_page_size(&self) -> u32 {
        if self.power_of_two {
            crate::compositing::prev_pow2(self.max_page_size)
        } else {
            self.max_page_size
        }
    }

    /// Upper bound for the packing tree: a page plus the trailing padding that gets cut off.
    pub(crate) fn tree_limit(&self) -> u32 {
        self.effective_page_size() + self.padding
    }
}

fn default_parallel() -> bool {
    false
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn trim(mut self, v: bool) -> Self {
        self.cfg.trim = v;
        self
    }
    pub fn max_page_size(mut self, v: u32) -> Self {
        self.cfg.max_page_size = v;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn pow2(mut self, v: bool) -> Self {
        self.cfg.power_of_two = v;
        self
    }
    pub fn combine_duplicates(mut self, v: bool) -> Self {
        self.cfg.combine_duplicates = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}

//! Extractor configuration types
//!
//! This module defines the minimal configuration needed by the extraction
//! pass. The extractor is intentionally simple - everything else about a
//! pass is derived from the collection schemes and the decoder manifest.

use serde::{Deserialize, Serialize};

/// Default ceiling on complex type ids processed per complex signal
///
/// The type catalog is externally provided and may be pathologically deep,
/// wide, or cyclic; the traversal in the complex builder stops after this
/// many worklist pops no matter what.
pub const MAX_COMPLEX_TYPES: usize = 1000;

/// Configuration for one extraction pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum number of complex type ids processed per complex signal
    #[serde(default = "default_max_complex_types")]
    pub max_complex_types: usize,
}

fn default_max_complex_types() -> usize {
    MAX_COMPLEX_TYPES
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_complex_types: MAX_COMPLEX_TYPES,
        }
    }
}

impl ExtractorConfig {
    /// Create a new extractor configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the complex type traversal budget
    pub fn with_max_complex_types(mut self, max_complex_types: usize) -> Self {
        self.max_complex_types = max_complex_types;
        self
    }
}

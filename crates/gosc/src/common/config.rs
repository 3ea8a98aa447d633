//! Translator configuration

use crate::types::SizeConfig;

/// Options for one translation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Byte sizes of the primitive kinds and of pointers
    pub sizes: SizeConfig,
}

impl Config {
    pub fn with_sizes(mut self, sizes: SizeConfig) -> Self {
        self.sizes = sizes;
        self
    }
}

//! Compactor configuration.

use macroblock_core::Rules;

/// Configuration for the [`Compactor`](crate::Compactor).
#[derive(Debug, Clone)]
pub struct CompactorConfig {
    /// Consensus rules. Their checksum guards every body file.
    pub rules: Rules,
    /// Delete both source bodies after a completed merge.
    pub auto_delete_sources: bool,
    /// Delete the partial output of a cancelled merge.
    pub discard_cancelled: bool,
}

impl Default for CompactorConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            auto_delete_sources: false,
            discard_cancelled: true,
        }
    }
}

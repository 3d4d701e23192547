//! The Compactor: writes block bodies and merges them into macro-bodies.
//!
//! All file work is synchronous. [`Compactor::merge_in_background`] moves a
//! merge onto tokio's blocking pool for async callers.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use macroblock_core::{
    validate_prefix, validate_tx_base, BlockHeader, BodySummary, CancelFlag, ContentTag, Hash,
    HeaderChain, MacroReader, MacroWriter, MergeOutcome, SequenceElement, SequencePrefix, TxBase,
    TxWriter,
};
use macroblock_store::{BodyStreamSet, MemoryBody};

use crate::config::CompactorConfig;
use crate::error::{Error, Result};

/// Outcome of writing or merging one body.
#[derive(Debug, Clone)]
pub struct CompactionReport {
    /// Path prefix of the body that was written.
    pub dest: PathBuf,
    pub tag: ContentTag,
    pub summary: BodySummary,
    pub outcome: MergeOutcome,
}

impl CompactionReport {
    pub fn is_completed(&self) -> bool {
        self.outcome.is_completed()
    }
}

/// Front door for block assembly and macro-body compaction.
#[derive(Debug, Clone)]
pub struct Compactor {
    config: CompactorConfig,
    rules_checksum: Hash,
}

impl Compactor {
    pub fn new(config: CompactorConfig) -> Self {
        let rules_checksum = config.rules.checksum();
        Self {
            config,
            rules_checksum,
        }
    }

    pub fn config(&self) -> &CompactorConfig {
        &self.config
    }

    pub fn rules_checksum(&self) -> Hash {
        self.rules_checksum
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writing
    // ─────────────────────────────────────────────────────────────────────────

    /// Write one block's body together with its header.
    pub fn write_block(
        &self,
        dest: impl AsRef<Path>,
        header: &BlockHeader,
        subsidy: u64,
        tx: &TxBase,
    ) -> Result<CompactionReport> {
        let summary = BodySummary::for_block(header, subsidy);
        let (prefix, elem) = header.split();
        self.write_body(dest, &summary, &prefix, &[elem], tx)
    }

    /// Validate and write a body with an explicit header chain.
    pub fn write_body(
        &self,
        dest: impl AsRef<Path>,
        summary: &BodySummary,
        prefix: &SequencePrefix,
        headers: &[SequenceElement],
        tx: &TxBase,
    ) -> Result<CompactionReport> {
        let dest = dest.as_ref();
        validate_tx_base(tx)?;
        validate_prefix(summary, prefix)?;

        let tag = ContentTag::derive(&self.rules_checksum, summary);
        let mut out = BodyStreamSet::create(dest, self.rules_checksum, tag)?;
        out.put_start(summary, prefix)?;
        for elem in headers {
            out.put_next_header(elem)?;
        }

        let mut body = MemoryBody::from_tx(tx.clone());
        let outcome = out.dump(&mut body, &CancelFlag::new())?;
        out.close()?;

        debug!(dest = %dest.display(), heights = ?summary.height, elements = tx.len(), "wrote body");
        Ok(CompactionReport {
            dest: dest.to_path_buf(),
            tag,
            summary: *summary,
            outcome,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Merging
    // ─────────────────────────────────────────────────────────────────────────

    /// Merge two stored bodies into `dest` with cut-through.
    ///
    /// `first` must precede `second` in the chain: the merged header chain
    /// is `first`'s followed by `second`'s.
    pub fn merge(
        &self,
        first: impl AsRef<Path>,
        second: impl AsRef<Path>,
        dest: impl AsRef<Path>,
        cancel: &CancelFlag,
    ) -> Result<CompactionReport> {
        let dest = dest.as_ref();
        let mut a = BodyStreamSet::open(first.as_ref(), self.rules_checksum)?;
        let mut b = BodyStreamSet::open(second.as_ref(), self.rules_checksum)?;

        let (mut summary, _) = a.get_start()?;
        let (other, _) = b.get_start()?;
        summary.merge(&other)?;
        let tag = ContentTag::derive(&self.rules_checksum, &summary);

        info!(dest = %dest.display(), heights = ?summary.height, "merging bodies");
        let mut out = BodyStreamSet::create(dest, self.rules_checksum, tag)?;

        let outcome = match out.combine_pair(&mut a, &mut b, cancel)? {
            MergeOutcome::Completed(mut stats) => match out.combine_headers(&mut a, &mut b, cancel)? {
                MergeOutcome::Completed(h) => {
                    stats.headers = h.headers;
                    MergeOutcome::Completed(stats)
                }
                MergeOutcome::Cancelled => MergeOutcome::Cancelled,
            },
            MergeOutcome::Cancelled => MergeOutcome::Cancelled,
        };

        match outcome {
            MergeOutcome::Completed(stats) => {
                out.flush()?;
                out.close()?;
                info!(
                    dest = %dest.display(),
                    written = stats.written(),
                    annihilated = stats.utxo.annihilated + stats.kernel.annihilated,
                    "merge completed"
                );
                if self.config.auto_delete_sources {
                    a.delete()?;
                    b.delete()?;
                }
            }
            MergeOutcome::Cancelled => {
                warn!(dest = %dest.display(), "merge cancelled");
                if self.config.discard_cancelled {
                    out.delete()?;
                } else {
                    out.close()?;
                }
            }
        }

        Ok(CompactionReport {
            dest: dest.to_path_buf(),
            tag,
            summary,
            outcome,
        })
    }

    /// [`merge`](Self::merge) on the blocking thread pool.
    pub async fn merge_in_background(
        &self,
        first: PathBuf,
        second: PathBuf,
        dest: PathBuf,
        cancel: CancelFlag,
    ) -> Result<CompactionReport> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.merge(&first, &second, &dest, &cancel))
            .await
            .map_err(|e| Error::Background(e.to_string()))?
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reading
    // ─────────────────────────────────────────────────────────────────────────

    /// The summary and full headers of a stored body.
    pub fn read_headers(&self, path: impl AsRef<Path>) -> Result<(BodySummary, Vec<BlockHeader>)> {
        let mut set = BodyStreamSet::open(path.as_ref(), self.rules_checksum)?;
        let (summary, prefix) = set.get_start()?;

        let mut chain = HeaderChain::new(&prefix);
        let mut headers = Vec::new();
        while let Some(elem) = set.get_next_header()? {
            headers.push(chain.push(&elem));
        }
        Ok((summary, headers))
    }

    /// Load every element of a stored body into memory.
    pub fn read_body(&self, path: impl AsRef<Path>) -> Result<MemoryBody> {
        let mut set = BodyStreamSet::open(path.as_ref(), self.rules_checksum)?;
        let mut body = MemoryBody::new();
        body.dump(&mut set, &CancelFlag::new())?;
        Ok(body)
    }
}

impl Default for Compactor {
    fn default() -> Self {
        Self::new(CompactorConfig::default())
    }
}

//! Reference-base lookup.
//!
//! The detailed output profile wants the reference base at each column.
//! Lookups are best-effort: an absent reference, an unknown contig, or a
//! position beyond the contig's length all degrade to `N` at the formatting
//! layer, never aborting a row.

use crate::core::errors::Result;
use log::info;
use rust_htslib::faidx;
use std::path::Path;

/// Best-effort access to the reference base at a position.
pub trait ReferenceLookup {
    /// The base at a 0-based position, or `None` when unavailable.
    fn base_at(&self, contig: &str, pos: u32) -> Option<u8>;
}

/// Indexed FASTA-backed lookup.
pub struct FastaLookup {
    reader: faidx::Reader,
}

impl FastaLookup {
    /// Open a FASTA file, building the `.fai` index if htslib needs to.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Using reference FASTA: {}", path.as_ref().display());
        let reader = faidx::Reader::from_path(path)?;
        Ok(Self { reader })
    }
}

impl ReferenceLookup for FastaLookup {
    fn base_at(&self, contig: &str, pos: u32) -> Option<u8> {
        // A fetch past the contig end comes back empty rather than as an
        // error, so both failure modes funnel through the same None.
        self.reader
            .fetch_seq(contig, pos as usize, pos as usize)
            .ok()
            .and_then(|seq| seq.first().copied())
    }
}

/// Lookup used when no reference was provided: everything is unknown.
pub struct NoReference;

impl ReferenceLookup for NoReference {
    fn base_at(&self, _contig: &str, _pos: u32) -> Option<u8> {
        None
    }
}

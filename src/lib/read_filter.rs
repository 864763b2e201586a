//! Read filtering applied at the pileup boundary.
//!
//! Reads rejected here are dropped before the column is assembled, so they
//! contribute to no counter and no depth figure.

use rust_htslib::bam::pileup::Alignment;
use rust_htslib::bam::record::Record;

/// A trait for filtering reads based on various criteria.
///
/// Implementations return `true` if the read passes the filter and `false`
/// otherwise.
pub trait ReadFilter {
    /// Filter a read, returning `false` to exclude it from the column.
    fn filter_read(&self, read: &Record, alignment: Option<&Alignment>) -> bool;
}

/// A straightforward read filter based on mapping quality.
pub struct DefaultReadFilter {
    /// Minimum mapping quality for a read to pass filtering.
    min_mapq: u8,
}

impl DefaultReadFilter {
    /// Create a new [`DefaultReadFilter`] with the specified criteria.
    pub fn new(min_mapq: u8) -> Self {
        Self { min_mapq }
    }
}

impl ReadFilter for DefaultReadFilter {
    /// Filter reads based on mapping quality.
    #[inline(always)]
    fn filter_read(&self, read: &Record, _alignment: Option<&Alignment>) -> bool {
        read.mapq() >= self.min_mapq
    }
}

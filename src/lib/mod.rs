//! bamtally: per-position allele tallies across multiple alignment files.
//!
//! The library walks pileup columns in genomic order and, for every covered
//! position, tallies how many reads support each allele (A, C, G, T,
//! deletion, insertion) per input file ("sample") and in aggregate, then
//! renders one tab-separated row per non-empty column.
//!
//! # Modules
//!
//! - [`sample`]: stable ordinal registry for input sources
//! - [`engine`]: observation classification, coverage accumulation, row
//!   formatting
//! - [`reference`]: reference-base lookup with graceful `N` degradation
//! - [`source`]: multi-BAM pileup merging and region handling
//! - [`pipeline`]: the column-at-a-time run loop
//! - [`read_filter`]: read-level filtering applied at the pileup boundary
//! - [`core`]: errors, I/O, and filesystem plumbing

pub mod core;
pub mod engine;
pub mod pipeline;
pub mod read_filter;
pub mod reference;
pub mod sample;
pub mod source;

pub mod prelude {
    pub use super::core::errors::{is_broken_pipe, Result, TallyError};
    pub use super::core::fs::{is_bgzipped, make_parent_dirs};
    pub use super::core::io::get_writer;
    pub use super::engine::column::{Observation, ObservedBase, PileupColumn, PileupSource};
    pub use super::engine::coverage::CoverageAccumulator;
    pub use super::engine::format::{OutputProfile, RowFormatter};
    pub use super::read_filter::{DefaultReadFilter, ReadFilter};
    pub use super::reference::{FastaLookup, NoReference, ReferenceLookup};
    pub use super::sample::SampleRegistry;
}

//! Alignment-backed pileup column production.
//!
//! This is the collaborator side of the engine: opening the input files,
//! merging their per-file pileups in genomic order, and turning htslib
//! alignments into [`crate::engine::column::Observation`]s.

mod bam;
mod region;

pub use bam::MultiBamSource;
pub use region::Region;

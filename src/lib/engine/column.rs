//! Pileup columns and the observations they carry.
//!
//! A [`PileupColumn`] is one reference position plus the ordered list of
//! aligned-base observations overlapping it. Columns are produced by a
//! [`PileupSource`] in ascending genomic order, consumed read-only by the
//! engine, and discarded once their row is rendered.

use crate::core::errors::Result;
use smartstring::{alias::String as SmString, LazyCompact, SmartString};

/// What one read shows at the column's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedBase {
    /// The raw base byte from the read (any case, any letter).
    Base(u8),
    /// The read is gapped at this position.
    Deletion,
}

/// One aligned-base observation at one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Dense sample ordinal, resolved by the source at column assembly time.
    pub sample: u32,
    pub base: ObservedBase,
    /// Raw encoded quality byte (ASCII Phred+33). Unused for deletions.
    pub raw_quality: u8,
    /// Sequence inserted immediately after this position, when the read
    /// carries one. Independent of the base call at the position itself.
    pub insertion: Option<SmString>,
}

impl Observation {
    /// A base observation with no trailing insertion.
    pub fn base(sample: u32, base: u8, raw_quality: u8) -> Self {
        Self {
            sample,
            base: ObservedBase::Base(base),
            raw_quality,
            insertion: None,
        }
    }

    /// A deletion observation. Deletions carry no base quality.
    pub fn deletion(sample: u32) -> Self {
        Self {
            sample,
            base: ObservedBase::Deletion,
            raw_quality: 0,
            insertion: None,
        }
    }

    /// Attach an insertion allele to this observation.
    pub fn with_insertion<S: AsRef<str>>(mut self, allele: S) -> Self {
        self.insertion = Some(SmString::from(allele.as_ref()));
        self
    }
}

/// One reference position and every observation overlapping it.
#[derive(Debug, Clone, Default)]
pub struct PileupColumn {
    /// Reference sequence name.
    pub ref_name: SmartString<LazyCompact>,
    /// 0-based position on the reference.
    pub pos: u32,
    /// Observations in sample-then-read order.
    pub observations: Vec<Observation>,
}

impl PileupColumn {
    pub fn new<S: AsRef<str>>(ref_name: S, pos: u32) -> Self {
        Self {
            ref_name: SmartString::from(ref_name.as_ref()),
            pos,
            observations: Vec::new(),
        }
    }

    /// Total depth: the literal observation count, classifiable or not.
    #[inline]
    pub fn depth(&self) -> usize {
        self.observations.len()
    }
}

/// A finite, position-ordered, forward-only stream of pileup columns.
///
/// One column is fully visited before the next is produced; stopping early is
/// simply returning an error from the callback.
pub trait PileupSource {
    fn visit_columns<F>(&mut self, visit: F) -> Result<()>
    where
        F: FnMut(&PileupColumn) -> Result<()>;
}

/// In-memory source over pre-built columns.
///
/// The production path uses [`crate::source::MultiBamSource`]; this exists
/// for exercising the engine without alignment files.
#[derive(Debug, Default)]
pub struct VecSource {
    columns: Vec<PileupColumn>,
}

impl VecSource {
    pub fn new(columns: Vec<PileupColumn>) -> Self {
        Self { columns }
    }
}

impl PileupSource for VecSource {
    fn visit_columns<F>(&mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(&PileupColumn) -> Result<()>,
    {
        for column in &self.columns {
            visit(column)?;
        }
        Ok(())
    }
}

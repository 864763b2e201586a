//! Observation classification.
//!
//! A pure mapping from one observation to a closed allele category plus a
//! normalized quality. The closed enum makes the "base letter outside
//! A/C/G/T" outcome an explicit, auditable case instead of an if/else
//! fallthrough.

use crate::engine::column::{Observation, ObservedBase};

/// Quality offset of the ASCII Phred encoding.
pub const PHRED_OFFSET: i32 = 33;

/// Quality reported for categories that carry no base quality.
pub const QUAL_NOT_APPLICABLE: i32 = -1;

/// Closed set of allele categories for a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseClass {
    A,
    C,
    G,
    T,
    Deletion,
    /// A base letter outside `{A,C,G,T}` (e.g. `N`). Present in depth,
    /// absent from every per-base counter.
    Unclassified,
}

/// The classification of one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified<'a> {
    pub class: BaseClass,
    /// Phred-scaled quality (`raw - 33`), signed and unclamped: a malformed
    /// raw byte below 33 legitimately yields a negative value. Deletions
    /// report [`QUAL_NOT_APPLICABLE`].
    pub quality: i32,
    /// Insertion allele starting right after this position, if any. Yielded
    /// independently of the base category: an `A` followed by an insertion
    /// produces both an A update and an insertion update.
    pub insertion: Option<&'a str>,
}

/// Classify one observation. Base letters are matched case-insensitively.
pub fn classify(observation: &Observation) -> Classified<'_> {
    match observation.base {
        ObservedBase::Deletion => Classified {
            class: BaseClass::Deletion,
            quality: QUAL_NOT_APPLICABLE,
            // A deletion has no base at this position, so no following
            // insertion is attributed to it either.
            insertion: None,
        },
        ObservedBase::Base(letter) => {
            let class = match letter.to_ascii_uppercase() {
                b'A' => BaseClass::A,
                b'C' => BaseClass::C,
                b'G' => BaseClass::G,
                b'T' => BaseClass::T,
                _ => BaseClass::Unclassified,
            };
            Classified {
                class,
                quality: observation.raw_quality as i32 - PHRED_OFFSET,
                insertion: observation.insertion.as_deref(),
            }
        }
    }
}

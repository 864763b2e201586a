//! Stable ordinal registry for input sources.
//!
//! Each input file is a "sample". The registry assigns dense ordinals
//! `0..N-1` in input order, once, before any column is processed; every
//! observation afterwards carries one of those ordinals. Keeping the mapping
//! fixed up front means an unregistered identifier can only surface as the
//! defined [`TallyError::UnknownSample`] contract violation, never as a
//! silently-minted new slot mid-run.

use crate::core::errors::{Result, TallyError};
use rustc_hash::FxHashMap;
use smartstring::alias::String as SmString;

/// Immutable mapping from source identifier to dense sample ordinal.
#[derive(Debug, Clone)]
pub struct SampleRegistry {
    /// Identifiers in registration order; the ordinal is the index.
    names: Vec<SmString>,
    index: FxHashMap<SmString, u32>,
}

impl SampleRegistry {
    /// Build a registry from source identifiers in input order.
    ///
    /// Duplicate identifiers are rejected: two entries sharing an ordinal
    /// would silently pool their counts.
    pub fn from_sources<I, S>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        let mut index = FxHashMap::default();
        for source in sources {
            let name = SmString::from(source.as_ref());
            let ordinal = names.len() as u32;
            if index.insert(name.clone(), ordinal).is_some() {
                return Err(TallyError::InvalidInput(format!(
                    "duplicate input source {:?}",
                    source.as_ref()
                )));
            }
            names.push(name);
        }
        Ok(Self { names, index })
    }

    /// Ordinal assigned to an identifier, if registered.
    #[inline]
    pub fn resolve(&self, name: &str) -> Option<u32> {
        self.index.get(name).copied()
    }

    /// Identifier registered under an ordinal.
    #[inline]
    pub fn name(&self, ordinal: u32) -> Option<&str> {
        self.names.get(ordinal as usize).map(|n| n.as_str())
    }

    /// Number of registered samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate identifiers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.as_str())
    }
}

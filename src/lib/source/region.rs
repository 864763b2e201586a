//! Genomic region parsing for the `--region` flag.

use crate::core::errors::TallyError;
use std::fmt;
use std::str::FromStr;

/// A restriction to one contig, optionally bounded.
///
/// Parsed from `chr`, `chr:start`, or `chr:start-end` (1-based inclusive on
/// the command line); stored 0-based half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub contig: String,
    /// 0-based inclusive start, when bounded.
    pub start: Option<u32>,
    /// 0-based exclusive end, when bounded.
    pub end: Option<u32>,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (Some(start), Some(end)) => write!(f, "{}:{}-{}", self.contig, start + 1, end),
            (Some(start), None) => write!(f, "{}:{}", self.contig, start + 1),
            _ => write!(f, "{}", self.contig),
        }
    }
}

impl FromStr for Region {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TallyError::InvalidRegion {
            region: s.to_string(),
            reason: reason.to_string(),
        };

        let (contig, range) = match s.split_once(':') {
            Some((contig, range)) => (contig, Some(range)),
            None => (s, None),
        };
        if contig.is_empty() {
            return Err(invalid("empty contig name"));
        }

        let (start, end) = match range {
            None => (None, None),
            Some(range) => {
                // Accept both `start-end` and the `start..end` range style.
                let normalized = range.replace("..", "-");
                let (raw_start, raw_end) = match normalized.split_once('-') {
                    Some((a, b)) => (a, Some(b)),
                    None => (normalized.as_str(), None),
                };
                let start: u32 = raw_start
                    .parse()
                    .map_err(|_| invalid("start is not a number"))?;
                if start == 0 {
                    return Err(invalid("coordinates are 1-based"));
                }
                let end = match raw_end {
                    Some("") | None => None,
                    Some(raw) => {
                        let end: u32 = raw.parse().map_err(|_| invalid("end is not a number"))?;
                        if end < start {
                            return Err(invalid("end precedes start"));
                        }
                        Some(end)
                    }
                };
                (Some(start - 1), end)
            }
        };

        Ok(Region {
            contig: contig.to_string(),
            start,
            end,
        })
    }
}

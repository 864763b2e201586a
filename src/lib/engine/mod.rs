//! The per-column tally engine.
//!
//! [`column`] defines the data the engine consumes, [`classify`] turns one
//! observation into a closed allele category, [`coverage`] accumulates
//! per-sample and aggregate records, and [`format`] renders the accumulated
//! records as output rows.

pub mod classify;
pub mod column;
pub mod coverage;
pub mod format;

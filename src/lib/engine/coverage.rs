//! Per-sample and aggregate coverage accumulation.
//!
//! The accumulator holds one [`SampleCoverage`] record per registered sample
//! plus one aggregate record in the last slot. Records are allocated once for
//! the run and re-zeroed at every column boundary, so each emitted row
//! depends only on its own column's observations.

use crate::core::errors::{Result, TallyError};
use crate::engine::classify::{classify, BaseClass, QUAL_NOT_APPLICABLE};
use crate::engine::column::Observation;
use smartstring::alias::String as SmString;

/// Running allele tallies for one sample (or the aggregate) at one position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleCoverage {
    pub a_count: u32,
    pub c_count: u32,
    pub g_count: u32,
    pub t_count: u32,
    pub deletion_count: u32,
    pub insertion_count: u32,

    pub a_qual_sum: i64,
    pub c_qual_sum: i64,
    pub g_qual_sum: i64,
    pub t_qual_sum: i64,
    /// Deletions carry no base quality; this holds the sentinel once any
    /// deletion is seen and is rendered as `.` regardless.
    pub deletion_quality: i64,

    /// Insertion alleles in observation order, not deduplicated.
    pub insertion_alleles: Vec<SmString>,
}

impl SampleCoverage {
    /// Zero every field, keeping the allele list's allocation.
    fn reset(&mut self) {
        let alleles = std::mem::take(&mut self.insertion_alleles);
        *self = SampleCoverage::default();
        self.insertion_alleles = alleles;
        self.insertion_alleles.clear();
    }

    /// Apply one classified update to this record.
    fn update(&mut self, class: BaseClass, quality: i64, insertion: Option<&str>) {
        match class {
            BaseClass::A => {
                self.a_count += 1;
                self.a_qual_sum += quality;
            }
            BaseClass::C => {
                self.c_count += 1;
                self.c_qual_sum += quality;
            }
            BaseClass::G => {
                self.g_count += 1;
                self.g_qual_sum += quality;
            }
            BaseClass::T => {
                self.t_count += 1;
                self.t_qual_sum += quality;
            }
            BaseClass::Deletion => {
                self.deletion_count += 1;
                self.deletion_quality = QUAL_NOT_APPLICABLE as i64;
            }
            // Present in depth, absent from every counter.
            BaseClass::Unclassified => {}
        }
        if let Some(allele) = insertion {
            self.insertion_count += 1;
            self.insertion_alleles.push(SmString::from(allele));
        }
    }
}

/// The aggregation engine: `sample_count` per-sample records plus the
/// aggregate record in the final slot.
#[derive(Debug)]
pub struct CoverageAccumulator {
    records: Vec<SampleCoverage>,
}

impl CoverageAccumulator {
    /// Allocate records for `sample_count` samples plus the aggregate slot.
    pub fn new(sample_count: usize) -> Self {
        Self {
            records: vec![SampleCoverage::default(); sample_count + 1],
        }
    }

    /// Number of per-sample records (the aggregate slot excluded).
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.records.len() - 1
    }

    /// Re-zero every record. Called at each column boundary.
    pub fn reset(&mut self) {
        for record in &mut self.records {
            record.reset();
        }
    }

    /// Route one observation to its sample's record and the aggregate.
    ///
    /// The same update is applied to both records; within a single record
    /// nothing is ever double-counted. An insertion update happens regardless
    /// of whether the observation also incremented a base-letter counter.
    pub fn apply(&mut self, observation: &Observation) -> Result<()> {
        let ordinal = observation.sample as usize;
        if ordinal >= self.sample_count() {
            return Err(TallyError::UnknownSample {
                ordinal: observation.sample,
                registered: self.sample_count(),
            });
        }

        let classified = classify(observation);
        let quality = classified.quality as i64;
        let aggregate = self.records.len() - 1;
        self.records[ordinal].update(classified.class, quality, classified.insertion);
        self.records[aggregate].update(classified.class, quality, classified.insertion);
        Ok(())
    }

    /// Record for one sample ordinal.
    #[inline]
    pub fn sample(&self, ordinal: usize) -> &SampleCoverage {
        &self.records[ordinal]
    }

    /// The aggregate record (last slot).
    #[inline]
    pub fn aggregate(&self) -> &SampleCoverage {
        &self.records[self.records.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::column::Observation;

    fn apply_all(acc: &mut CoverageAccumulator, observations: &[Observation]) {
        for observation in observations {
            acc.apply(observation).unwrap();
        }
    }

    #[test]
    fn aggregate_equals_elementwise_sample_sum() {
        let mut acc = CoverageAccumulator::new(3);
        apply_all(
            &mut acc,
            &[
                Observation::base(0, b'A', 70),
                Observation::base(0, b'a', 65),
                Observation::base(1, b'C', 60).with_insertion("AT"),
                Observation::base(1, b'g', 50),
                Observation::base(2, b'T', 40),
                Observation::deletion(2),
            ],
        );

        let agg = acc.aggregate();
        let sum = |f: fn(&SampleCoverage) -> u32| (0..3).map(|i| f(acc.sample(i))).sum::<u32>();
        assert_eq!(agg.a_count, sum(|r| r.a_count));
        assert_eq!(agg.c_count, sum(|r| r.c_count));
        assert_eq!(agg.g_count, sum(|r| r.g_count));
        assert_eq!(agg.t_count, sum(|r| r.t_count));
        assert_eq!(agg.deletion_count, sum(|r| r.deletion_count));
        assert_eq!(agg.insertion_count, sum(|r| r.insertion_count));

        let qsum = |f: fn(&SampleCoverage) -> i64| (0..3).map(|i| f(acc.sample(i))).sum::<i64>();
        assert_eq!(agg.a_qual_sum, qsum(|r| r.a_qual_sum));
        assert_eq!(agg.c_qual_sum, qsum(|r| r.c_qual_sum));
        assert_eq!(agg.g_qual_sum, qsum(|r| r.g_qual_sum));
        assert_eq!(agg.t_qual_sum, qsum(|r| r.t_qual_sum));
    }

    #[test]
    fn aggregate_allele_list_is_sample_then_observation_order() {
        let mut acc = CoverageAccumulator::new(2);
        apply_all(
            &mut acc,
            &[
                Observation::base(0, b'A', 70).with_insertion("AC"),
                Observation::base(0, b'A', 70).with_insertion("AC"),
                Observation::base(1, b'C', 70).with_insertion("GGG"),
            ],
        );
        assert_eq!(acc.sample(0).insertion_alleles, vec!["AC", "AC"]);
        assert_eq!(acc.sample(1).insertion_alleles, vec!["GGG"]);
        assert_eq!(acc.aggregate().insertion_alleles, vec!["AC", "AC", "GGG"]);
        assert_eq!(acc.aggregate().insertion_count, 3);
    }

    #[test]
    fn base_with_insertion_updates_both_counters() {
        let mut acc = CoverageAccumulator::new(1);
        acc.apply(&Observation::base(0, b'a', 68).with_insertion("T"))
            .unwrap();
        let record = acc.sample(0);
        assert_eq!(record.a_count, 1);
        assert_eq!(record.a_qual_sum, 35);
        assert_eq!(record.insertion_count, 1);
        assert_eq!(record.insertion_alleles, vec!["T"]);
    }

    #[test]
    fn deletion_touches_no_base_counter() {
        let mut acc = CoverageAccumulator::new(1);
        acc.apply(&Observation::deletion(0)).unwrap();
        let record = acc.sample(0);
        assert_eq!(
            (record.a_count, record.c_count, record.g_count, record.t_count),
            (0, 0, 0, 0)
        );
        assert_eq!(record.deletion_count, 1);
        assert_eq!(record.deletion_quality, -1);
        assert_eq!(acc.aggregate().deletion_count, 1);
    }

    #[test]
    fn unclassified_letters_mutate_nothing() {
        let mut acc = CoverageAccumulator::new(1);
        acc.apply(&Observation::base(0, b'N', 70)).unwrap();
        assert_eq!(acc.sample(0), &SampleCoverage::default());
        assert_eq!(acc.aggregate(), &SampleCoverage::default());
    }

    #[test]
    fn unknown_sample_is_fatal() {
        let mut acc = CoverageAccumulator::new(2);
        let err = acc.apply(&Observation::base(7, b'A', 70)).unwrap_err();
        assert!(matches!(
            err,
            TallyError::UnknownSample {
                ordinal: 7,
                registered: 2
            }
        ));
    }

    #[test]
    fn reset_clears_state_between_columns() {
        let mut acc = CoverageAccumulator::new(1);
        apply_all(
            &mut acc,
            &[
                Observation::base(0, b'A', 70).with_insertion("AAA"),
                Observation::deletion(0),
            ],
        );
        acc.reset();
        assert_eq!(acc.sample(0), &SampleCoverage::default());
        assert_eq!(acc.aggregate(), &SampleCoverage::default());
        assert!(acc.aggregate().insertion_alleles.is_empty());
    }
}

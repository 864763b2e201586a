//! Row rendering for the two output profiles.
//!
//! The formatter turns one column's accumulated records into a vector of
//! top-level fields; the caller writes them tab-separated through an explicit
//! sink. For a fixed profile and sample count the header and every data row
//! have the same field count.

use crate::engine::column::{ObservedBase, PileupColumn};
use crate::engine::coverage::{CoverageAccumulator, SampleCoverage};
use smartstring::alias::String as SmString;

/// Placeholder for empty allele lists and inapplicable qualities.
const EMPTY_FIELD: &str = ".";

/// Which fixed-column layout a run emits. Selected once, never per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputProfile {
    /// Full layout: reference base, depth breakdown, aggregate insertion
    /// alleles, and per-sample insertion detail.
    Detailed,
    /// Compact layout: aggregate counts and quality sums plus per-sample
    /// base sub-fields, no insertion detail.
    Lightweight,
}

/// Renders the header row and one data row per non-empty column.
#[derive(Debug)]
pub struct RowFormatter {
    profile: OutputProfile,
    sample_count: usize,
}

impl RowFormatter {
    pub fn new(profile: OutputProfile, sample_count: usize) -> Self {
        Self {
            profile,
            sample_count,
        }
    }

    /// Header fields for the active profile.
    pub fn header(&self) -> Vec<String> {
        let mut fields: Vec<String> = match self.profile {
            OutputProfile::Detailed => [
                "#chrom", "start", "end", "ref", "depth", "r_depth", "a_depth", "num_A", "num_C",
                "num_G", "num_T", "num_D", "num_I", "totQ_A", "totQ_C", "totQ_G", "totQ_T",
                "all_ins",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            OutputProfile::Lightweight => [
                "#chrom", "start", "end", "num_A", "num_C", "num_G", "num_T", "num_D", "totQ_A",
                "totQ_C", "totQ_G", "totQ_T", "totQ_D",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        };
        for i in 0..self.sample_count {
            fields.push(format!("sample_{}", i + 1));
        }
        fields
    }

    /// Data row fields for one non-empty column.
    ///
    /// `ref_base` is only consulted by the detailed profile; callers without
    /// a reference pass `b'N'`.
    pub fn row(
        &self,
        column: &PileupColumn,
        ref_base: u8,
        accumulator: &CoverageAccumulator,
    ) -> Vec<String> {
        let aggregate = accumulator.aggregate();
        let mut fields = Vec::with_capacity(self.header_len());
        fields.push(column.ref_name.to_string());
        fields.push(column.pos.to_string());
        fields.push((column.pos + 1).to_string());

        match self.profile {
            OutputProfile::Detailed => {
                let (ref_depth, alt_depth) = split_depth(column, ref_base);
                fields.push((ref_base as char).to_string());
                fields.push(column.depth().to_string());
                fields.push(ref_depth.to_string());
                fields.push(alt_depth.to_string());
                fields.push(aggregate.a_count.to_string());
                fields.push(aggregate.c_count.to_string());
                fields.push(aggregate.g_count.to_string());
                fields.push(aggregate.t_count.to_string());
                fields.push(aggregate.deletion_count.to_string());
                fields.push(aggregate.insertion_count.to_string());
                fields.push(aggregate.a_qual_sum.to_string());
                fields.push(aggregate.c_qual_sum.to_string());
                fields.push(aggregate.g_qual_sum.to_string());
                fields.push(aggregate.t_qual_sum.to_string());
                fields.push(join_alleles(&aggregate.insertion_alleles));
                for i in 0..self.sample_count {
                    fields.push(detailed_sample_field(accumulator.sample(i)));
                }
            }
            OutputProfile::Lightweight => {
                fields.push(aggregate.a_count.to_string());
                fields.push(aggregate.c_count.to_string());
                fields.push(aggregate.g_count.to_string());
                fields.push(aggregate.t_count.to_string());
                fields.push(aggregate.deletion_count.to_string());
                fields.push(aggregate.a_qual_sum.to_string());
                fields.push(aggregate.c_qual_sum.to_string());
                fields.push(aggregate.g_qual_sum.to_string());
                fields.push(aggregate.t_qual_sum.to_string());
                fields.push(EMPTY_FIELD.to_string());
                for i in 0..self.sample_count {
                    fields.push(lightweight_sample_field(accumulator.sample(i)));
                }
            }
        }
        fields
    }

    fn header_len(&self) -> usize {
        let fixed = match self.profile {
            OutputProfile::Detailed => 18,
            OutputProfile::Lightweight => 13,
        };
        fixed + self.sample_count
    }
}

/// Count observations matching the reference base (case-insensitive) versus
/// everything else. Deletions always land on the alt side.
fn split_depth(column: &PileupColumn, ref_base: u8) -> (usize, usize) {
    let ref_depth = column
        .observations
        .iter()
        .filter(|obs| match obs.base {
            ObservedBase::Base(letter) => letter.eq_ignore_ascii_case(&ref_base),
            ObservedBase::Deletion => false,
        })
        .count();
    (ref_depth, column.depth() - ref_depth)
}

/// Comma-join an allele list, or `.` when empty.
fn join_alleles(alleles: &[SmString]) -> String {
    if alleles.is_empty() {
        EMPTY_FIELD.to_string()
    } else {
        alleles
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Per-sample composite field with insertion detail:
/// `a|totQa,c|totQc,g|totQg,t|totQt,d|.,i|alleles`.
fn detailed_sample_field(record: &SampleCoverage) -> String {
    format!(
        "{}|{},{}|{},{}|{},{}|{},{}|{},{}|{}",
        record.a_count,
        record.a_qual_sum,
        record.c_count,
        record.c_qual_sum,
        record.g_count,
        record.g_qual_sum,
        record.t_count,
        record.t_qual_sum,
        record.deletion_count,
        EMPTY_FIELD,
        record.insertion_count,
        join_alleles(&record.insertion_alleles),
    )
}

/// Per-sample composite field without insertion detail:
/// `a|totQa,c|totQc,g|totQg,t|totQt,d|.`.
fn lightweight_sample_field(record: &SampleCoverage) -> String {
    format!(
        "{}|{},{}|{},{}|{},{}|{},{}|{}",
        record.a_count,
        record.a_qual_sum,
        record.c_count,
        record.c_qual_sum,
        record.g_count,
        record.g_qual_sum,
        record.t_count,
        record.t_qual_sum,
        record.deletion_count,
        EMPTY_FIELD,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::column::Observation;

    fn accumulate(sample_count: usize, observations: &[Observation]) -> CoverageAccumulator {
        let mut acc = CoverageAccumulator::new(sample_count);
        acc.reset();
        for observation in observations {
            acc.apply(observation).unwrap();
        }
        acc
    }

    fn column_with(observations: &[Observation]) -> PileupColumn {
        let mut column = PileupColumn::new("chr1", 100);
        column.observations = observations.to_vec();
        column
    }

    #[test]
    fn lightweight_row_matches_reference_scenario() {
        let observations = vec![
            Observation::base(0, b'A', 40),
            Observation::base(0, b'A', 35),
            Observation::base(0, b'C', 30),
        ];
        let column = column_with(&observations);
        let acc = accumulate(1, &observations);
        let formatter = RowFormatter::new(OutputProfile::Lightweight, 1);
        let row = formatter.row(&column, b'N', &acc);
        assert_eq!(
            row.join("\t"),
            "chr1\t100\t101\t2\t1\t0\t0\t0\t9\t-3\t0\t0\t.\t2|9,1|-3,0|0,0|0,0|."
        );
    }

    #[test]
    fn header_and_row_field_counts_match() {
        let observations = vec![
            Observation::base(0, b'A', 70),
            Observation::base(1, b'g', 70).with_insertion("ATG"),
            Observation::deletion(1),
        ];
        let column = column_with(&observations);
        let acc = accumulate(2, &observations);
        for profile in [OutputProfile::Detailed, OutputProfile::Lightweight] {
            let formatter = RowFormatter::new(profile, 2);
            assert_eq!(
                formatter.header().len(),
                formatter.row(&column, b'N', &acc).len()
            );
        }
    }

    #[test]
    fn detailed_row_renders_counts_and_alleles() {
        let observations = vec![
            Observation::base(0, b'A', 70),
            Observation::base(0, b'a', 65).with_insertion("TT"),
            Observation::base(1, b'C', 60),
            Observation::deletion(1),
        ];
        let column = column_with(&observations);
        let acc = accumulate(2, &observations);
        let formatter = RowFormatter::new(OutputProfile::Detailed, 2);
        let row = formatter.row(&column, b'A', &acc);

        assert_eq!(&row[0..5], &["chr1", "100", "101", "A", "4"]);
        // Two A reads match the reference; the C and the deletion are alt.
        assert_eq!(&row[5..7], &["2", "2"]);
        // Aggregate counts: A, C, G, T, D, I.
        assert_eq!(&row[7..13], &["2", "1", "0", "0", "1", "1"]);
        // Aggregate quality sums: 37+32, 27, 0, 0.
        assert_eq!(&row[13..17], &["69", "27", "0", "0"]);
        assert_eq!(row[17], "TT");
        assert_eq!(row[18], "2|69,0|0,0|0,0|0,0|.,1|TT");
        assert_eq!(row[19], "0|0,1|27,0|0,0|0,1|.,0|.");
    }

    #[test]
    fn unknown_reference_sends_all_real_bases_to_alt() {
        let observations = vec![
            Observation::base(0, b'A', 70),
            Observation::base(0, b'C', 70),
            Observation::deletion(0),
        ];
        let column = column_with(&observations);
        let acc = accumulate(1, &observations);
        let formatter = RowFormatter::new(OutputProfile::Detailed, 1);
        let row = formatter.row(&column, b'N', &acc);
        assert_eq!(row[3], "N");
        assert_eq!(&row[4..7], &["3", "0", "3"]);
    }

    #[test]
    fn literal_n_read_base_matches_unknown_reference() {
        let observations = vec![Observation::base(0, b'n', 70)];
        let column = column_with(&observations);
        let acc = accumulate(1, &observations);
        let formatter = RowFormatter::new(OutputProfile::Detailed, 1);
        let row = formatter.row(&column, b'N', &acc);
        assert_eq!(&row[4..7], &["1", "1", "0"]);
    }

    #[test]
    fn detailed_header_layout() {
        let formatter = RowFormatter::new(OutputProfile::Detailed, 2);
        let header = formatter.header();
        assert_eq!(header[0], "#chrom");
        assert_eq!(header[17], "all_ins");
        assert_eq!(header[18], "sample_1");
        assert_eq!(header[19], "sample_2");
        assert_eq!(header.len(), 20);
    }
}

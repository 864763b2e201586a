//! The column-at-a-time run loop.
//!
//! Strictly sequential: each column is fully accumulated and rendered before
//! the next is requested from the source. The accumulator is owned here and
//! handed to the traversal closure by mutable reference for the duration of
//! the run; no state survives a column boundary except the registry, which is
//! read-only.

use crate::core::errors::Result;
use crate::engine::column::PileupSource;
use crate::engine::coverage::CoverageAccumulator;
use crate::engine::format::{OutputProfile, RowFormatter};
use crate::reference::ReferenceLookup;
use crate::sample::SampleRegistry;
use std::io::Write;

/// Drive a pileup source through accumulation and formatting into `writer`.
///
/// The header row is written exactly once, before any data row. Columns with
/// zero observations are suppressed. The reference is consulted only in the
/// detailed profile.
pub fn run<S, W>(
    source: &mut S,
    registry: &SampleRegistry,
    reference: &dyn ReferenceLookup,
    profile: OutputProfile,
    writer: &mut csv::Writer<W>,
) -> Result<()>
where
    S: PileupSource,
    W: Write,
{
    let formatter = RowFormatter::new(profile, registry.len());
    writer.write_record(formatter.header())?;

    let mut accumulator = CoverageAccumulator::new(registry.len());
    source.visit_columns(|column| {
        if column.observations.is_empty() {
            return Ok(());
        }
        accumulator.reset();
        for observation in &column.observations {
            accumulator.apply(observation)?;
        }
        let ref_base = match profile {
            OutputProfile::Detailed => reference
                .base_at(&column.ref_name, column.pos)
                .unwrap_or(b'N'),
            OutputProfile::Lightweight => b'N',
        };
        writer.write_record(formatter.row(column, ref_base, &accumulator))?;
        Ok(())
    })?;

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::TallyError;
    use crate::engine::column::{Observation, PileupColumn, VecSource};
    use crate::reference::NoReference;

    fn tsv_writer() -> csv::Writer<Vec<u8>> {
        csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(Vec::new())
    }

    fn lines(writer: csv::Writer<Vec<u8>>) -> Vec<String> {
        let bytes = writer.into_inner().unwrap();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    fn column(pos: u32, observations: Vec<Observation>) -> PileupColumn {
        let mut column = PileupColumn::new("chr1", pos);
        column.observations = observations;
        column
    }

    #[test]
    fn emits_header_even_without_columns() {
        let registry = SampleRegistry::from_sources(["s1.bam"]).unwrap();
        let mut source = VecSource::default();
        let mut writer = tsv_writer();
        run(
            &mut source,
            &registry,
            &NoReference,
            OutputProfile::Lightweight,
            &mut writer,
        )
        .unwrap();
        let lines = lines(writer);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("#chrom\tstart\tend"));
    }

    #[test]
    fn suppresses_empty_columns() {
        let registry = SampleRegistry::from_sources(["s1.bam"]).unwrap();
        let mut source = VecSource::new(vec![
            column(10, vec![Observation::base(0, b'A', 70)]),
            column(11, Vec::new()),
            column(12, vec![Observation::base(0, b'C', 70)]),
        ]);
        let mut writer = tsv_writer();
        run(
            &mut source,
            &registry,
            &NoReference,
            OutputProfile::Lightweight,
            &mut writer,
        )
        .unwrap();
        // Header plus one row per non-empty column.
        assert_eq!(lines(writer).len(), 3);
    }

    #[test]
    fn end_to_end_lightweight_single_sample() {
        let registry = SampleRegistry::from_sources(["s1.bam"]).unwrap();
        let mut source = VecSource::new(vec![column(
            100,
            vec![
                Observation::base(0, b'A', 40),
                Observation::base(0, b'A', 35),
                Observation::base(0, b'C', 30),
            ],
        )]);
        let mut writer = tsv_writer();
        run(
            &mut source,
            &registry,
            &NoReference,
            OutputProfile::Lightweight,
            &mut writer,
        )
        .unwrap();
        let lines = lines(writer);
        assert_eq!(
            lines[1],
            "chr1\t100\t101\t2\t1\t0\t0\t0\t9\t-3\t0\t0\t.\t2|9,1|-3,0|0,0|0,0|."
        );
    }

    #[test]
    fn detailed_without_reference_renders_n() {
        let registry = SampleRegistry::from_sources(["s1.bam", "s2.bam"]).unwrap();
        let mut source = VecSource::new(vec![column(
            7,
            vec![
                Observation::base(0, b'G', 63).with_insertion("ACG"),
                Observation::deletion(1),
            ],
        )]);
        let mut writer = tsv_writer();
        run(
            &mut source,
            &registry,
            &NoReference,
            OutputProfile::Detailed,
            &mut writer,
        )
        .unwrap();
        let lines = lines(writer);
        let fields: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(fields[3], "N");
        // depth 2, nothing matches N, deletion is alt as well.
        assert_eq!(&fields[4..7], &["2", "0", "2"]);
        assert_eq!(fields[17], "ACG");
        assert_eq!(fields[18], "0|0,0|0,1|30,0|0,0|.,1|ACG");
        assert_eq!(fields[19], "0|0,0|0,0|0,0|0,1|.,0|.");
        // Header and data row agree on field count.
        assert_eq!(lines[0].split('\t').count(), fields.len());
    }

    #[test]
    fn unknown_sample_aborts_the_run() {
        let registry = SampleRegistry::from_sources(["s1.bam"]).unwrap();
        let mut source = VecSource::new(vec![column(3, vec![Observation::base(9, b'A', 70)])]);
        let mut writer = tsv_writer();
        let err = run(
            &mut source,
            &registry,
            &NoReference,
            OutputProfile::Detailed,
            &mut writer,
        )
        .unwrap_err();
        assert!(matches!(err, TallyError::UnknownSample { ordinal: 9, .. }));
    }
}

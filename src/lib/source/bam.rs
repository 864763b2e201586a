//! Multi-BAM pileup merging.
//!
//! Each input file contributes one pileup stream; a k-way merge keyed on
//! `(tid, pos)` interleaves them into a single ascending sequence of
//! [`PileupColumn`]s whose observations carry the originating sample's
//! ordinal. Target dictionaries must agree across inputs so that tids are
//! comparable.

use crate::core::errors::{Result, TallyError};
use crate::engine::column::{Observation, PileupColumn, PileupSource};
use crate::read_filter::ReadFilter;
use crate::source::region::Region;
use log::info;
use rust_htslib::bam::{self, pileup::Indel, pileup::Pileup, HeaderView, Read};
use smartstring::{alias::String as SmString, LazyCompact, SmartString};
use std::iter::Peekable;
use std::path::PathBuf;

/// Quality offset applied when re-encoding htslib's numeric Phred scores as
/// raw quality bytes for the engine.
const PHRED_OFFSET: u8 = 33;

/// Produces merged pileup columns from one or more BAM/CRAM files.
pub struct MultiBamSource<F: ReadFilter> {
    paths: Vec<PathBuf>,
    region: Option<Region>,
    max_depth: u32,
    read_filter: F,
}

impl<F: ReadFilter> MultiBamSource<F> {
    pub fn new(
        paths: Vec<PathBuf>,
        region: Option<Region>,
        max_depth: u32,
        read_filter: F,
    ) -> Self {
        Self {
            paths,
            region,
            max_depth,
            read_filter,
        }
    }

    /// Merge the per-file pileup streams and hand each merged column to
    /// `visit` in ascending `(tid, pos)` order.
    fn merge<R, V>(&self, readers: &mut [R], mut visit: V) -> Result<()>
    where
        R: Read,
        V: FnMut(&PileupColumn) -> Result<()>,
    {
        if readers.is_empty() {
            return Ok(());
        }
        let headers: Vec<HeaderView> = readers.iter().map(|r| r.header().to_owned()).collect();
        validate_headers(&headers)?;
        let names = target_names(&headers[0]);

        let max_depth = self.max_depth.min(i32::MAX as u32);
        let mut streams: Vec<Peekable<bam::pileup::Pileups<'_, R>>> = readers
            .iter_mut()
            .map(|reader| {
                let mut pileups = reader.pileup();
                pileups.set_max_depth(max_depth);
                pileups.peekable()
            })
            .collect();

        loop {
            // Lowest (tid, pos) among the stream heads is the next column.
            let mut next: Option<(u32, u32)> = None;
            for stream in streams.iter_mut() {
                match stream.peek() {
                    Some(Ok(pileup)) => {
                        let key = (pileup.tid(), pileup.pos());
                        next = Some(match next {
                            Some(current) if current <= key => current,
                            _ => key,
                        });
                    }
                    Some(Err(_)) => {
                        let err = stream.next().unwrap().unwrap_err();
                        return Err(err.into());
                    }
                    None => {}
                }
            }
            let (tid, pos) = match next {
                Some(key) => key,
                None => break,
            };

            let mut column = PileupColumn::new(names[tid as usize].as_str(), pos);
            for (sample, stream) in streams.iter_mut().enumerate() {
                let at_head = matches!(
                    stream.peek(),
                    Some(Ok(pileup)) if pileup.tid() == tid && pileup.pos() == pos
                );
                if !at_head {
                    continue;
                }
                let pileup = stream.next().unwrap()?;
                self.collect_observations(sample as u32, &pileup, &mut column);
            }
            visit(&column)?;
        }
        Ok(())
    }

    /// Turn one file's pileup at a position into engine observations.
    fn collect_observations(&self, sample: u32, pileup: &Pileup, column: &mut PileupColumn) {
        for alignment in pileup.alignments() {
            let record = alignment.record();
            if !self.read_filter.filter_read(&record, Some(&alignment)) {
                continue;
            }
            // Both gapped states (CIGAR D and N) present no base here.
            if alignment.is_del() || alignment.is_refskip() {
                column.observations.push(Observation::deletion(sample));
                continue;
            }
            let qpos = match alignment.qpos() {
                Some(qpos) => qpos,
                None => continue,
            };
            let seq = record.seq();
            let raw_quality = record.qual()[qpos].saturating_add(PHRED_OFFSET);
            let mut observation = Observation::base(sample, seq[qpos], raw_quality);
            if let Indel::Ins(len) = alignment.indel() {
                let mut allele = SmString::new();
                for offset in 1..=len as usize {
                    allele.push(seq[qpos + offset] as char);
                }
                observation.insertion = Some(allele);
            }
            column.observations.push(observation);
        }
    }
}

impl<F: ReadFilter> PileupSource for MultiBamSource<F> {
    fn visit_columns<V>(&mut self, visit: V) -> Result<()>
    where
        V: FnMut(&PileupColumn) -> Result<()>,
    {
        match self.region.clone() {
            Some(region) => {
                info!("Restricting to region {}", region);
                let mut readers = Vec::with_capacity(self.paths.len());
                for path in &self.paths {
                    let mut reader = bam::IndexedReader::from_path(path)?;
                    fetch_region(&mut reader, &region)?;
                    readers.push(reader);
                }
                self.merge(&mut readers, visit)
            }
            None => {
                let mut readers = self
                    .paths
                    .iter()
                    .map(bam::Reader::from_path)
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                self.merge(&mut readers, visit)
            }
        }
    }
}

/// Point an indexed reader at the requested region.
fn fetch_region(reader: &mut bam::IndexedReader, region: &Region) -> Result<()> {
    let header = reader.header().to_owned();
    let tid = header
        .tid(region.contig.as_bytes())
        .ok_or_else(|| TallyError::InvalidRegion {
            region: region.to_string(),
            reason: format!("contig {:?} not in the BAM header", region.contig),
        })?;
    let start = i64::from(region.start.unwrap_or(0));
    let end = match region.end {
        Some(end) => i64::from(end),
        None => header.target_len(tid).unwrap_or(0) as i64,
    };
    reader.fetch((tid, start, end))?;
    Ok(())
}

/// All inputs must share one target dictionary, otherwise tids are not
/// comparable and the merge would interleave unrelated contigs.
fn validate_headers(headers: &[HeaderView]) -> Result<()> {
    let (first, rest) = match headers.split_first() {
        Some(split) => split,
        None => return Ok(()),
    };
    for (i, header) in rest.iter().enumerate() {
        if header.target_count() != first.target_count() {
            return Err(TallyError::HeaderMismatch(format!(
                "input {} declares {} targets, expected {}",
                i + 2,
                header.target_count(),
                first.target_count()
            )));
        }
        for tid in 0..first.target_count() {
            if header.tid2name(tid) != first.tid2name(tid) {
                return Err(TallyError::HeaderMismatch(format!(
                    "target {} is {:?} in input {}, expected {:?}",
                    tid,
                    String::from_utf8_lossy(header.tid2name(tid)),
                    i + 2,
                    String::from_utf8_lossy(first.tid2name(tid))
                )));
            }
        }
    }
    Ok(())
}

/// Target names in tid order.
fn target_names(header: &HeaderView) -> Vec<SmartString<LazyCompact>> {
    (0..header.target_count())
        .map(|tid| SmartString::from(String::from_utf8_lossy(header.tid2name(tid)).as_ref()))
        .collect()
}

//! # Per-position allele tallying
//!
//! Walks the merged pileup of one or more BAM/CRAM files and reports, for
//! every covered position, how many reads support each allele (A, C, G, T,
//! deletion, insertion) per input file and in aggregate, as a tab-separated
//! table.
//!
//! # Features
//!
//! - Multiple inputs, merged in genomic order, one output column per sample
//! - Optional region restriction backed by BAM indexes
//! - Optional reference FASTA for the `ref`/`r_depth`/`a_depth` columns
//! - Detailed (default) and lightweight (`--lite`) output layouts
//! - Automatic gzip compression for `.gz` output paths

use anyhow::{bail, Context, Result};
use bamtally_lib::pipeline;
use bamtally_lib::prelude::*;
use bamtally_lib::source::{MultiBamSource, Region};
use log::*;
use std::fs;
use std::path::PathBuf;
use structopt::StructOpt;

/// Tally per-position allele support across one or more alignment files.
#[derive(StructOpt)]
#[structopt(author, name = "bamtally")]
pub struct Tally {
    /// Input BAM/CRAM files to tally, one sample each.
    reads: Vec<PathBuf>,

    /// File listing additional inputs, one path per line.
    #[structopt(long, short = "l")]
    list: Option<PathBuf>,

    /// Output path (stdout when omitted; a .gz/.gzip/.bgzf extension enables compression).
    #[structopt(long, short = "o")]
    output: Option<PathBuf>,

    /// Restrict to a region: `chr`, `chr:start`, or `chr:start-end` (1-based, inclusive).
    /// Requires an index file next to each input.
    #[structopt(long, short = "r", parse(try_from_str))]
    region: Option<Region>,

    /// Reference FASTA used for the `ref` column. Without it the reference
    /// base is reported as `N`.
    #[structopt(long, short = "f")]
    fasta: Option<PathBuf>,

    /// Emit the lightweight layout (no reference or insertion detail).
    #[structopt(long)]
    lite: bool,

    /// Minimum mapping quality for a read to be counted.
    #[structopt(long, short = "q", default_value = "0")]
    min_mapq: u8,

    /// Max depth for a pileup; positions deeper than this are truncated by htslib.
    #[structopt(long, short = "D", default_value = "8000")]
    max_depth: u32,
}

impl Tally {
    pub fn run(self) -> Result<()> {
        let inputs = self.gather_inputs()?;
        info!("Tallying {} input file(s)", inputs.len());

        let registry =
            SampleRegistry::from_sources(inputs.iter().map(|p| p.display().to_string()))?;
        for (ordinal, name) in registry.iter().enumerate() {
            debug!("sample_{} = {}", ordinal + 1, name);
        }

        if let Some(output) = &self.output {
            make_parent_dirs(output)?;
        }
        let gzipped = self.output.as_ref().map(is_bgzipped).unwrap_or(false);
        let mut writer = get_writer(&self.output, gzipped, 1, 6)?;

        let reference: Box<dyn ReferenceLookup> = match &self.fasta {
            Some(fasta) => Box::new(
                FastaLookup::open(fasta)
                    .with_context(|| format!("Failed to open reference {}", fasta.display()))?,
            ),
            None => Box::new(NoReference),
        };

        let profile = if self.lite {
            OutputProfile::Lightweight
        } else {
            OutputProfile::Detailed
        };

        let read_filter = DefaultReadFilter::new(self.min_mapq);
        let mut source = MultiBamSource::new(inputs, self.region, self.max_depth, read_filter);

        pipeline::run(
            &mut source,
            &registry,
            reference.as_ref(),
            profile,
            &mut writer,
        )?;
        Ok(())
    }

    /// Positional inputs plus the `--list` file, in that order.
    fn gather_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut inputs = self.reads.clone();
        if let Some(list) = &self.list {
            let listed = fs::read_to_string(list)
                .with_context(|| format!("Failed to read input list {}", list.display()))?;
            inputs.extend(
                listed
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(PathBuf::from),
            );
        }
        if inputs.is_empty() {
            bail!("no input files given (positional arguments or --list)");
        }
        Ok(inputs)
    }
}

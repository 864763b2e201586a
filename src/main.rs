//! bamtally - per-position allele tallies across BAM files
//!
//! For each genomic position covered by one or more alignment files, reports
//! how many reads support each allele (A, C, G, T, deletion, insertion)
//! per input file and in aggregate as a tab-separated table.
//!
//! # Usage
//!
//! ```bash
//! # Tally two samples against a reference, detailed layout
//! bamtally tumor.bam normal.bam --fasta ref.fa -o tallies.tsv
//!
//! # Lightweight layout over a region, compressed output
//! bamtally sample.bam --region chr1:10000-20000 --lite -o tallies.tsv.gz
//! ```

pub mod commands;

use anyhow::Result;
use bamtally_lib::core::errors::is_broken_pipe;
use env_logger::Env;
use log::*;
use structopt::StructOpt;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(err) = commands::Tally::from_args().run() {
        if is_broken_pipe(&err) {
            std::process::exit(0);
        }
        error!("{}", err);
        std::process::exit(1);
    }
    Ok(())
}

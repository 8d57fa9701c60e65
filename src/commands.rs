//! # Commands run in `main.rs`
//!
//! We set up the commands and their code in this file.
use crate::{Error, InputBam, LengthMode, MappingFilter, OutputFormat, extract, references};
use clap::{Parser, Subcommand};
use std::io;

/// Main command line parsing struct
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[non_exhaustive]
pub struct Cli {
    /// Our subcommands
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
#[non_exhaustive]
/// Commands of bamscan CLI used in `main.rs`
pub enum Commands {
    /// Prints name and length of every reference in the BAM header
    References {
        /// Input BAM file
        #[clap(flatten)]
        bam: InputBam,
    },
    /// Prints fragment length and strand of every well-mapped read
    Extract {
        /// Input BAM file
        #[clap(flatten)]
        bam: InputBam,
        /// Well-mapped criteria
        #[clap(flatten)]
        filter: MappingFilter,
        /// How fragment length is measured
        #[clap(long, value_enum, default_value_t = LengthMode::Aligned)]
        length_mode: LengthMode,
        /// Output format
        #[clap(long, value_enum, default_value_t = OutputFormat::Tsv)]
        format: OutputFormat,
    },
}

/// Runs the command line program, writing output to `handle`.
///
/// # Errors
/// Returns the first error met while opening the file, resolving regions,
/// scanning records, or writing output.
pub fn run<W: io::Write>(cli: Cli, mut handle: W) -> Result<(), Error> {
    match cli.command {
        Commands::References { bam } => {
            let mut file = bam.open()?;
            references::run(&mut handle, file.references())?;
            file.close();
            Ok(())
        }
        Commands::Extract {
            bam,
            filter,
            length_mode,
            format,
        } => {
            let mut file = bam.open()?;
            let regions = bam.region_set(&file)?;
            let contigs: Vec<String> = file
                .reference_names()
                .into_iter()
                .map(String::from)
                .collect();
            let count = {
                let iter = match &regions {
                    Some(v) => file.iter_regions(v)?,
                    None => file.iter_all()?,
                };
                extract::run(&mut handle, &contigs, iter, &filter, length_mode, format)?
            };
            log::debug!("wrote {count} summaries");
            file.close();
            Ok(())
        }
    }
}

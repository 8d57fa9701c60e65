//! # Cli
//!
//! This file provides some global options in the command line interface.
//! The same structs are serde-(de)serialisable so that a host embedding the
//! library can hand them over per query.
use crate::{AlignmentFile, Error, GenomicRegion, RegionSet};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Input BAM file, its index, and the regions to scan.
#[derive(Debug, Clone, Args)]
pub struct InputBam {
    /// Input BAM file; must be coordinate sorted and indexed.
    pub bam_path: PathBuf,
    /// Index of the BAM file (BAI or CSI). Defaults to `<bam_path>.bai`.
    #[clap(long)]
    pub index: Option<PathBuf>,
    /// Region to scan, as `contig`, `contig:start-end` or `contig:start-`
    /// with 0-based half-open coordinates. Repeat to scan several regions.
    /// If no region is given, the whole file is scanned.
    #[clap(long)]
    pub region: Vec<GenomicRegion>,
    /// JSON file with a list of `{"tid": .., "start": .., "end": ..}` regions,
    /// scanned together with any `--region`.
    #[clap(long)]
    pub regions_json: Option<PathBuf>,
}

impl InputBam {
    /// Opens the BAM file with the given index, or with `<bam_path>.bai`.
    ///
    /// # Errors
    /// Same as [`AlignmentFile::open`].
    pub fn open(&self) -> Result<AlignmentFile, Error> {
        match &self.index {
            Some(index) => AlignmentFile::open(&self.bam_path, index),
            None => AlignmentFile::open_default(&self.bam_path),
        }
    }

    /// Collects the requested regions into one set. `None` means no region
    /// was requested and the whole file should be scanned.
    ///
    /// # Errors
    /// `SeekError` if a contig is unknown, or an error reading or parsing
    /// the JSON file.
    pub fn region_set(&self, file: &AlignmentFile) -> Result<Option<RegionSet>, Error> {
        if self.region.is_empty() && self.regions_json.is_none() {
            return Ok(None);
        }
        let mut regions = RegionSet::from_genomic_regions(file.references(), &self.region)?;
        if let Some(path) = &self.regions_json {
            for raw in read_regions_json(path)?.iter() {
                regions.push(raw.tid, raw.start, raw.end);
            }
        }
        Ok(Some(regions))
    }
}

fn read_regions_json(path: &Path) -> Result<RegionSet, Error> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Mapping-quality threshold and pairing requirement used to decide
/// whether a record is well mapped.
///
/// ```
/// use bamscan_core::MappingFilter;
///
/// let filter: MappingFilter = serde_json::from_str(r#"{"min_mapq": 20}"#)?;
/// assert_eq!(filter, MappingFilter { min_mapq: 20, require_proper_pair: false });
/// # Ok::<(), bamscan_core::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Args, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingFilter {
    /// Minimum mapping quality (inclusive). 255 is compared as a number.
    #[clap(long, default_value_t = 0)]
    pub min_mapq: u8,
    /// Require reads to be paired, flagged as a proper pair, and to have a
    /// mapped mate.
    #[clap(long, default_value_t = false)]
    pub require_proper_pair: bool,
}

/// Output format of extracted summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated table with a header line
    #[default]
    Tsv,
    /// One JSON object per line
    Json,
}

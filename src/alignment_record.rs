//! # AlignmentRecord
//!
//! Wraps one BAM record as it comes off a region scan. The wrapper has two
//! states: empty (just built, nothing read into it yet) and populated (filled
//! by an iterator step or built from a record). Classification and summary
//! extraction are only defined on populated records; asking an empty record
//! is a `PreconditionError`.
//!
//! The intended order of use is classify first, extract second:
//!
//! ```
//! use bamscan_core::{AlignData, AlignmentRecord};
//! use rust_htslib::bam::{self, record::{Cigar, CigarString}};
//!
//! let mut raw = bam::Record::new();
//! raw.set(b"read1", Some(&CigarString(vec![Cigar::Match(10)])), b"ACGTACGTAC", &[30; 10]);
//! raw.set_flags(16);
//! raw.set_tid(0);
//! raw.set_pos(100);
//! raw.set_mapq(60);
//!
//! let record = AlignmentRecord::from(raw);
//! let mut data = AlignData::default();
//! if record.is_well_mapped(20, false)? {
//!     record.extract_data(&mut data)?;
//! }
//! assert_eq!(data, AlignData { len: 10, is_reverse: true });
//! # Ok::<(), bamscan_core::Error>(())
//! ```

use crate::{Error, Interval, MappingFilter, ReadState};
use clap::ValueEnum;
use rust_htslib::bam;
use rust_htslib::bam::record::Cigar;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compact per-read summary handed to downstream counting.
/// A plain value: copy it freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignData {
    /// Fragment length. The number of reference bases the alignment
    /// consumes, or the template length in `LengthMode::Template`.
    pub len: u64,
    /// Whether the record is aligned to the reverse strand
    pub is_reverse: bool,
}

impl fmt::Display for AlignData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let strand = if self.is_reverse { '-' } else { '+' };
        write!(f, "{}\t{strand}", self.len)
    }
}

/// How the fragment length of a summary is measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LengthMode {
    /// Reference bases consumed by the alignment (M, D, N, =, X operations)
    #[default]
    Aligned,
    /// Absolute template length for properly paired records, falling back
    /// to the aligned length when the template length is not set
    Template,
}

/// One BAM record, empty or populated.
#[derive(Debug, Clone)]
pub struct AlignmentRecord {
    record: bam::Record,
    populated: bool,
}

impl Default for AlignmentRecord {
    fn default() -> Self {
        AlignmentRecord {
            record: bam::Record::new(),
            populated: false,
        }
    }
}

impl From<bam::Record> for AlignmentRecord {
    fn from(record: bam::Record) -> Self {
        AlignmentRecord {
            record,
            populated: true,
        }
    }
}

impl AlignmentRecord {
    /// Empty record, ready to be filled by `RegionIterator::read`
    #[must_use]
    pub fn new() -> Self {
        AlignmentRecord::default()
    }
    /// Whether nothing has been read into this record
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.populated
    }
    /// The underlying record
    ///
    /// # Errors
    /// `PreconditionError` if the record is empty.
    pub fn raw(&self) -> Result<&bam::Record, Error> {
        if self.populated {
            Ok(&self.record)
        } else {
            Err(Error::PreconditionError(
                "alignment record is empty, read into it first".to_string(),
            ))
        }
    }
    /// Buffer the iterator decodes into. Contents are only meaningful
    /// after `mark_populated`.
    pub(crate) fn buffer_mut(&mut self) -> &mut bam::Record {
        &mut self.record
    }
    pub(crate) fn buffer(&self) -> &bam::Record {
        &self.record
    }
    pub(crate) fn mark_populated(&mut self) {
        self.populated = true;
    }
    pub(crate) fn clear(&mut self) {
        self.populated = false;
    }
    /// A record is well mapped if it is mapped, has mapping quality at least
    /// `min_mapq`, is neither secondary nor supplementary, and is not a
    /// duplicate. With `require_proper_pair`, it must also be paired,
    /// flagged as a proper pair, and have a mapped mate.
    ///
    /// # Errors
    /// `PreconditionError` if the record is empty.
    pub fn is_well_mapped(&self, min_mapq: u8, require_proper_pair: bool) -> Result<bool, Error> {
        let record = self.raw()?;
        let placed = !record.is_unmapped()
            && !record.is_secondary()
            && !record.is_supplementary()
            && !record.is_duplicate();
        let paired = !require_proper_pair
            || (record.is_paired() && record.is_proper_pair() && !record.is_mate_unmapped());
        Ok(placed && paired && record.mapq() >= min_mapq)
    }
    /// Same as `is_well_mapped`, with the thresholds taken from a filter
    ///
    /// # Errors
    /// `PreconditionError` if the record is empty.
    pub fn passes(&self, filter: &MappingFilter) -> Result<bool, Error> {
        self.is_well_mapped(filter.min_mapq, filter.require_proper_pair)
    }
    /// Fills `out` with the aligned length and strand of the record.
    /// Call `is_well_mapped` first; unmapped records are refused.
    ///
    /// # Errors
    /// `PreconditionError` if the record is empty, `Unmapped` if it is unmapped.
    pub fn extract_data(&self, out: &mut AlignData) -> Result<(), Error> {
        self.extract_data_with(LengthMode::Aligned, out)
    }
    /// Fills `out` measuring the fragment length as `mode` says.
    ///
    /// # Errors
    /// `PreconditionError` if the record is empty, `Unmapped` if it is unmapped.
    pub fn extract_data_with(&self, mode: LengthMode, out: &mut AlignData) -> Result<(), Error> {
        let record = self.raw()?;
        if record.is_unmapped() {
            return Err(Error::Unmapped);
        }
        let aligned = reference_span(record);
        out.len = match mode {
            LengthMode::Aligned => aligned,
            LengthMode::Template => match record.insert_size().unsigned_abs() {
                0 => aligned,
                tlen if record.is_proper_pair() => tlen,
                _ => aligned,
            },
        };
        out.is_reverse = record.is_reverse();
        Ok(())
    }
    /// Number of reference bases the alignment consumes
    ///
    /// # Errors
    /// `PreconditionError` if the record is empty.
    pub fn reference_span(&self) -> Result<u64, Error> {
        Ok(reference_span(self.raw()?))
    }
    /// Alignment state built from the flags
    ///
    /// # Errors
    /// `PreconditionError` if the record is empty.
    pub fn read_state(&self) -> Result<ReadState, Error> {
        Ok(ReadState::from(self.raw()?))
    }
    /// Read id, also called query name
    ///
    /// # Errors
    /// `PreconditionError` if the record is empty, `InvalidReadID` if
    /// the name is not UTF-8.
    pub fn read_id(&self) -> Result<&str, Error> {
        std::str::from_utf8(self.raw()?.qname()).map_err(|_| Error::InvalidReadID)
    }
    /// Mapping quality
    ///
    /// # Errors
    /// `PreconditionError` if the record is empty.
    pub fn mapq(&self) -> Result<u8, Error> {
        Ok(self.raw()?.mapq())
    }
    /// Numeric contig id, `None` for unmapped records
    ///
    /// # Errors
    /// `PreconditionError` if the record is empty.
    pub fn contig_id(&self) -> Result<Option<u32>, Error> {
        let record = self.raw()?;
        if record.is_unmapped() {
            return Ok(None);
        }
        Ok(Some(u32::try_from(record.tid())?))
    }
    /// 0-based start on the reference, `None` for unmapped records
    ///
    /// # Errors
    /// `PreconditionError` if the record is empty.
    pub fn start(&self) -> Result<Option<u64>, Error> {
        let record = self.raw()?;
        if record.is_unmapped() {
            return Ok(None);
        }
        Ok(Some(u64::try_from(record.pos())?))
    }
}

/// Sum of reference-consuming CIGAR operations. Insertions, clips and
/// padding do not move along the reference.
pub(crate) fn reference_span(record: &bam::Record) -> u64 {
    record
        .cigar()
        .iter()
        .map(|op| match op {
            Cigar::Match(n) | Cigar::Del(n) | Cigar::RefSkip(n) | Cigar::Equal(n) | Cigar::Diff(n) => {
                u64::from(*n)
            }
            Cigar::Ins(_) | Cigar::SoftClip(_) | Cigar::HardClip(_) | Cigar::Pad(_) => 0,
        })
        .sum()
}

/// Reference interval `[pos, pos + span)` occupied by a placed record, with
/// spans of zero widened to one base as htslib does. `None` when the record
/// has no position.
pub(crate) fn reference_interval(record: &bam::Record) -> Option<(i32, Interval)> {
    let start = u64::try_from(record.pos()).ok()?;
    if record.tid() < 0 {
        return None;
    }
    let end = start + reference_span(record).max(1);
    Interval::new(start, end).ok().map(|v| (record.tid(), v))
}

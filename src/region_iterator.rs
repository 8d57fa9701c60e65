//! # RegionIterator
//!
//! Forward-only scan over the records of an [`AlignmentFile`]. Every query
//! shape (whole file, one region, a set of regions) becomes a scan plan:
//! either the whole file in file order, or a list of merged, sorted,
//! non-overlapping intervals fetched one after the other through the index.
//!
//! A record spanning two merged intervals is only yielded for the first of
//! them. Unmapped records are only ever yielded by the whole-file scan.

use crate::alignment_record::reference_interval;
use crate::{
    AlignData, AlignmentFile, AlignmentRecord, Error, Intersects, LengthMode, MappingFilter,
    RegionSet,
};
use bedrs::Coordinates as _;
use bedrs::prelude::Bed3;
use rust_htslib::bam::{self, Read as _};

#[derive(Debug)]
enum ScanPlan {
    All,
    Regions {
        intervals: Vec<Bed3<i32, u64>>,
        current: usize,
    },
}

/// Pull-based iterator over the records of a scan.
///
/// Use [`RegionIterator::read`] to fill a reused record, the [`Iterator`]
/// impl to get owned records, or [`RegionIterator::next_well_mapped`] to get
/// summaries of well-mapped records only. Once exhausted, every further call
/// reports end-of-stream again.
///
/// ```no_run
/// use bamscan_core::{AlignData, AlignmentFile, AlignmentRecord};
///
/// let mut file = AlignmentFile::open("reads.bam", "reads.bam.bai")?;
/// let mut iter = file.iter_region(0, 1000, 2000)?;
/// let mut record = AlignmentRecord::new();
/// let mut data = AlignData::default();
/// while let Some(result) = iter.read(&mut record) {
///     result?;
///     if record.is_well_mapped(20, false)? {
///         record.extract_data(&mut data)?;
///         println!("{data}");
///     }
/// }
/// # Ok::<(), bamscan_core::Error>(())
/// ```
#[derive(Debug)]
pub struct RegionIterator<'a> {
    file: &'a mut AlignmentFile,
    plan: ScanPlan,
    exhausted: bool,
}

impl<'a> RegionIterator<'a> {
    pub(crate) fn whole_file(file: &'a mut AlignmentFile) -> Result<Self, Error> {
        file.reader_mut()?
            .fetch(bam::FetchDefinition::All)
            .map_err(|e| Error::SeekError {
                region: "*".to_string(),
                msg: e.to_string(),
            })?;
        log::debug!("scanning all records of {}", file.path().display());
        Ok(RegionIterator {
            file,
            plan: ScanPlan::All,
            exhausted: false,
        })
    }

    pub(crate) fn over_regions(
        file: &'a mut AlignmentFile,
        regions: &RegionSet,
    ) -> Result<Self, Error> {
        let _ = file.reader_mut()?;
        let intervals = regions.normalize(file.references())?;
        log::debug!(
            "scanning {} merged intervals from {} regions of {}",
            intervals.len(),
            regions.len(),
            file.path().display()
        );
        if let Some(first) = intervals.first() {
            fetch_interval(file, first)?;
        }
        let exhausted = intervals.is_empty();
        Ok(RegionIterator {
            file,
            plan: ScanPlan::Regions {
                intervals,
                current: 0,
            },
            exhausted,
        })
    }

    /// Whether end-of-stream has been reached
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Reads the next record of the scan into `record`.
    ///
    /// Returns `None` at end-of-stream, and again on every later call.
    /// `record` is left empty whenever no record was produced.
    ///
    /// # Errors
    /// `CorruptRecord` if a record cannot be decoded, `SeekError` if the
    /// index cannot position the reader on the next interval. Both end the
    /// scan.
    pub fn read(&mut self, record: &mut AlignmentRecord) -> Option<Result<(), Error>> {
        record.clear();
        if self.exhausted {
            return None;
        }
        loop {
            let reader = match self.file.reader_mut() {
                Ok(v) => v,
                Err(e) => return self.fail(e),
            };
            match reader.read(record.buffer_mut()) {
                Some(Ok(())) => {
                    if self.accepts(record.buffer()) {
                        record.mark_populated();
                        return Some(Ok(()));
                    }
                }
                Some(Err(e)) => return self.fail(Error::CorruptRecord(e)),
                None => match self.advance() {
                    Ok(true) => {}
                    Ok(false) => {
                        self.exhausted = true;
                        return None;
                    }
                    Err(e) => return self.fail(e),
                },
            }
        }
    }

    /// Reads records until one passes `filter`, and returns its summary.
    /// Records failing the filter are skipped silently.
    ///
    /// # Errors
    /// Same as [`RegionIterator::read`].
    pub fn next_well_mapped(
        &mut self,
        record: &mut AlignmentRecord,
        filter: &MappingFilter,
        mode: LengthMode,
    ) -> Option<Result<AlignData, Error>> {
        loop {
            if let Err(e) = self.read(record)? {
                return Some(Err(e));
            }
            match record.passes(filter) {
                Ok(true) => {
                    let mut data = AlignData::default();
                    return Some(record.extract_data_with(mode, &mut data).map(|()| data));
                }
                Ok(false) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }

    fn fail(&mut self, error: Error) -> Option<Result<(), Error>> {
        self.exhausted = true;
        Some(Err(error))
    }

    /// Moves to the next merged interval. `Ok(false)` when none remain.
    fn advance(&mut self) -> Result<bool, Error> {
        let ScanPlan::Regions { intervals, current } = &mut self.plan else {
            return Ok(false);
        };
        *current += 1;
        let Some(next) = intervals.get(*current) else {
            return Ok(false);
        };
        log::trace!(
            "advancing to interval {}:{}-{}",
            next.chr(),
            next.start(),
            next.end()
        );
        fetch_interval(self.file, next)?;
        Ok(true)
    }

    /// Region scans skip unmapped records, records outside the active
    /// interval, and records already yielded for the previous interval.
    fn accepts(&self, record: &bam::Record) -> bool {
        let ScanPlan::Regions { intervals, current } = &self.plan else {
            return true;
        };
        if record.is_unmapped() {
            return false;
        }
        let Some((tid, span)) = reference_interval(record) else {
            return false;
        };
        let Some(active) = intervals.get(*current) else {
            return false;
        };
        if *active.chr() != tid || !active.intersects(&span) {
            return false;
        }
        match current.checked_sub(1).and_then(|i| intervals.get(i)) {
            Some(previous) => *previous.chr() != tid || span.start() >= previous.end(),
            None => true,
        }
    }
}

impl Iterator for RegionIterator<'_> {
    type Item = Result<AlignmentRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = AlignmentRecord::new();
        self.read(&mut record).map(|result| result.map(|()| record))
    }
}

fn fetch_interval(file: &mut AlignmentFile, interval: &Bed3<i32, u64>) -> Result<(), Error> {
    let seek_error = |msg: String| Error::SeekError {
        region: format!("{}:{}-{}", interval.chr(), interval.start(), interval.end()),
        msg,
    };
    let start = i64::try_from(interval.start()).map_err(|e| seek_error(e.to_string()))?;
    let end = i64::try_from(interval.end()).map_err(|e| seek_error(e.to_string()))?;
    file.reader_mut()?
        .fetch(bam::FetchDefinition::Region(*interval.chr(), start, end))
        .map_err(|e| seek_error(e.to_string()))
}

//! RegionSet: caller-supplied collection of (reference-id, start, end) triples
//!
//! Hosts hand regions over in several shapes (parallel columns of ids or
//! names, region strings, JSON). All of them end up here as an ordered list
//! of raw triples, which is validated against the file's references and
//! merged into one sorted scan plan when an iterator is built.

use super::genomic_region::GenomicRegion;
use crate::{Error, Reference};
use bedrs::Coordinates as _;
use bedrs::prelude::Bed3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One region exactly as supplied by a caller: reference id, 0-based start
/// and exclusive end. Nothing is checked until the region is normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawRegion {
    /// Numeric reference id, an index into the header's reference list
    pub tid: i32,
    /// First base, 0-based
    pub start: i64,
    /// One past the last base
    pub end: i64,
}

impl fmt::Display for RawRegion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}-{}", self.tid, self.start, self.end)
    }
}

impl From<(i32, i64, i64)> for RawRegion {
    fn from((tid, start, end): (i32, i64, i64)) -> Self {
        RawRegion { tid, start, end }
    }
}

/// Ordered list of regions supplied by a caller.
/// Serialises as a JSON list of `{"tid": .., "start": .., "end": ..}` objects.
///
/// ```
/// use bamscan_core::RegionSet;
///
/// let regions: RegionSet = serde_json::from_str(r#"[
///     {"tid": 1, "start": 500, "end": 600},
///     {"tid": 0, "start": 100, "end": 200}
/// ]"#)?;
/// assert_eq!(regions.len(), 2);
/// # Ok::<(), bamscan_core::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionSet {
    regions: Vec<RawRegion>,
}

impl RegionSet {
    /// Empty set; an iterator over an empty set yields nothing
    #[must_use]
    pub fn new() -> Self {
        RegionSet::default()
    }
    /// Appends one region
    pub fn push(&mut self, tid: i32, start: i64, end: i64) {
        self.regions.push(RawRegion { tid, start, end });
    }
    /// Number of regions as supplied (before merging)
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }
    /// Whether no regions were supplied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
    /// Regions in the order they were supplied
    pub fn iter(&self) -> impl Iterator<Item = &RawRegion> {
        self.regions.iter()
    }
    /// Builds a set from parallel columns, the shape a data-frame host uses.
    ///
    /// # Errors
    /// Returns an error if the columns differ in length.
    ///
    /// ```
    /// use bamscan_core::RegionSet;
    /// let regions = RegionSet::from_columns(&[0, 0], &[10, 50], &[20, 60])?;
    /// assert_eq!(regions.len(), 2);
    /// assert!(RegionSet::from_columns(&[0], &[10, 50], &[20, 60]).is_err());
    /// # Ok::<(), bamscan_core::Error>(())
    /// ```
    pub fn from_columns(tids: &[i32], starts: &[i64], ends: &[i64]) -> Result<Self, Error> {
        check_column_lengths(tids.len(), starts.len(), ends.len())?;
        Ok(tids
            .iter()
            .zip(starts)
            .zip(ends)
            .map(|((&tid, &start), &end)| RawRegion { tid, start, end })
            .collect())
    }
    /// Builds a set from parallel columns where references are given by name.
    ///
    /// # Errors
    /// Returns an error if the columns differ in length, or a `SeekError`
    /// if a name is not among the references.
    pub fn from_named_columns<S: AsRef<str>>(
        references: &[Reference],
        names: &[S],
        starts: &[i64],
        ends: &[i64],
    ) -> Result<Self, Error> {
        check_column_lengths(names.len(), starts.len(), ends.len())?;
        names
            .iter()
            .zip(starts)
            .zip(ends)
            .map(|((name, &start), &end)| {
                let tid = references
                    .iter()
                    .position(|r| r.name == name.as_ref())
                    .ok_or_else(|| Error::SeekError {
                        region: format!("{}:{start}-{end}", name.as_ref()),
                        msg: "contig not present in the alignment header".to_string(),
                    })?;
                Ok(RawRegion {
                    tid: i32::try_from(tid)?,
                    start,
                    end,
                })
            })
            .collect()
    }
    /// Builds a set from parsed region strings.
    ///
    /// # Errors
    /// Returns a `SeekError` if a contig is not among the references.
    pub fn from_genomic_regions(
        references: &[Reference],
        regions: &[GenomicRegion],
    ) -> Result<Self, Error> {
        regions.iter().map(|r| r.resolve(references)).collect()
    }
    /// Validates every region against the references, sorts by
    /// (reference id, start), and merges
    /// overlapping or abutting regions so the result can be scanned in one
    /// ordered pass.
    pub(crate) fn normalize(&self, references: &[Reference]) -> Result<Vec<Bed3<i32, u64>>, Error> {
        let mut validated = self
            .regions
            .iter()
            .map(|r| validate_region(r, references))
            .collect::<Result<Vec<_>, _>>()?;
        validated.sort_by_key(|b| (*b.chr(), b.start(), b.end()));

        let mut merged: Vec<Bed3<i32, u64>> = Vec::with_capacity(validated.len());
        for region in validated {
            match merged.last_mut() {
                Some(last) if *last.chr() == *region.chr() && region.start() <= last.end() => {
                    if region.end() > last.end() {
                        *last = Bed3::new(*last.chr(), last.start(), region.end());
                    }
                }
                _ => merged.push(region),
            }
        }
        Ok(merged)
    }
}

impl FromIterator<RawRegion> for RegionSet {
    fn from_iter<I: IntoIterator<Item = RawRegion>>(iter: I) -> Self {
        RegionSet {
            regions: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(i32, i64, i64)> for RegionSet {
    fn from_iter<I: IntoIterator<Item = (i32, i64, i64)>>(iter: I) -> Self {
        iter.into_iter().map(RawRegion::from).collect()
    }
}

fn check_column_lengths(tids: usize, starts: usize, ends: usize) -> Result<(), Error> {
    if tids == starts && starts == ends {
        Ok(())
    } else {
        Err(Error::RegionColumnMismatch { tids, starts, ends })
    }
}

/// Checks one region against the reference list. The whole region must
/// lie inside the reference.
fn validate_region(raw: &RawRegion, references: &[Reference]) -> Result<Bed3<i32, u64>, Error> {
    let seek_error = |msg: String| Error::SeekError {
        region: raw.to_string(),
        msg,
    };
    let reference = usize::try_from(raw.tid)
        .ok()
        .and_then(|i| references.get(i))
        .ok_or_else(|| {
            seek_error(format!(
                "reference id not present, file has {} references",
                references.len()
            ))
        })?;
    let start =
        u64::try_from(raw.start).map_err(|_| seek_error("start is negative".to_string()))?;
    let end = u64::try_from(raw.end).map_err(|_| seek_error("end is negative".to_string()))?;
    if start >= end {
        return Err(seek_error("start must be less than end".to_string()));
    }
    if start >= reference.length {
        return Err(seek_error(format!(
            "start exceeds length {} of '{}'",
            reference.length, reference.name
        )));
    }
    if end > reference.length {
        return Err(seek_error(format!(
            "end exceeds length {} of '{}'",
            reference.length, reference.name
        )));
    }
    Ok(Bed3::new(raw.tid, start, end))
}

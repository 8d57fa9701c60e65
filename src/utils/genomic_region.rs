//! GenomicRegion struct for representing genomic coordinates
//! Handles parsing of genomic regions from standard string formats

use super::interval::Interval;
use super::region_set::RawRegion;
use crate::{Error, Reference};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Datatype holding a genomic region. Coordinates are 0-based and half-open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenomicRegion(pub (String, Option<Interval>));

/// Obtains genomic region from a string with the standard region format of name[:begin[-end]].
///
/// ```
/// use bamscan_core::GenomicRegion;
/// use std::str::FromStr;
///
/// // Simple contig name only
/// let region = GenomicRegion::from_str("chr1")?;
/// # Ok::<(), bamscan_core::Error>(())
/// ```
///
/// ```
/// # use bamscan_core::GenomicRegion;
/// # use std::str::FromStr;
/// #
/// // Contig with coordinates
/// let region = GenomicRegion::from_str("chr1:1000-2000")?;
/// # Ok::<(), bamscan_core::Error>(())
/// ```
///
/// ```
/// # use bamscan_core::GenomicRegion;
/// # use std::str::FromStr;
/// #
/// // Contig name with colons (e.g., from some assemblies)
/// let region = GenomicRegion::from_str("chr1:alternate:1000-2000")?;
/// # Ok::<(), bamscan_core::Error>(())
/// ```
impl FromStr for GenomicRegion {
    type Err = Error;

    fn from_str(val_str: &str) -> Result<Self, Self::Err> {
        let mut colon_split: Vec<&str> = val_str.split(':').collect();
        match colon_split.len() {
            0 => Err(Error::InvalidAlignCoords),
            1 if val_str.is_empty() => Err(Error::InvalidAlignCoords),
            1 => Ok(GenomicRegion((val_str.to_string(), None))),
            _ => {
                let interval_str = colon_split.pop().ok_or(Error::InvalidAlignCoords)?;
                Ok(GenomicRegion((
                    colon_split.join(":"),
                    Some(Interval::from_str(interval_str)?),
                )))
            }
        }
    }
}

impl fmt::Display for GenomicRegion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.0 {
            (name, None) => write!(f, "{name}"),
            (name, Some(v)) if v.end() == u64::MAX => write!(f, "{name}:{}-", v.start()),
            (name, Some(v)) => write!(f, "{name}:{v}"),
        }
    }
}

impl GenomicRegion {
    /// Resolves the contig name against the references of an alignment file,
    /// giving a raw (reference-id, start, end) triple. A region without
    /// coordinates covers the whole contig, and an open end (`name:start-`)
    /// runs to the end of the contig. Other coordinates are checked against
    /// the contig length when an iterator is built.
    ///
    /// ```
    /// use bamscan_core::{GenomicRegion, Reference};
    /// use std::str::FromStr;
    ///
    /// let refs = vec![
    ///     Reference { name: "chrI".to_string(), length: 1000 },
    ///     Reference { name: "chrII".to_string(), length: 2000 },
    /// ];
    /// let raw = GenomicRegion::from_str("chrII:100-200")?.resolve(&refs)?;
    /// assert_eq!((raw.tid, raw.start, raw.end), (1, 100, 200));
    /// let raw = GenomicRegion::from_str("chrI")?.resolve(&refs)?;
    /// assert_eq!((raw.tid, raw.start, raw.end), (0, 0, 1000));
    /// let raw = GenomicRegion::from_str("chrII:1500-")?.resolve(&refs)?;
    /// assert_eq!((raw.tid, raw.start, raw.end), (1, 1500, 2000));
    /// # Ok::<(), bamscan_core::Error>(())
    /// ```
    pub fn resolve(&self, references: &[Reference]) -> Result<RawRegion, Error> {
        let GenomicRegion((contig_name, coords)) = self;
        let tid = references
            .iter()
            .position(|r| r.name == *contig_name)
            .ok_or_else(|| Error::SeekError {
                region: self.to_string(),
                msg: "contig not present in the alignment header".to_string(),
            })?;
        let length = references[tid].length;
        let (start, end) = match coords {
            Some(c) if c.end() == u64::MAX => (c.start(), length),
            Some(c) => (c.start(), c.end()),
            None => (0, length),
        };
        Ok(RawRegion {
            tid: i32::try_from(tid)?,
            start: i64::try_from(start)?,
            end: i64::try_from(end)?,
        })
    }
}

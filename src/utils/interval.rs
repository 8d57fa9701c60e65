//! `Interval` struct for half-open genomic intervals with start < end guarantee
//! Provides parsing from "start-end" strings and overlap testing

use super::intersects::Intersects;
use crate::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Half-open interval `[start, end)` on a reference sequence, 0-based.
/// `start < end` is guaranteed at creation, so an interval always
/// covers at least one base.
#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    start: u64,
    end: u64,
}

impl Interval {
    /// Constructor with two values, will fail unless `start < end`.
    ///
    /// ```
    /// use bamscan_core::Interval;
    /// let x = Interval::new(100, 200)?;
    /// assert_eq!(x.length(), 100);
    /// # Ok::<(), bamscan_core::Error>(())
    /// ```
    /// ```should_panic
    /// use bamscan_core::Interval;
    /// let x = Interval::new(200, 200).unwrap();
    /// ```
    pub fn new(start: u64, end: u64) -> Result<Self, Error> {
        if start < end {
            Ok(Interval { start, end })
        } else {
            Err(Error::WrongOrder)
        }
    }
    /// Gets the first base of the interval
    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }
    /// Gets the position one past the last base of the interval
    #[must_use]
    pub fn end(&self) -> u64 {
        self.end
    }
    /// Number of bases covered
    #[must_use]
    pub fn length(&self) -> u64 {
        self.end - self.start
    }
}

/// Half-open overlap: `max(start_a, start_b) < min(end_a, end_b)`.
/// Adjacent intervals such as `[100, 200)` and `[200, 300)` do not intersect.
///
/// ```
/// use bamscan_core::{Interval, Intersects};
/// let query = Interval::new(100, 200)?;
/// assert!(query.intersects(&Interval::new(90, 150)?));
/// assert!(!query.intersects(&Interval::new(200, 300)?));
/// # Ok::<(), bamscan_core::Error>(())
/// ```
impl Intersects<Interval> for Interval {
    fn intersects(&self, val: &Interval) -> bool {
        self.start.max(val.start) < self.end.min(val.end)
    }
}

/// Parses "start-end" or the open-ended "start-", where the end
/// defaults to `u64::MAX`. Enforces strict inequality (start < end).
///
/// ```
/// use bamscan_core::Interval;
/// use std::str::FromStr;
///
/// let interval = Interval::from_str("1000-2000")?;
/// assert_eq!(interval.start(), 1000);
/// assert_eq!(interval.end(), 2000);
///
/// let interval = Interval::from_str("1000-")?;
/// assert_eq!(interval.end(), u64::MAX);
/// # Ok::<(), bamscan_core::Error>(())
/// ```
impl FromStr for Interval {
    type Err = Error;

    fn from_str(interval_str: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = interval_str.split('-').collect();

        match parts.as_slice() {
            [start_str, end_str] => {
                let start = start_str.trim().parse::<u64>().map_err(|_| {
                    Error::IntervalParseError(
                        "Invalid start coordinate in interval!".to_string(),
                    )
                })?;

                let end = if end_str.trim().is_empty() {
                    u64::MAX
                } else {
                    end_str.trim().parse::<u64>().map_err(|_| {
                        Error::IntervalParseError(
                            "Invalid end coordinate in interval!".to_string(),
                        )
                    })?
                };

                Interval::new(start, end).map_err(|_| {
                    Error::IntervalParseError(
                        "Genomic intervals require start < end (strict inequality)".to_string(),
                    )
                })
            }
            _ => Err(Error::IntervalParseError(
                "Invalid interval format! Expected 'start-end' or 'start-'".to_string(),
            )),
        }
    }
}

impl fmt::Display for Interval {
    /// converts to string for display i.e. "start-end"
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

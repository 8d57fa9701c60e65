//! Intersects trait for testing if an interval intersects with self
//! Used by region scans to test record spans against query intervals

use super::interval::Interval;
use bedrs::Coordinates as _;
use bedrs::prelude::Bed3;

/// Implements test if an interval intersects with self
pub trait Intersects<T> {
    /// see if interval intersects with self
    fn intersects(&self, val: &T) -> bool;
}

/// Half-open overlap of a scan interval with a span on the same reference.
/// The caller is responsible for comparing reference ids.
impl Intersects<Interval> for Bed3<i32, u64> {
    fn intersects(&self, val: &Interval) -> bool {
        self.start().max(val.start()) < self.end().min(val.end())
    }
}

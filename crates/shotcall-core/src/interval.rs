//! Count intervals for shot scheduling.
//!
//! A shot occupies `[begin, end)` on the count axis. Intervals are values:
//! a resize replaces the interval instead of mutating it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, ShotCallError};

/// A range on the count axis with inclusive begin and exclusive end.
///
/// `begin == end` is allowed and denotes a zero-length instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    begin: f64,
    end: f64,
}

/// Unchecked wire form of an [`Interval`].
#[derive(Deserialize)]
struct RawInterval {
    begin: f64,
    end: f64,
}

impl TryFrom<RawInterval> for Interval {
    type Error = ShotCallError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Self::new(raw.begin, raw.end)
    }
}

impl Interval {
    /// Create a new interval, rejecting `begin > end` and non-finite endpoints.
    pub fn new(begin: f64, end: f64) -> Result<Self> {
        if !begin.is_finite() || !end.is_finite() || begin > end {
            return Err(ShotCallError::InvalidInterval { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// Zero-length interval at the origin.
    pub const ZERO: Self = Self {
        begin: 0.0,
        end: 0.0,
    };

    /// Begin count (inclusive).
    #[inline]
    pub fn begin(self) -> f64 {
        self.begin
    }

    /// End count (exclusive).
    #[inline]
    pub fn end(self) -> f64 {
        self.end
    }

    /// Length of the interval in counts.
    #[inline]
    pub fn duration(self) -> f64 {
        self.end - self.begin
    }

    /// Replace the begin count, keeping the end.
    pub fn with_begin(self, begin: f64) -> Result<Self> {
        Self::new(begin, self.end)
    }

    /// Replace the end count, keeping the begin.
    pub fn with_end(self, end: f64) -> Result<Self> {
        Self::new(self.begin, end)
    }

    /// Widen the interval by `before` counts at the front and `after` counts at the back.
    pub fn padded(self, before: f64, after: f64) -> Result<Self> {
        Self::new(self.begin - before, self.end + after)
    }

    /// Order by begin ascending, then by end ascending.
    pub fn compare(self, other: Self) -> Ordering {
        self.begin
            .total_cmp(&other.begin)
            .then_with(|| self.end.total_cmp(&other.end))
    }

    /// Check whether `other`, shifted earlier by `movement_offset`, intersects this interval.
    ///
    /// Three cases count as an overlap: `other` begins strictly inside this interval,
    /// `other` ends strictly inside it, or one interval contains the other. Containment is
    /// boundary-inclusive when `other` is the container and strict when `self` is, so two
    /// identical intervals match exactly one containment branch. Touching intervals
    /// (`self.end == other.begin`) never overlap.
    pub fn overlaps(self, other: Self, movement_offset: f64) -> bool {
        let shifted_begin = self.begin - movement_offset;

        // Other begins during this interval
        if other.begin > shifted_begin && other.begin - movement_offset < self.end {
            return true;
        }

        // Other ends during this interval
        if other.end > shifted_begin && other.end < self.end {
            return true;
        }

        (other.begin <= self.begin && other.end >= self.end)
            || (self.begin < other.begin && self.end > other.end)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

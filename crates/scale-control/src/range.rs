use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("Lower bound {lower} is above upper bound {upper}")]
    Inverted { lower: i64, upper: i64 },
    #[error("Range of {count} values exceeds the limit of {limit} labels")]
    TooManyValues { count: u64, limit: u64 },
}

/// Inclusive integer interval the scale offers for selection.
///
/// `lower <= upper` holds for every value of this type: construction rejects
/// inverted pairs, and the setters drag the opposite bound along instead of
/// ever producing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeModel {
    lower: i64,
    upper: i64,
}

impl RangeModel {
    pub fn new(lower: i64, upper: i64) -> Result<Self, RangeError> {
        if lower > upper {
            return Err(RangeError::Inverted { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> i64 {
        self.lower
    }

    pub fn upper(&self) -> i64 {
        self.upper
    }

    /// Number of selectable values. Saturates for ranges spanning all of `i64`.
    pub fn count(&self) -> u64 {
        self.upper.abs_diff(self.lower).saturating_add(1)
    }

    /// Fails when laying out one label per value would exceed `limit`.
    pub fn check_count(&self, limit: u64) -> Result<(), RangeError> {
        let count = self.count();
        if count > limit {
            return Err(RangeError::TooManyValues { count, limit });
        }
        Ok(())
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }

    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.lower, self.upper)
    }

    /// Moves the lower bound, raising the upper bound when it would fall below.
    pub fn set_lower(&mut self, value: i64) {
        self.lower = value;
        self.upper = self.upper.max(value);
    }

    /// Moves the upper bound, lowering the lower bound when it would rise above.
    pub fn set_upper(&mut self, value: i64) {
        self.upper = value;
        self.lower = self.lower.min(value);
    }

    /// 0-based position of `value` from the lower bound.
    pub fn offset_of(&self, value: i64) -> Option<u64> {
        self.contains(value).then(|| value.abs_diff(self.lower))
    }

    pub fn value_at(&self, offset: u64) -> Option<i64> {
        i64::try_from(offset)
            .ok()
            .and_then(|o| self.lower.checked_add(o))
            .filter(|v| *v <= self.upper)
    }

    pub fn iter(&self) -> RangeInclusive<i64> {
        self.lower..=self.upper
    }
}

impl Default for RangeModel {
    fn default() -> Self {
        Self { lower: 1, upper: 10 }
    }
}

impl TryFrom<RangeInclusive<i64>> for RangeModel {
    type Error = RangeError;

    fn try_from(range: RangeInclusive<i64>) -> Result<Self, Self::Error> {
        Self::new(*range.start(), *range.end())
    }
}

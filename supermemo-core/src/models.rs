use crate::{CoreError, InvalidValue};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Integer day number. Only differences between two indices carry meaning.
pub type DayIndex = i64;

pub const EF_MIN: f64 = 1.3;
pub const EF_DEFAULT: f64 = 2.5;
pub const INTERVAL_DEFAULT: u32 = 1;
pub const GRADUATING_INTERVAL: u32 = 6;
pub const QUALITY_DEFAULT: u8 = 3;
pub const QUALITY_MAX: u8 = 5;

pub const DIFFICULTY_DEFAULT: f64 = 0.3;
pub const PERFORMANCE_THRESHOLD: f64 = 0.6;
pub const PERCENT_OVERDUE_MAX: f64 = 2.0;

// num_days_from_ce() of 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Discrete recall grade.
///
/// 5 perfect response, 4 correct after hesitation, 3 correct with serious
/// difficulty, 2 incorrect but the answer seemed easy, 1 incorrect but
/// remembered once shown, 0 complete blackout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: i32) -> Result<Self, CoreError> {
        if (0..=QUALITY_MAX as i32).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CoreError::InvalidParameter(InvalidValue::Quality(value)))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_passing(self, passing: u8) -> bool {
        self.0 >= passing
    }
}

impl TryFrom<i32> for Quality {
    type Error = CoreError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for i32 {
    fn from(q: Quality) -> Self {
        q.0 as i32
    }
}

/// Continuous recall score in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Performance(f64);

impl Performance {
    /// NaN is not in [0, 1] and is rejected.
    pub fn new(value: f64) -> Result<Self, CoreError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidParameter(InvalidValue::Performance(value)))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Performance {
    type Error = CoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Performance> for f64 {
    fn from(p: Performance) -> Self {
        p.0
    }
}

pub fn day_index(date: NaiveDate) -> DayIndex {
    (date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE) as DayIndex
}

pub fn date_from_index(day: DayIndex) -> Option<NaiveDate> {
    let days = day.checked_add(UNIX_EPOCH_DAYS_FROM_CE as i64)?;
    NaiveDate::from_num_days_from_ce_opt(i32::try_from(days).ok()?)
}

/// Classic SM2 state for a single item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassicItem {
    pub easiness_factor: f64,
    /// Days until the next review.
    pub interval: u32,
    pub last_quality: u8,
}

impl Default for ClassicItem {
    fn default() -> Self {
        Self {
            easiness_factor: EF_DEFAULT,
            interval: INTERVAL_DEFAULT,
            last_quality: QUALITY_DEFAULT,
        }
    }
}

/// SM2+ state for a single item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlusItem {
    pub last_review_date: DayIndex,
    pub percent_overdue: f64,
    pub difficulty: f64,
    /// Always `3 - 1.7 * difficulty`; never set on its own.
    pub difficulty_weight: f64,
    pub days_between_reviews: f64,
}

impl PlusItem {
    pub fn difficulty_weight_for(difficulty: f64) -> f64 {
        3.0 - 1.7 * difficulty
    }

    /// Day the item is due when stepping by the rounded interval.
    ///
    /// Fails once the interval no longer fits in a day index.
    pub fn next_review_date(&self) -> Result<DayIndex, CoreError> {
        let overflow = || CoreError::DayOverflow {
            from: self.last_review_date,
            days: self.days_between_reviews,
        };
        let step = self.days_between_reviews.round();
        // 2^63 is the first f64 past i64::MAX
        if !(step.abs() < 9_223_372_036_854_775_808.0) {
            return Err(overflow());
        }
        self.last_review_date
            .checked_add(step as DayIndex)
            .ok_or_else(overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_accepts_only_zero_to_five() {
        for q in 0..=5 {
            assert_eq!(Quality::new(q).unwrap().value(), q as u8);
        }
        assert_eq!(
            Quality::new(6),
            Err(CoreError::InvalidParameter(InvalidValue::Quality(6)))
        );
        assert!(Quality::try_from(-1).is_err());
    }

    #[test]
    fn performance_rejects_nan_and_out_of_range() {
        assert!(Performance::new(0.0).is_ok());
        assert!(Performance::new(1.0).is_ok());
        assert!(Performance::new(-0.01).is_err());
        assert!(Performance::new(1.01).is_err());
        assert!(Performance::new(f64::NAN).is_err());
    }

    #[test]
    fn quality_deserialize_validates() {
        let q: Quality = serde_json::from_str("4").unwrap();
        assert_eq!(q.value(), 4);
        assert!(serde_json::from_str::<Quality>("9").is_err());
    }

    #[test]
    fn day_index_round_trips_through_dates() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(day_index(epoch), 0);

        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let idx = day_index(d);
        assert_eq!(idx, 19_783);
        assert_eq!(date_from_index(idx), Some(d));
        assert_eq!(date_from_index(i64::MAX), None);
    }

    #[test]
    fn next_review_date_steps_by_rounded_interval() {
        let mut item = PlusItem {
            last_review_date: 10,
            percent_overdue: 1.0,
            difficulty: 0.3,
            difficulty_weight: PlusItem::difficulty_weight_for(0.3),
            days_between_reviews: 2.59,
        };
        assert_eq!(item.next_review_date(), Ok(13));

        item.days_between_reviews = 1e19;
        assert!(matches!(
            item.next_review_date(),
            Err(CoreError::DayOverflow { from: 10, .. })
        ));

        item.days_between_reviews = 9.0e18;
        item.last_review_date = i64::MAX - 5;
        assert!(item.next_review_date().is_err());

        item.days_between_reviews = f64::INFINITY;
        assert!(item.next_review_date().is_err());
    }

    #[test]
    fn error_messages_name_the_value() {
        let e = Quality::new(7).unwrap_err();
        assert_eq!(e.to_string(), "invalid parameter: quality 7");
        let e = Performance::new(1.5).unwrap_err();
        assert_eq!(e.to_string(), "invalid parameter: performance 1.500000");
    }
}

//! SM2+: continuous performance and an overdue ratio instead of a discrete grade.

use crate::{CoreError, DayIndex, Performance, PlusConfig, PlusItem};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlusTransition {
    /// Performance under the threshold.
    Lapse,
    Review,
}

#[derive(Clone, Debug, Default)]
pub struct PlusScheduler {
    config: PlusConfig,
}

impl PlusScheduler {
    pub fn new(config: PlusConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlusConfig {
        &self.config
    }

    /// Known quirk: `now_date` is ignored and the item starts at the
    /// configured initial review date (day 1 by default).
    pub fn create(&self, _now_date: DayIndex) -> PlusItem {
        let difficulty = self.config.default_difficulty;
        PlusItem {
            last_review_date: self.config.initial_review_date,
            percent_overdue: 1.0,
            difficulty,
            difficulty_weight: PlusItem::difficulty_weight_for(difficulty),
            days_between_reviews: self.config.initial_days_between_reviews,
        }
    }

    /// Applies one review on day `now_date`. Dates are not checked for
    /// monotonicity. On error the item is left untouched.
    ///
    /// Not idempotent: a second call on the same day sees zero elapsed days
    /// and yields a different state.
    pub fn update(
        &self,
        item: &mut PlusItem,
        now_date: DayIndex,
        performance: f64,
    ) -> Result<PlusTransition, CoreError> {
        let performance = Performance::new(performance)?.value();

        let transition = if performance < self.config.performance_threshold {
            // The first two writes are overwritten below. Only the interval
            // reset has a lasting effect, and because the weight never drops
            // under 1.3 it always fires.
            item.percent_overdue = 1.0;
            item.last_review_date = now_date;
            if 1.0 / (item.difficulty_weight * item.difficulty_weight) < 1.0 {
                item.days_between_reviews = 1.0;
            }
            PlusTransition::Lapse
        } else {
            PlusTransition::Review
        };

        let elapsed = (now_date - item.last_review_date) as f64;
        item.percent_overdue =
            (elapsed / item.days_between_reviews).min(self.config.max_percent_overdue);

        item.difficulty += item.percent_overdue * (8.0 - 9.0 * performance) / 17.0;
        item.difficulty = item.difficulty.clamp(0.0, 1.0);

        item.difficulty_weight = PlusItem::difficulty_weight_for(item.difficulty);
        item.days_between_reviews *=
            1.0 + (item.difficulty_weight - 1.0) * item.percent_overdue;
        item.last_review_date = now_date;

        debug!(
            now_date,
            performance,
            ?transition,
            percent_overdue = item.percent_overdue,
            difficulty = item.difficulty,
            days_between_reviews = item.days_between_reviews,
            "sm2+ review applied"
        );
        Ok(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InvalidValue, DIFFICULTY_DEFAULT};

    #[test]
    fn create_ignores_now_date() {
        let s = PlusScheduler::default();
        let item = s.create(500);
        assert_eq!(item.last_review_date, 1);
        assert_eq!(item.difficulty, DIFFICULTY_DEFAULT);
        assert_eq!(item.days_between_reviews, 1.0);
        assert_eq!(item.percent_overdue, 1.0);
        assert_eq!(
            item.difficulty_weight,
            PlusItem::difficulty_weight_for(DIFFICULTY_DEFAULT)
        );
    }

    #[test]
    fn perfect_review_one_day_later() {
        let s = PlusScheduler::default();
        let mut item = s.create(1);
        assert_eq!(s.update(&mut item, 2, 1.0).unwrap(), PlusTransition::Review);

        let difficulty = 0.3 + 1.0 * (8.0 - 9.0 * 1.0) / 17.0;
        let weight = 3.0 - 1.7 * difficulty;
        assert_eq!(item.percent_overdue, 1.0);
        assert_eq!(item.difficulty, difficulty);
        assert_eq!(item.difficulty_weight, weight);
        assert_eq!(item.days_between_reviews, 1.0 * (1.0 + (weight - 1.0) * 1.0));
        assert!((item.days_between_reviews - 2.59).abs() < 1e-9);
        assert_eq!(item.last_review_date, 2);
    }

    #[test]
    fn lapse_resets_interval_and_sees_no_elapsed_time() {
        let s = PlusScheduler::default();
        let mut item = PlusItem {
            last_review_date: 10,
            percent_overdue: 0.5,
            difficulty: 0.4,
            difficulty_weight: PlusItem::difficulty_weight_for(0.4),
            days_between_reviews: 9.0,
        };
        assert_eq!(s.update(&mut item, 20, 0.2).unwrap(), PlusTransition::Lapse);
        assert_eq!(item.percent_overdue, 0.0);
        assert_eq!(item.difficulty, 0.4);
        assert_eq!(item.days_between_reviews, 1.0);
        assert_eq!(item.last_review_date, 20);
    }

    #[test]
    fn overdue_ratio_is_capped() {
        let s = PlusScheduler::default();
        let mut item = s.create(1);
        s.update(&mut item, 100, 0.9).unwrap();
        assert_eq!(item.percent_overdue, 2.0);
    }

    #[test]
    fn difficulty_clamped_to_unit_range() {
        let s = PlusScheduler::default();
        let mut item = s.create(1);
        item.difficulty = 0.95;
        s.update(&mut item, 3, 0.6).unwrap();
        assert_eq!(item.difficulty, 1.0);
        assert!((item.difficulty_weight - 1.3).abs() < 1e-12);

        item.difficulty = 0.01;
        let next = item.next_review_date().unwrap();
        s.update(&mut item, next + 5, 1.0).unwrap();
        assert_eq!(item.difficulty, 0.0);
        assert_eq!(item.difficulty_weight, 3.0);
    }

    #[test]
    fn same_day_repeat_is_not_idempotent() {
        let s = PlusScheduler::default();
        let mut item = s.create(1);
        s.update(&mut item, 2, 0.8).unwrap();
        let first = item.clone();
        s.update(&mut item, 2, 0.8).unwrap();
        assert_eq!(item.percent_overdue, 0.0);
        assert_ne!(item.percent_overdue, first.percent_overdue);
        assert_eq!(item.days_between_reviews, first.days_between_reviews);
    }

    #[test]
    fn invalid_performance_leaves_item_untouched() {
        let s = PlusScheduler::default();
        let mut item = s.create(1);
        let before = item.clone();
        assert_eq!(
            s.update(&mut item, 2, 1.5),
            Err(CoreError::InvalidParameter(InvalidValue::Performance(1.5)))
        );
        assert!(s.update(&mut item, 2, -0.1).is_err());
        assert!(s.update(&mut item, 2, f64::NAN).is_err());
        assert_eq!(item, before);
    }

    #[test]
    fn threshold_is_configurable() {
        let s = PlusScheduler::new(PlusConfig {
            performance_threshold: 0.9,
            ..PlusConfig::default()
        });
        let mut item = s.create(1);
        assert_eq!(s.update(&mut item, 2, 0.8).unwrap(), PlusTransition::Lapse);
    }
}

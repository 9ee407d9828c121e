//! Classic SM2.
//!
//! `EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`, floored at 1.3.
//! Intervals go 1, 6, then `floor(I(n-1) * EF')`.

use crate::{ClassicConfig, ClassicItem, CoreError, Quality};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which branch an update took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassicTransition {
    /// Failed recall: easiness factor and interval go back to their defaults.
    Reset,
    /// First successful repetition: interval jumps to the graduating interval
    /// and the easiness factor is put back to its default, discarding the
    /// value just computed. Textbook SM2 keeps it.
    FirstRepetition,
    /// Interval grows by the new easiness factor.
    Advance,
}

#[derive(Clone, Debug, Default)]
pub struct ClassicScheduler {
    config: ClassicConfig,
}

impl ClassicScheduler {
    pub fn new(config: ClassicConfig) -> Self {
        Self { config }
    }

    pub fn create(&self) -> ClassicItem {
        ClassicItem {
            easiness_factor: self.config.default_ef,
            interval: self.config.initial_interval,
            ..ClassicItem::default()
        }
    }

    /// Applies one graded review. On error the item is left untouched.
    pub fn update(
        &self,
        item: &mut ClassicItem,
        quality: i32,
    ) -> Result<ClassicTransition, CoreError> {
        let quality = Quality::new(quality)?;
        let transition = self.transition(item, quality);
        item.last_quality = quality.value();

        debug!(
            quality = quality.value(),
            ?transition,
            easiness_factor = item.easiness_factor,
            interval = item.interval,
            "classic review applied"
        );
        Ok(transition)
    }

    fn transition(&self, item: &mut ClassicItem, quality: Quality) -> ClassicTransition {
        if !quality.is_passing(self.config.passing_quality) {
            item.easiness_factor = self.config.default_ef;
            item.interval = self.config.initial_interval;
            return ClassicTransition::Reset;
        }

        let new_ef = self.clamp_ef(item.easiness_factor + ef_delta(quality));
        item.easiness_factor = new_ef;

        if item.interval == self.config.initial_interval {
            item.interval = self.config.graduating_interval;
            item.easiness_factor = self.config.default_ef;
            ClassicTransition::FirstRepetition
        } else {
            item.interval = (item.interval as f64 * new_ef).floor() as u32;
            ClassicTransition::Advance
        }
    }

    fn clamp_ef(&self, x: f64) -> f64 {
        x.max(self.config.min_ef)
    }
}

fn ef_delta(quality: Quality) -> f64 {
    let miss = 5.0 - quality.value() as f64;
    0.1 - miss * (0.08 + miss * 0.02)
}

use crate::{
    CoreError, DayIndex, DIFFICULTY_DEFAULT, EF_DEFAULT, EF_MIN, GRADUATING_INTERVAL,
    INTERVAL_DEFAULT, PERCENT_OVERDUE_MAX, PERFORMANCE_THRESHOLD, QUALITY_DEFAULT, QUALITY_MAX,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassicConfig {
    pub default_ef: f64,
    pub min_ef: f64,
    pub initial_interval: u32,
    /// Grades below this restart the item.
    pub passing_quality: u8,
    pub graduating_interval: u32,
}

impl Default for ClassicConfig {
    fn default() -> Self {
        Self {
            default_ef: EF_DEFAULT,
            min_ef: EF_MIN,
            initial_interval: INTERVAL_DEFAULT,
            passing_quality: QUALITY_DEFAULT,
            graduating_interval: GRADUATING_INTERVAL,
        }
    }
}

impl ClassicConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.min_ef > 0.0) {
            return Err(CoreError::InvalidConfig("min_ef must be positive"));
        }
        if !(self.default_ef >= self.min_ef) {
            return Err(CoreError::InvalidConfig("default_ef must be at least min_ef"));
        }
        if self.initial_interval < 1 || self.graduating_interval < 1 {
            return Err(CoreError::InvalidConfig("intervals must be at least one day"));
        }
        if self.passing_quality > QUALITY_MAX {
            return Err(CoreError::InvalidConfig("passing_quality must be in 0..=5"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlusConfig {
    /// Performances below this count as a failed recall.
    pub performance_threshold: f64,
    pub default_difficulty: f64,
    pub max_percent_overdue: f64,
    pub initial_days_between_reviews: f64,
    /// Review date stamped on new items, whatever day they are created on.
    pub initial_review_date: DayIndex,
}

impl Default for PlusConfig {
    fn default() -> Self {
        Self {
            performance_threshold: PERFORMANCE_THRESHOLD,
            default_difficulty: DIFFICULTY_DEFAULT,
            max_percent_overdue: PERCENT_OVERDUE_MAX,
            initial_days_between_reviews: 1.0,
            initial_review_date: 1,
        }
    }
}

impl PlusConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.performance_threshold) {
            return Err(CoreError::InvalidConfig("performance_threshold must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.default_difficulty) {
            return Err(CoreError::InvalidConfig("default_difficulty must be in [0, 1]"));
        }
        if !(self.max_percent_overdue > 0.0) {
            return Err(CoreError::InvalidConfig("max_percent_overdue must be positive"));
        }
        if !(self.initial_days_between_reviews > 0.0) {
            return Err(CoreError::InvalidConfig(
                "initial_days_between_reviews must be positive",
            ));
        }
        Ok(())
    }
}

/// Both scheduler configurations, as read from a config file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub classic: ClassicConfig,
    pub plus: PlusConfig,
}

impl SchedulerConfig {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.classic.validate()?;
        self.plus.validate()
    }
}

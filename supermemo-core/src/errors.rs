use std::fmt;
use thiserror::Error;

/// The value that failed validation.
#[derive(Clone, Debug, PartialEq)]
pub enum InvalidValue {
    Quality(i32),
    Performance(f64),
}

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidValue::Quality(q) => write!(f, "quality {q}"),
            InvalidValue::Performance(p) => write!(f, "performance {p:.6}"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(InvalidValue),
    #[error("review day out of range: {days} days after day {from}")]
    DayOverflow { from: i64, days: f64 },
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

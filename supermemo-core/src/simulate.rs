//! Replays a sequence of reviews against a fresh item and records every step.

use crate::{
    ClassicItem, ClassicScheduler, ClassicTransition, CoreError, DayIndex, PlusItem,
    PlusScheduler, PlusTransition,
};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassicStep {
    pub quality: i32,
    pub transition: ClassicTransition,
    pub item: ClassicItem,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlusStep {
    pub day: DayIndex,
    pub performance: f64,
    pub transition: PlusTransition,
    pub item: PlusItem,
}

pub fn simulate_classic(
    scheduler: &ClassicScheduler,
    qualities: &[i32],
) -> Result<Vec<ClassicStep>, CoreError> {
    let mut item = scheduler.create();
    let mut steps = Vec::with_capacity(qualities.len());
    for &quality in qualities {
        let transition = scheduler.update(&mut item, quality)?;
        steps.push(ClassicStep {
            quality,
            transition,
            item: item.clone(),
        });
    }
    Ok(steps)
}

/// Each review happens `round(days_between_reviews)` days after the previous
/// one, starting from `start_day`. Runs that push the interval past the range
/// of a day index stop with `CoreError::DayOverflow`.
pub fn simulate_plus_following(
    scheduler: &PlusScheduler,
    start_day: DayIndex,
    performances: &[f64],
) -> Result<Vec<PlusStep>, CoreError> {
    let mut item = scheduler.create(start_day);
    let mut day = start_day;
    let mut steps = Vec::with_capacity(performances.len());
    for &performance in performances {
        day = day
            .checked_add(item.next_review_date()? - item.last_review_date)
            .ok_or(CoreError::DayOverflow {
                from: day,
                days: item.days_between_reviews,
            })?;
        steps.push(plus_step(scheduler, &mut item, day, performance)?);
    }
    Ok(steps)
}

pub fn simulate_plus_on_days(
    scheduler: &PlusScheduler,
    start_day: DayIndex,
    reviews: &[(DayIndex, f64)],
) -> Result<Vec<PlusStep>, CoreError> {
    let mut item = scheduler.create(start_day);
    reviews
        .iter()
        .map(|&(day, performance)| plus_step(scheduler, &mut item, day, performance))
        .collect()
}

fn plus_step(
    scheduler: &PlusScheduler,
    item: &mut PlusItem,
    day: DayIndex,
    performance: f64,
) -> Result<PlusStep, CoreError> {
    let transition = scheduler.update(item, day, performance)?;
    Ok(PlusStep {
        day,
        performance,
        transition,
        item: item.clone(),
    })
}

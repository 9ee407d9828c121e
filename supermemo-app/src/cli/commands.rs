use crate::cli::opts::*;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::Path;
use supermemo_core::{
    date_from_index, day_index, simulate_classic, simulate_plus_following, simulate_plus_on_days,
    ClassicItem, ClassicScheduler, ClassicStep, DayIndex, PlusConfig, PlusItem, PlusScheduler,
    PlusStep, SchedulerConfig,
};
use tracing::{debug, info};

pub fn run_cli(args: Cli) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let classic = ClassicScheduler::new(config.classic);
    let plus = PlusScheduler::new(config.plus);
    let out = Output { json: args.json };

    match args.cmd {
        Command::Classic(cmd) => classic_cmd(&classic, &out, &cmd.qualities),
        Command::Plus(cmd) => plus_cmd(&plus, &out, cmd),
        Command::Demo => demo_cmd(&classic, &plus, &out),
    }
}

pub fn load_config(path: Option<&Path>) -> Result<SchedulerConfig> {
    let Some(path) = path else {
        return Ok(SchedulerConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = SchedulerConfig::from_json(&raw)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    info!(path = %path.display(), "loaded scheduler config");
    Ok(config)
}

fn classic_cmd(scheduler: &ClassicScheduler, out: &Output, qualities: &[i32]) -> Result<()> {
    out.classic_init(&scheduler.create())?;
    for step in simulate_classic(scheduler, qualities)? {
        out.classic_step(&step)?;
    }
    Ok(())
}

fn plus_cmd(scheduler: &PlusScheduler, out: &Output, cmd: PlusCmd) -> Result<()> {
    let run = run_plus(scheduler, &cmd)?;
    out.plus_init(&run.init)?;
    for step in &run.steps {
        out.plus_step(step, run.show_dates)?;
    }
    Ok(())
}

struct PlusRun {
    init: PlusItem,
    steps: Vec<PlusStep>,
    show_dates: bool,
}

/// An explicit start day or date replaces the configured initial review date,
/// so the first review measures elapsed time from the day the item was created.
fn run_plus(scheduler: &PlusScheduler, cmd: &PlusCmd) -> Result<PlusRun> {
    let start = match (cmd.start_date, cmd.start_day) {
        (Some(date), _) => Some(day_index(date)),
        (None, day) => day,
    };
    let scheduler = match start {
        Some(day) => PlusScheduler::new(PlusConfig {
            initial_review_date: day,
            ..scheduler.config().clone()
        }),
        None => scheduler.clone(),
    };
    let start_day = scheduler.config().initial_review_date;
    debug!(start_day, reviews = cmd.performances.len(), "running sm2+");

    let steps = if cmd.days.is_empty() {
        simulate_plus_following(&scheduler, start_day, &cmd.performances)?
    } else {
        let reviews = pair_reviews(&cmd.days, &cmd.performances)?;
        simulate_plus_on_days(&scheduler, start_day, &reviews)?
    };

    Ok(PlusRun {
        init: scheduler.create(start_day),
        steps,
        show_dates: cmd.start_date.is_some(),
    })
}

fn demo_cmd(classic: &ClassicScheduler, plus: &PlusScheduler, out: &Output) -> Result<()> {
    classic_cmd(classic, out, &[2, 4, 5, 3])?;
    out.separator();

    let following = PlusCmd {
        performances: vec![0.7, 0.2, 1.0, 1.0],
        start_day: None,
        start_date: None,
        days: Vec::new(),
    };
    plus_cmd(plus, out, following)?;
    out.separator();

    let daily = PlusCmd {
        performances: vec![1.0; 4],
        start_day: None,
        start_date: None,
        days: vec![2, 3, 4, 5],
    };
    plus_cmd(plus, out, daily)
}

fn pair_reviews(days: &[DayIndex], performances: &[f64]) -> Result<Vec<(DayIndex, f64)>> {
    if days.len() != performances.len() {
        bail!(
            "got {} --on days for {} performances",
            days.len(),
            performances.len()
        );
    }
    Ok(days.iter().copied().zip(performances.iter().copied()).collect())
}

struct Output {
    json: bool,
}

#[derive(Serialize)]
struct Init<'a, T> {
    init: &'a T,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string(value)?);
        Ok(())
    }

    fn classic_init(&self, item: &ClassicItem) -> Result<()> {
        if self.json {
            return self.emit(&Init { init: item });
        }
        println!("init\tef={:.4}\tinterval={}", item.easiness_factor, item.interval);
        Ok(())
    }

    fn classic_step(&self, step: &ClassicStep) -> Result<()> {
        if self.json {
            return self.emit(step);
        }
        println!(
            "q={}\t{:?}\tef={:.4}\tinterval={}",
            step.quality, step.transition, step.item.easiness_factor, step.item.interval
        );
        Ok(())
    }

    fn plus_init(&self, item: &PlusItem) -> Result<()> {
        if self.json {
            return self.emit(&Init { init: item });
        }
        println!("init\t{}", plus_fields(item));
        Ok(())
    }

    fn plus_step(&self, step: &PlusStep, show_dates: bool) -> Result<()> {
        if self.json {
            return self.emit(step);
        }
        let day = match date_from_index(step.day) {
            Some(date) if show_dates => date.to_string(),
            _ => step.day.to_string(),
        };
        println!(
            "day={}\tp={}\t{:?}\t{}",
            day,
            step.performance,
            step.transition,
            plus_fields(&step.item)
        );
        Ok(())
    }

    fn separator(&self) {
        if !self.json {
            println!("-----------------");
        }
    }
}

fn plus_fields(item: &PlusItem) -> String {
    format!(
        "overdue={:.4}\tdifficulty={:.4}\tweight={:.4}\tdays={:.4}",
        item.percent_overdue, item.difficulty, item.difficulty_weight, item.days_between_reviews
    )
}

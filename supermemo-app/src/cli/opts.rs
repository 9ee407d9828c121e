use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(name = "supermemo", version, about = "SM2 / SM2+ review simulator")]
pub struct Cli {
    /// JSON file with `classic` and/or `plus` scheduler settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print one JSON object per line instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a fresh item through classic SM2 grades (0-5)
    Classic(ClassicCmd),
    /// Run a fresh item through SM2+ performances (0.0-1.0)
    Plus(PlusCmd),
    /// Replay the built-in reference sequences
    Demo,
}

#[derive(Debug, Args, Clone)]
pub struct ClassicCmd {
    #[arg(required = true, allow_negative_numbers = true)]
    pub qualities: Vec<i32>,
}

#[derive(Debug, Args, Clone)]
pub struct PlusCmd {
    #[arg(required = true, allow_negative_numbers = true)]
    pub performances: Vec<f64>,

    /// Day index the item is created on (defaults to the configured initial review date)
    #[arg(long, conflicts_with = "start_date")]
    pub start_day: Option<i64>,

    /// Calendar date the item is created on (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Explicit review day for each performance, in order.
    /// Without it each review follows the scheduled interval.
    #[arg(long = "on")]
    pub days: Vec<i64>,
}

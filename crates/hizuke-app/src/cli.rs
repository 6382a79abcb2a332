use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

/// Calendar day, month and date-range calculator.
#[derive(Debug, Parser)]
#[command(name = "hizuke", version, about = "Calendar day, month and date-range calculator")]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a day, optionally shifted by named operations.
    Day(DayArgs),
    /// Show a month with its first and last day.
    Month(MonthArgs),
    /// List every day (or hour) of a range.
    Range(RangeArgs),
    /// Intersect two ranges.
    Overlap(OverlapArgs),
    /// Show today's day and month in the configured timezone.
    Today,
}

#[derive(Debug, Args)]
pub struct DayArgs {
    /// Date or date-time, e.g. `2020-10-20` or `2020-10-20T10:00:00+09:00`.
    pub date: String,

    /// Operation to apply, e.g. `addDays:3` or `sub_month`. Repeatable, applied in order.
    #[arg(long, value_name = "OP[:N]")]
    pub shift: Vec<Shift>,
}

#[derive(Debug, Args)]
pub struct MonthArgs {
    /// Month such as `2020-11`, or any date inside it.
    pub month: String,
}

#[derive(Debug, Args)]
pub struct RangeArgs {
    pub start: String,
    pub end: String,

    /// List the 24 hour boundaries of each day instead of the days.
    #[arg(long)]
    pub hourly: bool,
}

#[derive(Debug, Args)]
pub struct OverlapArgs {
    pub first_start: String,
    pub first_end: String,
    pub second_start: String,
    pub second_end: String,
}

/// A named operation with its count, written `name[:count]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub operation: String,
    pub amount: u32,
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (operation, amount) = match s.split_once(':') {
            Some((operation, amount)) => {
                let amount = amount
                    .parse::<u32>()
                    .map_err(|e| format!("invalid amount `{amount}`: {e}"))?;
                (operation, amount)
            }
            None => (s, 1),
        };

        if operation.is_empty() {
            return Err("missing operation name".to_string());
        }

        Ok(Self {
            operation: operation.to_string(),
            amount,
        })
    }
}

use std::io::Write;

use anyhow::Result;
use hizuke_date::{Clock, DateRange, Day, Month};

use crate::cli::{Command, DayArgs, MonthArgs, OverlapArgs, RangeArgs};

/// ## Summary
/// Runs one subcommand, writing its report to `out`.
///
/// ## Errors
/// Returns the calendar error for unreadable dates, invalid ranges,
/// unknown operations or disjoint ranges, and any I/O error from `out`.
pub fn run(command: &Command, clock: &impl Clock, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Day(args) => day(args, clock, out),
        Command::Month(args) => month(args, clock, out),
        Command::Range(args) => range(args, clock, out),
        Command::Overlap(args) => overlap(args, clock, out),
        Command::Today => today(clock, out),
    }
}

fn day(args: &DayArgs, clock: &impl Clock, out: &mut impl Write) -> Result<()> {
    let mut day = Day::parse_with(&args.date, clock)?;

    for shift in &args.shift {
        day = day.apply(&shift.operation, shift.amount)?;
        tracing::debug!(operation = %shift.operation, amount = shift.amount, %day, "Applied shift");
    }

    writeln!(out, "{day} {} {}", day.weekday(), day.zone())?;
    Ok(())
}

fn month(args: &MonthArgs, clock: &impl Clock, out: &mut impl Write) -> Result<()> {
    let month = Month::parse_with(&args.month, clock)?;

    writeln!(
        out,
        "{month} {}..{} ({} days)",
        month.first_date(),
        month.last_date(),
        month.days_in_month()
    )?;
    Ok(())
}

fn range(args: &RangeArgs, clock: &impl Clock, out: &mut impl Write) -> Result<()> {
    let range = DateRange::parse_with(&args.start, &args.end, clock)?;

    if args.hourly {
        for instant in range.per_hour() {
            writeln!(out, "{}", instant.to_rfc3339())?;
        }
    } else {
        for day in &range {
            writeln!(out, "{day}")?;
        }
    }

    Ok(())
}

fn overlap(args: &OverlapArgs, clock: &impl Clock, out: &mut impl Write) -> Result<()> {
    let first = DateRange::parse_with(&args.first_start, &args.first_end, clock)?;
    let second = DateRange::parse_with(&args.second_start, &args.second_end, clock)?;

    let overlap = first.get_overlapping(&second)?;
    writeln!(out, "{overlap} ({} days)", overlap.length_in_days())?;
    Ok(())
}

fn today(clock: &impl Clock, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{} {}", Day::today(clock), Month::this_month(clock))?;
    Ok(())
}

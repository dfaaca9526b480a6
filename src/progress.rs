//! Progress toward the yearly goal
//!
//! Everything here is a pure function of the task total, the tracked year,
//! the goal and the current instant, so it can be tested without touching
//! the filesystem or the clock.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::{Error, Result};

/// Whether a task is keeping pace with the even-spread schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    Ahead,
    Behind,
}

/// Snapshot of a task's progress at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub total: u64,
    pub goal: u64,
    pub year: i32,
    pub days_in_year: i64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    /// Count an even daily pace would have reached by now
    pub expected: u64,
    /// `total - expected`, saturated to the `i64` range; never negative when ahead
    pub delta: i64,
    pub schedule: Schedule,
    /// Per-day count still needed; `None` once no days remain
    pub daily_needed: Option<f64>,
    pub percent: f64,
}

fn year_bounds(year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?
        .and_hms_opt(0, 0, 0)?
        .and_utc();
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?
        .and_hms_opt(23, 59, 59)?
        .and_utc();
    Some((start, end))
}

impl Progress {
    /// Compute progress for `year` as seen at `now`
    ///
    /// `now` outside the year is clamped: before Jan 1 nothing has elapsed,
    /// after Dec 31 nothing remains.
    pub fn compute(total: u64, goal: u64, year: i32, now: DateTime<Utc>) -> Result<Self> {
        if goal == 0 {
            return Err(Error::InvalidArgument("goal must be > 0".to_string()));
        }
        let (start, end) = year_bounds(year)
            .ok_or_else(|| Error::InvalidArgument(format!("unsupported year {year}")))?;

        let days_in_year = (end.date_naive() - start.date_naive()).num_days() + 1;

        let days_elapsed = if now < start {
            0
        } else {
            (now - start).num_days().min(days_in_year)
        };

        let days_remaining = if now > end {
            0
        } else {
            ((end - now).num_days() + 1).min(days_in_year)
        };

        // Integer math floors, matching "whole repetitions expected so far".
        // days_elapsed <= days_in_year, so the quotient never exceeds goal.
        let expected = u128::from(days_elapsed.unsigned_abs()) * u128::from(goal)
            / u128::from(days_in_year.unsigned_abs());
        let expected = u64::try_from(expected).unwrap_or(goal);

        let delta = i128::from(total) - i128::from(expected);
        let schedule = if delta >= 0 {
            Schedule::Ahead
        } else {
            Schedule::Behind
        };
        let delta = i64::try_from(delta).unwrap_or(if delta > 0 { i64::MAX } else { i64::MIN });

        let daily_needed = if days_remaining == 0 {
            None
        } else {
            Some(goal.saturating_sub(total) as f64 / days_remaining as f64)
        };

        Ok(Self {
            total,
            goal,
            year,
            days_in_year,
            days_elapsed,
            days_remaining,
            expected,
            delta,
            schedule,
            daily_needed,
            percent: total as f64 / goal as f64 * 100.0,
        })
    }

    /// `ahead of schedule by N` / `behind schedule by N`
    pub fn schedule_phrase(&self) -> String {
        match self.schedule {
            Schedule::Ahead => format!("ahead of schedule by {}", self.delta),
            Schedule::Behind => format!("behind schedule by {}", self.delta.unsigned_abs()),
        }
    }

    /// Daily rate rendered for humans, `N/A` when the year is over
    pub fn daily_needed_display(&self) -> String {
        match self.daily_needed {
            Some(rate) => format!("{rate:.1}/day over {} days", self.days_remaining),
            None => "N/A (no days remaining)".to_string(),
        }
    }
}

//! # Occurrence Generator
//!
//! Derives shift instants for one schedule inside a query window. Nothing
//! here is persisted: an [`Occurrence`] is a plain value recomputed on every
//! call from the schedule's cron pattern, duration, active date range and
//! timezone.
//!
//! An instant `t` is a genuine occurrence of a schedule iff asking the cron
//! pattern for "the next fire time strictly after `t` minus one second" yields exactly
//! `t`, and `t` falls inside the schedule's active date range as seen in the
//! schedule's own timezone. Both the generator and the booking validator use
//! that same test through [`ShiftPattern`].
//!
//! Window boundaries are inclusive on both ends. Shift ends are always
//! `start + duration` in absolute time, never wall-clock arithmetic, so a
//! shift that spans a DST change still lasts exactly `duration_minutes`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;
use croner::Cron;
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{WatchError, WatchResult};
use crate::models::{ScheduleId, schedule::Schedule};

/// Cron resolution. Fire times are whole seconds.
pub fn tick() -> Duration {
    Duration::seconds(1)
}

/// Smallest whole second at or after `instant`.
fn ceil_to_tick(instant: DateTime<Utc>) -> DateTime<Utc> {
    let whole = instant.trunc_subsecs(0);
    if whole < instant { whole + tick() } else { whole }
}

/// Inclusive absolute-time query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Window {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> WatchResult<Self> {
        if from > to {
            return Err(WatchError::Validation(format!(
                "window start {from} is after window end {to}"
            )));
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from <= instant && instant <= self.to
    }
}

/// One candidate shift. Carries no identity beyond its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub schedule_id: ScheduleId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timezone: String,
}

/// Resolves the schedule's timezone, falling back to UTC on a missing or
/// unknown name. A bad value never fails the caller.
pub fn resolve_timezone(schedule: &Schedule) -> Tz {
    let Some(name) = schedule.timezone.as_deref().map(str::trim) else {
        return Tz::UTC;
    };
    if name.is_empty() {
        return Tz::UTC;
    }
    match name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(err) => {
            warn!(
                schedule_id = schedule.id,
                timezone = name,
                error = %err,
                "Unknown schedule timezone, falling back to UTC"
            );
            Tz::UTC
        }
    }
}

/// Parses a cron pattern with five (minute-first) or six (second-first) fields.
pub fn parse_cron(pattern: &str) -> Result<Cron> {
    Cron::new(pattern.trim())
        .with_seconds_optional()
        .parse()
        .map_err(|e| eyre!("invalid cron pattern {pattern:?}: {e}"))
}

/// Maps a local wall-clock time to an instant. Ambiguous times resolve to the
/// earlier instant; times inside a DST gap resolve to the first instant after it.
fn local_instant(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt.with_timezone(&Utc);
    }
    let mut probe = naive;
    for _ in 0..(24 * 4) {
        probe += Duration::minutes(15);
        if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
            return dt.with_timezone(&Utc);
        }
    }
    Utc.from_utc_datetime(&naive)
}

fn start_of_day(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    local_instant(tz, date.and_time(NaiveTime::MIN))
}

fn end_of_day(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    match date.succ_opt() {
        Some(next) => start_of_day(tz, next) - tick(),
        None => {
            let last = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
            local_instant(tz, date.and_time(last))
        }
    }
}

/// A schedule compiled for evaluation.
pub struct ShiftPattern {
    schedule_id: ScheduleId,
    cron: Cron,
    duration: Duration,
    tz: Tz,
    active_from: Option<DateTime<Utc>>,
    active_until: Option<DateTime<Utc>>,
}

impl ShiftPattern {
    /// Fails only when the cron pattern does not parse or the duration is not
    /// positive. A bad timezone degrades to UTC instead.
    pub fn compile(schedule: &Schedule) -> Result<Self> {
        let cron = parse_cron(&schedule.cron_pattern)?;
        if schedule.duration_minutes <= 0 {
            return Err(eyre!(
                "schedule {} has non-positive duration {}",
                schedule.id,
                schedule.duration_minutes
            ));
        }
        let tz = resolve_timezone(schedule);

        Ok(Self {
            schedule_id: schedule.id,
            cron,
            duration: Duration::minutes(i64::from(schedule.duration_minutes)),
            tz,
            active_from: schedule.start_date.map(|d| start_of_day(tz, d)),
            active_until: schedule.end_date.map(|d| end_of_day(tz, d)),
        })
    }

    pub fn schedule_id(&self) -> ScheduleId {
        self.schedule_id
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether `instant` lies inside the active date range (inclusive).
    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        self.active_from.is_none_or(|from| instant >= from)
            && self.active_until.is_none_or(|until| instant <= until)
    }

    /// Next fire time strictly after `instant`, if the pattern has one.
    pub fn next_after(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local = instant.with_timezone(&self.tz);
        match self.cron.find_next_occurrence(&local, false) {
            Ok(next) => Some(next.with_timezone(&Utc)),
            Err(err) => {
                debug!(schedule_id = self.schedule_id, error = %err, "Cron pattern has no further fire times");
                None
            }
        }
    }

    /// The boundary test: `start` is a real fire time of the pattern.
    pub fn fires_at(&self, start: DateTime<Utc>) -> bool {
        self.next_after(start - tick()) == Some(start)
    }

    /// Full validity: a real fire time inside the active date range.
    pub fn is_occurrence(&self, start: DateTime<Utc>) -> bool {
        self.is_active_at(start) && self.fires_at(start)
    }

    /// Builds the occurrence starting at `start` without validating it.
    pub fn occurrence_at(&self, start: DateTime<Utc>) -> Occurrence {
        Occurrence {
            schedule_id: self.schedule_id,
            start,
            end: start + self.duration,
            timezone: self.tz.name().to_string(),
        }
    }

    /// Lazily enumerates occurrences inside `window`, ascending.
    pub fn occurrences(&self, window: &Window) -> Occurrences<'_> {
        // Fire times are whole seconds, so a fractional lower bound rounds up.
        let lower = ceil_to_tick(match self.active_from {
            Some(from) => from.max(window.from),
            None => window.from,
        });
        let upper = match self.active_until {
            Some(until) => until.min(window.to),
            None => window.to,
        };

        Occurrences {
            pattern: self,
            cursor: lower - tick(),
            upper,
            done: lower > upper,
        }
    }
}

/// Iterator returned by [`ShiftPattern::occurrences`].
pub struct Occurrences<'a> {
    pattern: &'a ShiftPattern,
    cursor: DateTime<Utc>,
    upper: DateTime<Utc>,
    done: bool,
}

impl Iterator for Occurrences<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.pattern.next_after(self.cursor) {
            Some(start) if start > self.cursor && start <= self.upper => {
                self.cursor = start;
                Some(self.pattern.occurrence_at(start))
            }
            _ => {
                self.done = true;
                None
            }
        }
    }
}

/// Occurrences of one schedule in `window`, ascending, at most `cap` of them.
pub fn generate(schedule: &Schedule, window: &Window, cap: usize) -> Result<Vec<Occurrence>> {
    let pattern = ShiftPattern::compile(schedule)?;
    Ok(pattern.occurrences(window).take(cap).collect())
}

/// Compiles every schedule, logging and skipping the malformed ones.
pub fn compile_schedules(schedules: Vec<Schedule>) -> Vec<(Schedule, ShiftPattern)> {
    schedules
        .into_iter()
        .filter_map(|schedule| match ShiftPattern::compile(&schedule) {
            Ok(pattern) => Some((schedule, pattern)),
            Err(err) => {
                warn!(
                    schedule_id = schedule.id,
                    cron_pattern = %schedule.cron_pattern,
                    error = %err,
                    "Skipping malformed schedule"
                );
                None
            }
        })
        .collect()
}

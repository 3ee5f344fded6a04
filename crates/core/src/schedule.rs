//! Next-scheduled-run projection.
//!
//! Projects a recurring backup schedule (daily/weekly/monthly, or a custom
//! cron string) forward from the last known run. Field arithmetic happens in
//! the local calendar of the supplied `now` and is re-anchored to its
//! timezone at the end, so callers get back instants in the zone they asked
//! about.

use std::fmt;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, Months, NaiveDateTime, NaiveTime, TimeZone,
    Weekday,
};

// ── Frequency ────────────────────────────────────────────────────────

/// Recurrence class of a backup schedule, as spelled in `backupvault.conf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl Frequency {
    /// Accepts the config-file spellings (case-insensitively); anything else
    /// is reported by the projector as unsupported rather than failing.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("daily") {
            Some(Frequency::Daily)
        } else if raw.eq_ignore_ascii_case("weekly") {
            Some(Frequency::Weekly)
        } else if raw.eq_ignore_ascii_case("monthly") {
            Some(Frequency::Monthly)
        } else if raw.eq_ignore_ascii_case("custom") {
            Some(Frequency::Custom)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Custom => "custom",
        }
    }

    /// Canonical cron string written back for the non-custom frequencies.
    pub fn canonical_cron(&self) -> Option<&'static str> {
        match self {
            Frequency::Daily => Some("0 2 * * *"),
            Frequency::Weekly => Some("0 2 * * 0"),
            Frequency::Monthly => Some("0 2 1 * *"),
            Frequency::Custom => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Schedule spec ────────────────────────────────────────────────────

/// Fine-grained schedule fields decoded from a 5-field cron-like string
/// (`minute hour day-of-month month day-of-week`).
///
/// Parsing is defensive: a missing, non-numeric, or out-of-range field falls
/// back to its fixed default rather than failing. Only the fields relevant
/// to the active frequency are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSpec {
    pub minute: u32,
    pub hour: u32,
    pub day_of_month: u32,
    pub day_of_week: Weekday,
}

impl Default for ScheduleSpec {
    fn default() -> Self {
        Self {
            minute: 0,
            hour: 2,
            day_of_month: 1,
            day_of_week: Weekday::Sun,
        }
    }
}

impl ScheduleSpec {
    pub fn parse(raw: Option<&str>) -> Self {
        let defaults = Self::default();
        let Some(raw) = raw else { return defaults };
        let fields: Vec<&str> = raw.split_whitespace().collect();

        Self {
            minute: field_u32(&fields, 0)
                .filter(|m| *m < 60)
                .unwrap_or(defaults.minute),
            hour: field_u32(&fields, 1)
                .filter(|h| *h < 24)
                .unwrap_or(defaults.hour),
            day_of_month: field_u32(&fields, 2)
                .filter(|d| (1..=31).contains(d))
                .unwrap_or(defaults.day_of_month),
            day_of_week: field_u32(&fields, 4)
                .and_then(cron_weekday)
                .unwrap_or(defaults.day_of_week),
        }
    }
}

fn field_u32(fields: &[&str], idx: usize) -> Option<u32> {
    fields.get(idx).and_then(|f| f.parse().ok())
}

/// Cron convention: 0 and 7 both mean Sunday, 1-6 map Monday-Saturday.
fn cron_weekday(n: u32) -> Option<Weekday> {
    match n {
        0 | 7 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

// ── Projection result ────────────────────────────────────────────────

/// Outcome of projecting the next scheduled run.
#[derive(Debug, Clone, PartialEq)]
pub enum NextRun<Tz: TimeZone> {
    /// Concrete future instant in the timezone of the supplied `now`.
    Scheduled(DateTime<Tz>),
    /// Custom cron schedules are not projected; the raw spec is echoed back
    /// so the limitation stays visible instead of failing silently.
    Custom(String),
    /// No frequency configured.
    NotConfigured,
    /// Frequency string outside the recognized values.
    Unsupported(String),
}

impl<Tz: TimeZone> NextRun<Tz>
where
    Tz::Offset: fmt::Display,
{
    /// Dashboard display text.
    pub fn display_string(&self) -> String {
        match self {
            NextRun::Scheduled(at) => at.format("%Y-%m-%d %H:%M:%S %Z").to_string(),
            NextRun::Custom(spec) => format!("Custom: {spec} (see cron)"),
            NextRun::NotConfigured => "N/A (frequency not configured)".to_string(),
            NextRun::Unsupported(freq) => format!("N/A (unsupported frequency '{freq}')"),
        }
    }
}

// ── Projection ───────────────────────────────────────────────────────

/// Compute the single next instant a run is due.
///
/// `last_run` anchors the projection when it lies strictly before `now`
/// (projecting forward from a stale last run keeps the schedule from
/// drifting when the run log lags); otherwise `now` is the anchor.
///
/// Never fails on malformed input: garbled spec fields fall back to their
/// defaults and unknown frequencies yield a descriptive non-result. Purely
/// deterministic given `(last_run, frequency, spec, now)`.
pub fn next_run<Tz: TimeZone>(
    last_run: Option<DateTime<Tz>>,
    frequency: Option<&str>,
    spec: Option<&str>,
    now: DateTime<Tz>,
) -> NextRun<Tz> {
    let freq_raw = match frequency {
        Some(f) if !f.trim().is_empty() => f.trim(),
        _ => return NextRun::NotConfigured,
    };
    let Some(freq) = Frequency::parse(freq_raw) else {
        return NextRun::Unsupported(freq_raw.to_string());
    };

    if freq == Frequency::Custom {
        return match spec {
            Some(s) if !s.trim().is_empty() => NextRun::Custom(s.trim().to_string()),
            _ => NextRun::Unsupported(freq_raw.to_string()),
        };
    }

    let fields = ScheduleSpec::parse(spec);
    let base = match last_run {
        Some(last) if last < now => last,
        _ => now.clone(),
    };

    let tz = now.timezone();
    let base_naive = base.naive_local();

    let candidate = match freq {
        Frequency::Daily => project_daily(base_naive, &fields),
        Frequency::Weekly => project_weekly(base_naive, &fields),
        Frequency::Monthly => project_monthly(base_naive, &fields),
        // Echoed above; kept for exhaustiveness.
        Frequency::Custom => None,
    };

    // Calendar arithmetic only fails at the far end of chrono's supported
    // range; treat that like an unsupported schedule rather than panicking.
    match candidate.and_then(|naive| resolve_local(&tz, naive)) {
        Some(at) => NextRun::Scheduled(at),
        None => NextRun::Unsupported(freq_raw.to_string()),
    }
}

fn spec_time(fields: &ScheduleSpec) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(fields.hour, fields.minute, 0)
}

fn project_daily(base: NaiveDateTime, fields: &ScheduleSpec) -> Option<NaiveDateTime> {
    let mut candidate = base.date().and_time(spec_time(fields)?);
    if candidate <= base {
        candidate = candidate.checked_add_signed(Duration::days(1))?;
    }
    Some(candidate)
}

fn project_weekly(base: NaiveDateTime, fields: &ScheduleSpec) -> Option<NaiveDateTime> {
    let mut candidate = base.date().and_time(spec_time(fields)?);
    let ahead = (i64::from(fields.day_of_week.num_days_from_monday())
        - i64::from(candidate.weekday().num_days_from_monday())
        + 7)
        % 7;
    candidate = candidate.checked_add_signed(Duration::days(ahead))?;
    if candidate <= base {
        candidate = candidate.checked_add_signed(Duration::days(7))?;
    }
    Some(candidate)
}

fn project_monthly(base: NaiveDateTime, fields: &ScheduleSpec) -> Option<NaiveDateTime> {
    let time = spec_time(fields)?;
    match base.date().with_day(fields.day_of_month) {
        Some(day) => {
            let mut candidate = day.and_time(time);
            if candidate <= base {
                // Advance one calendar month. checked_add_months clamps the
                // day to the target month's last valid day (the 31st in a
                // 30-day month becomes the 30th).
                candidate = candidate.checked_add_months(Months::new(1))?;
            }
            Some(candidate)
        }
        // Target day does not exist in the base month (day 31 in February):
        // roll to the first of the following month at the configured time.
        None => {
            let first_next = base
                .date()
                .with_day(1)?
                .checked_add_months(Months::new(1))?;
            Some(first_next.and_time(time))
        }
    }
}

/// Re-anchor a naive local timestamp in `tz`. Ambiguous times (DST
/// fall-back) resolve to the earlier instant; times inside a DST gap slide
/// forward an hour.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(at) => Some(at),
        LocalResult::Ambiguous(earlier, _) => Some(earlier),
        LocalResult::None => naive
            .checked_add_signed(Duration::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn daily_projects_next_occurrence() {
        let last = utc(2024, 1, 20, 10, 0, 0);
        let now = utc(2024, 1, 20, 12, 0, 0);
        let result = next_run(Some(last), Some("daily"), Some("0 2 * * *"), now);
        assert_eq!(result, NextRun::Scheduled(utc(2024, 1, 21, 2, 0, 0)));
    }

    #[test]
    fn daily_is_strictly_ahead_and_within_a_day() {
        let now = utc(2024, 3, 15, 13, 45, 12);
        for (hour, minute) in [(0, 0), (2, 0), (13, 45), (13, 46), (23, 59)] {
            let spec = format!("{minute} {hour} * * *");
            match next_run(None, Some("daily"), Some(&spec), now) {
                NextRun::Scheduled(at) => {
                    assert!(at > now, "{spec}: candidate not ahead of base");
                    assert!(at - now <= Duration::days(1), "{spec}: more than a day out");
                    assert_eq!(at.time().second(), 0);
                }
                other => panic!("{spec}: unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn daily_later_today_stays_today() {
        let now = utc(2024, 1, 20, 1, 0, 0);
        let result = next_run(None, Some("daily"), Some("30 6 * * *"), now);
        assert_eq!(result, NextRun::Scheduled(utc(2024, 1, 20, 6, 30, 0)));
    }

    #[test]
    fn weekly_lands_on_target_weekday() {
        // 2024-01-20 is a Saturday; cron day 0 means Sunday.
        let now = utc(2024, 1, 20, 10, 0, 0);
        let result = next_run(None, Some("weekly"), Some("0 2 * * 0"), now);
        assert_eq!(result, NextRun::Scheduled(utc(2024, 1, 21, 2, 0, 0)));

        for cron_day in 0..=7u32 {
            let spec = format!("0 2 * * {cron_day}");
            match next_run(None, Some("weekly"), Some(&spec), now) {
                NextRun::Scheduled(at) => {
                    assert_eq!(at.weekday(), cron_weekday(cron_day).unwrap());
                    assert!(at > now);
                    assert!(at - now <= Duration::days(7));
                }
                other => panic!("{spec}: unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn weekly_same_day_before_run_time_stays_same_day() {
        // 2024-01-22 is a Monday, one hour before the 02:00 slot.
        let now = utc(2024, 1, 22, 1, 0, 0);
        let result = next_run(None, Some("weekly"), Some("0 2 * * 1"), now);
        assert_eq!(result, NextRun::Scheduled(utc(2024, 1, 22, 2, 0, 0)));
    }

    #[test]
    fn monthly_day_31_rolls_to_first_of_next_month() {
        // February has no day 31, so the candidate rolls to March 1st.
        let now = utc(2024, 2, 10, 0, 0, 0);
        let result = next_run(None, Some("monthly"), Some("0 2 31 * *"), now);
        assert_eq!(result, NextRun::Scheduled(utc(2024, 3, 1, 2, 0, 0)));
    }

    #[test]
    fn monthly_advance_clamps_to_last_valid_day() {
        // Day 31 exists in January but the slot already passed; advancing a
        // month clamps to February 29th (2024 is a leap year).
        let now = utc(2024, 1, 31, 5, 0, 0);
        let result = next_run(None, Some("monthly"), Some("0 2 31 * *"), now);
        assert_eq!(result, NextRun::Scheduled(utc(2024, 2, 29, 2, 0, 0)));
    }

    #[test]
    fn monthly_upcoming_day_stays_in_base_month() {
        let now = utc(2024, 4, 10, 0, 0, 0);
        let result = next_run(None, Some("monthly"), Some("15 4 20 * *"), now);
        assert_eq!(result, NextRun::Scheduled(utc(2024, 4, 20, 4, 15, 0)));
    }

    #[test]
    fn malformed_spec_fields_fall_back_to_defaults() {
        let now = utc(2024, 1, 20, 12, 0, 0);
        let garbled = next_run(None, Some("daily"), Some("xx yy * * *"), now);
        let absent = next_run(None, Some("daily"), None, now);
        assert_eq!(garbled, absent);
        assert_eq!(garbled, NextRun::Scheduled(utc(2024, 1, 21, 2, 0, 0)));
    }

    #[test]
    fn out_of_range_spec_fields_fall_back_to_defaults() {
        let now = utc(2024, 1, 20, 12, 0, 0);
        let result = next_run(None, Some("daily"), Some("99 99 * * *"), now);
        assert_eq!(result, next_run(None, Some("daily"), None, now));
    }

    #[test]
    fn future_last_run_anchors_on_now() {
        let last = utc(2024, 1, 25, 10, 0, 0);
        let now = utc(2024, 1, 20, 12, 0, 0);
        let result = next_run(Some(last), Some("daily"), Some("0 2 * * *"), now);
        assert_eq!(result, NextRun::Scheduled(utc(2024, 1, 21, 2, 0, 0)));
    }

    #[test]
    fn projection_is_deterministic() {
        let last = utc(2024, 1, 20, 10, 0, 0);
        let now = utc(2024, 1, 20, 12, 0, 0);
        let first = next_run(Some(last), Some("weekly"), Some("0 2 * * 3"), now);
        let second = next_run(Some(last), Some("weekly"), Some("0 2 * * 3"), now);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_frequency_is_not_configured() {
        let now = utc(2024, 1, 20, 12, 0, 0);
        assert_eq!(
            next_run::<Utc>(None, None, None, now),
            NextRun::NotConfigured
        );
        assert_eq!(
            next_run::<Utc>(None, Some("  "), None, now),
            NextRun::NotConfigured
        );
    }

    #[test]
    fn unknown_frequency_is_unsupported() {
        let now = utc(2024, 1, 20, 12, 0, 0);
        assert_eq!(
            next_run::<Utc>(None, Some("fortnightly"), None, now),
            NextRun::Unsupported("fortnightly".to_string())
        );
    }

    #[test]
    fn custom_echoes_spec_without_projecting() {
        let now = utc(2024, 1, 20, 12, 0, 0);
        assert_eq!(
            next_run::<Utc>(None, Some("custom"), Some("*/5 1 * * 2"), now),
            NextRun::Custom("*/5 1 * * 2".to_string())
        );
        // Custom without a spec has nothing to echo.
        assert_eq!(
            next_run::<Utc>(None, Some("custom"), Some(""), now),
            NextRun::Unsupported("custom".to_string())
        );
    }

    #[test]
    fn spec_parse_takes_defaults_per_field() {
        let spec = ScheduleSpec::parse(Some("30 5 12 * 3"));
        assert_eq!(spec.minute, 30);
        assert_eq!(spec.hour, 5);
        assert_eq!(spec.day_of_month, 12);
        assert_eq!(spec.day_of_week, Weekday::Wed);

        let partial = ScheduleSpec::parse(Some("15 oops"));
        assert_eq!(partial.minute, 15);
        assert_eq!(partial.hour, 2);
        assert_eq!(partial.day_of_month, 1);
        assert_eq!(partial.day_of_week, Weekday::Sun);

        assert_eq!(ScheduleSpec::parse(None), ScheduleSpec::default());
    }

    #[test]
    fn display_strings_describe_every_outcome() {
        let now = utc(2024, 1, 20, 12, 0, 0);
        let scheduled = next_run(None, Some("daily"), None, now);
        assert!(scheduled.display_string().starts_with("2024-01-21 02:00:00"));
        assert_eq!(
            NextRun::<Utc>::Custom("0 3 * * *".into()).display_string(),
            "Custom: 0 3 * * * (see cron)"
        );
        assert!(NextRun::<Utc>::NotConfigured.display_string().starts_with("N/A"));
        assert!(NextRun::<Utc>::Unsupported("x".into())
            .display_string()
            .contains("unsupported"));
    }
}

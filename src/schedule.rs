use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use crate::models::{ResetInterval, TaskList};

/// Calculates the date a list with the given interval next resets.
///
/// - **Daily**: tomorrow.
/// - **Weekly**: the next Sunday, 1 to 7 days ahead. On a Sunday this is a week later.
/// - **Monthly**: same day next month, clamped to the length of that month
///   (Jan 31 becomes Feb 28 or Feb 29).
/// - **Custom**: `today` unchanged, meaning no scheduled reset.
///
/// Saturates at `NaiveDate::MAX` instead of overflowing.
pub fn next_reset_date(today: NaiveDate, interval: ResetInterval) -> NaiveDate {
    match interval {
        ResetInterval::Daily => add_days(today, 1),
        ResetInterval::Weekly => {
            let days_until_sunday = 7 - today.weekday().number_from_monday() % 7;
            add_days(today, days_until_sunday as u64)
        }
        ResetInterval::Monthly => today.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX),
        ResetInterval::Custom => today,
    }
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Local midnight of the next reset, in `now`'s timezone.
pub fn next_reset<Tz: TimeZone>(now: &DateTime<Tz>, interval: ResetInterval) -> DateTime<Tz> {
    start_of_day(next_reset_date(now.date_naive(), interval), &now.timezone())
}

/// The first instant of `date` in `tz`.
///
/// Where a DST transition skips midnight, the first valid minute after it is used.
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    if let Some(dt) = tz.from_local_datetime(&midnight).earliest() {
        return dt;
    }
    (1..=24 * 60)
        .find_map(|m| tz.from_local_datetime(&(midnight + Duration::minutes(m))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// `false` only for the custom interval, which never resets on its own.
pub fn is_scheduled(interval: ResetInterval) -> bool {
    interval != ResetInterval::Custom
}

/// Whether a list's checked state should have been cleared by `now`.
///
/// Counts from the last reset, or from the list's creation date in `now`'s timezone if it has
/// never been reset.
pub fn is_reset_due<Tz: TimeZone>(list: &TaskList, now: &DateTime<Tz>) -> bool {
    if !is_scheduled(list.reset_interval) {
        return false;
    }
    let anchor = list.last_reset.unwrap_or_else(|| local_date(&list.created_at, &now.timezone()));
    next_reset_date(anchor, list.reset_interval) <= now.date_naive()
}

/// Unchecks every item of a due list and records today's local date as its last reset.
///
/// Returns `true` if the list was reset.
pub fn apply_reset<Tz: TimeZone>(list: &mut TaskList, now: &DateTime<Tz>) -> bool {
    if !is_reset_due(list, now) {
        return false;
    }
    for item in list.items.iter_mut() {
        item.is_checked = false;
    }
    list.last_reset = Some(now.date_naive());
    true
}

fn local_date<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// Dashboard caption for a list's next reset.
///
/// Hours are counted on the clock face: whole days between the dates plus the difference of
/// the hour fields, so minutes are ignored. At 00:30 a daily list is a full day away.
pub fn reset_label<Tz: TimeZone>(now: &DateTime<Tz>, interval: ResetInterval) -> String {
    if !is_scheduled(interval) {
        return "No scheduled reset".to_string();
    }
    let next = next_reset(now, interval);
    let days = next.date_naive().signed_duration_since(now.date_naive()).num_days();
    let hours = days * 24 + next.hour() as i64 - now.hour() as i64;
    if hours < 24 {
        format!("Resets in {} hours", hours)
    } else {
        format!("Resets on {}", weekday_name(next.weekday()))
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

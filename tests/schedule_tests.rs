use famly::models::{Item, ResetInterval, TaskList};
use famly::schedule::{apply_reset, is_reset_due, is_scheduled, next_reset, next_reset_date, reset_label, start_of_day};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc, Weekday};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task_list(interval: ResetInterval, created: NaiveDate) -> TaskList {
    TaskList {
        id: 1,
        title: "Kitchen".into(),
        reset_interval: interval,
        items: vec![
            Item { id: 1, name: "Dishes".into(), is_checked: true },
            Item { id: 2, name: "Floor".into(), is_checked: false },
        ],
        created_at: Utc.from_utc_datetime(&created.and_hms_opt(9, 0, 0).unwrap()),
        last_reset: None,
    }
}

/// Noon UTC on `day`.
fn noon(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
}

#[test]
fn test_daily_is_tomorrow() {
    assert_eq!(next_reset_date(date(2024, 3, 13), ResetInterval::Daily), date(2024, 3, 14));
    assert_eq!(next_reset_date(date(2024, 12, 31), ResetInterval::Daily), date(2025, 1, 1));
}

#[test]
fn test_weekly_on_sunday_is_a_week_later() {
    let sunday = date(2024, 3, 10);
    assert_eq!(sunday.weekday(), Weekday::Sun);
    assert_eq!(next_reset_date(sunday, ResetInterval::Weekly), date(2024, 3, 17));
}

#[test]
fn test_weekly_mid_week_is_coming_sunday() {
    assert_eq!(next_reset_date(date(2024, 3, 11), ResetInterval::Weekly), date(2024, 3, 17));
    assert_eq!(next_reset_date(date(2024, 3, 16), ResetInterval::Weekly), date(2024, 3, 17));
}

#[test]
fn test_weekly_always_next_sunday_within_a_week() {
    let start = date(2024, 1, 1);
    for offset in 0..60 {
        let today = start + Duration::days(offset);
        let next = next_reset_date(today, ResetInterval::Weekly);
        assert_eq!(next.weekday(), Weekday::Sun, "from {}", today);
        assert!(next > today);
        assert!((next - today).num_days() <= 7);
    }
}

#[test]
fn test_monthly_clamps_to_month_end() {
    assert_eq!(next_reset_date(date(2024, 1, 31), ResetInterval::Monthly), date(2024, 2, 29));
    assert_eq!(next_reset_date(date(2023, 1, 31), ResetInterval::Monthly), date(2023, 2, 28));
    assert_eq!(next_reset_date(date(2024, 3, 31), ResetInterval::Monthly), date(2024, 4, 30));
    assert_eq!(next_reset_date(date(2024, 12, 15), ResetInterval::Monthly), date(2025, 1, 15));
}

#[test]
fn test_saturates_at_the_last_date() {
    for interval in [ResetInterval::Daily, ResetInterval::Weekly, ResetInterval::Monthly] {
        assert_eq!(next_reset_date(NaiveDate::MAX, interval), NaiveDate::MAX, "{}", interval);
    }
}

#[test]
fn test_custom_is_unchanged() {
    let today = date(2024, 3, 13);
    assert_eq!(next_reset_date(today, ResetInterval::Custom), today);
    assert!(!is_scheduled(ResetInterval::Custom));
    assert!(is_scheduled(ResetInterval::Monthly));
}

#[test]
fn test_next_reset_is_local_midnight() {
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2024, 3, 13, 15, 30, 0).unwrap();
    let next = next_reset(&now, ResetInterval::Daily);
    assert_eq!(next, tz.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap());
    assert_eq!(next.offset(), now.offset());
}

#[test]
fn test_next_reset_daily_for_any_time_of_day() {
    for hour in [0, 1, 12, 23] {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, hour, 59, 59).unwrap();
        assert_eq!(next_reset(&now, ResetInterval::Daily), start_of_day(date(2024, 7, 1), &Utc));
    }
}

#[test]
fn test_reset_due_counts_from_creation() {
    // created on a Monday; first weekly reset is the following Sunday
    let list = task_list(ResetInterval::Weekly, date(2024, 3, 11));
    assert!(!is_reset_due(&list, &noon(date(2024, 3, 16))));
    assert!(is_reset_due(&list, &noon(date(2024, 3, 17))));
    assert!(is_reset_due(&list, &noon(date(2024, 4, 2))));
}

#[test]
fn test_reset_due_uses_local_creation_day() {
    // 01:00 local east of UTC is still the previous day in UTC
    let east = FixedOffset::east_opt(2 * 3600).unwrap();
    let mut list = task_list(ResetInterval::Daily, date(2024, 3, 11));
    list.created_at = east.with_ymd_and_hms(2024, 3, 11, 1, 0, 0).unwrap().with_timezone(&Utc);
    assert_eq!(list.created_at.date_naive(), date(2024, 3, 10));
    assert!(!is_reset_due(&list, &east.with_ymd_and_hms(2024, 3, 11, 23, 0, 0).unwrap()));
    assert!(is_reset_due(&list, &east.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap()));

    // 22:00 local west of UTC is already the next day in UTC
    let west = FixedOffset::west_opt(5 * 3600).unwrap();
    list.created_at = west.with_ymd_and_hms(2024, 3, 10, 22, 0, 0).unwrap().with_timezone(&Utc);
    assert_eq!(list.created_at.date_naive(), date(2024, 3, 11));
    assert!(is_reset_due(&list, &west.with_ymd_and_hms(2024, 3, 11, 0, 30, 0).unwrap()));
}

#[test]
fn test_custom_list_never_due() {
    let list = task_list(ResetInterval::Custom, date(2020, 1, 1));
    assert!(!is_reset_due(&list, &noon(date(2024, 3, 17))));
}

#[test]
fn test_apply_reset_clears_items_once() {
    let mut list = task_list(ResetInterval::Daily, date(2024, 3, 11));
    assert!(!apply_reset(&mut list, &noon(date(2024, 3, 11))));
    assert!(list.items[0].is_checked);

    assert!(apply_reset(&mut list, &noon(date(2024, 3, 12))));
    assert!(list.items.iter().all(|i| !i.is_checked));
    assert_eq!(list.last_reset, Some(date(2024, 3, 12)));

    list.items[1].is_checked = true;
    assert!(!apply_reset(&mut list, &noon(date(2024, 3, 12))));
    assert!(list.items[1].is_checked);
}

#[test]
fn test_apply_reset_stamps_local_date() {
    let east = FixedOffset::east_opt(9 * 3600).unwrap();
    let mut list = task_list(ResetInterval::Daily, date(2024, 3, 11));
    // 2024-03-12 20:00 UTC
    let now = east.with_ymd_and_hms(2024, 3, 13, 5, 0, 0).unwrap();
    assert!(apply_reset(&mut list, &now));
    assert_eq!(list.last_reset, Some(date(2024, 3, 13)));
}

#[test]
fn test_reset_labels() {
    let evening = Utc.with_ymd_and_hms(2024, 3, 13, 20, 0, 0).unwrap();
    assert_eq!(reset_label(&evening, ResetInterval::Daily), "Resets in 4 hours");
    assert_eq!(reset_label(&evening, ResetInterval::Weekly), "Resets on Sunday");
    assert_eq!(reset_label(&evening, ResetInterval::Custom), "No scheduled reset");
}

#[test]
fn test_reset_label_counts_clock_hours() {
    // minutes are ignored: just after midnight the next daily reset is a full day away
    let after_midnight = Utc.with_ymd_and_hms(2024, 3, 13, 0, 30, 0).unwrap();
    assert_eq!(reset_label(&after_midnight, ResetInterval::Daily), "Resets on Thursday");

    let late = Utc.with_ymd_and_hms(2024, 3, 13, 23, 59, 0).unwrap();
    assert_eq!(reset_label(&late, ResetInterval::Daily), "Resets in 1 hours");

    // Saturday morning, weekly resets at Sunday midnight
    let saturday = Utc.with_ymd_and_hms(2024, 3, 16, 9, 45, 0).unwrap();
    assert_eq!(reset_label(&saturday, ResetInterval::Weekly), "Resets in 15 hours");
}

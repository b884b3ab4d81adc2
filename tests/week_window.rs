#![forbid(unsafe_code)]
use chrono::{NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::America::Chicago;
use oncall_rota::week::{self, WeekAnchor};
use oncall_rota::{compute, SchedError};

fn friday_17() -> WeekAnchor {
    WeekAnchor::new(Weekday::Fri, NaiveTime::from_hms_opt(17, 0, 0).unwrap())
}

#[test]
fn first_week_of_2024_starts_friday_evening_local() {
    let time = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
    let (start, end) = compute(2024, 1, "America/Chicago", Weekday::Fri, time).unwrap();

    assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 5, 23, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 12, 23, 0, 0).unwrap());
    assert_eq!(
        week::to_local(start, Chicago).format("%Y-%m-%d %H:%M:%S %Z").to_string(),
        "2024-01-05 17:00:00 CST"
    );
    assert_eq!(week::local_span(start, end, Chicago).num_days(), 7);
}

#[test]
fn week_number_out_of_range_is_rejected() {
    let time = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
    for bad in [0, 54] {
        let err = compute(2024, bad, "America/Chicago", Weekday::Fri, time).unwrap_err();
        assert!(matches!(err, SchedError::InvalidWeekNumber(n) if n == bad));
    }
}

#[test]
fn unknown_timezone_is_rejected() {
    let time = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
    let err = compute(2024, 1, "Mars/Olympus", Weekday::Fri, time).unwrap_err();
    assert!(matches!(err, SchedError::InvalidTimezone(_)));
}

#[test]
fn dst_weeks_keep_seven_local_days() {
    // 2024-03-08 -> 03-15 traverse le passage à l'heure d'été
    let (start, end) = week::window(2024, 10, Chicago, friday_17()).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 8, 23, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 15, 22, 0, 0).unwrap());
    assert_eq!((end - start).num_hours(), 167);
    assert_eq!(week::local_span(start, end, Chicago).num_days(), 7);

    // 2024-11-01 -> 11-08 traverse le retour à l'heure d'hiver
    let (start, end) = week::window(2024, 44, Chicago, friday_17()).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2024, 11, 1, 22, 0, 0).unwrap());
    assert_eq!((end - start).num_hours(), 169);
    assert_eq!(week::local_span(start, end, Chicago).num_days(), 7);
}

#[test]
fn consecutive_weeks_are_contiguous() {
    let total = week::weeks_in_year(2024, friday_17()).unwrap();
    for n in 1..total {
        let (_, end) = week::window(2024, n, Chicago, friday_17()).unwrap();
        let (next_start, _) = week::window(2024, n + 1, Chicago, friday_17()).unwrap();
        assert_eq!(end, next_start, "gap between week {n} and {}", n + 1);
    }
}

#[test]
fn years_chain_into_each_other() {
    for year in [2020, 2024, 2025] {
        let total = week::weeks_in_year(year, friday_17()).unwrap();
        let (_, last_end) = week::window(year, total, Chicago, friday_17()).unwrap();
        let (next_start, _) = week::window(year + 1, 1, Chicago, friday_17()).unwrap();
        assert_eq!(last_end, next_start, "year {year} does not meet {}", year + 1);
    }
}

#[test]
fn weeks_in_year_is_52_or_53() {
    assert_eq!(week::weeks_in_year(2024, friday_17()).unwrap(), 52);
    assert_eq!(week::weeks_in_year(2020, friday_17()).unwrap(), 53);
    assert_eq!(week::weeks_in_year(2026, friday_17()).unwrap(), 53);

    // ancrage lundi : la 52e semaine de 2025 s'arrête le 29 décembre
    let monday = WeekAnchor::new(Weekday::Mon, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert_eq!(week::weeks_in_year(2025, monday).unwrap(), 53);
}

#[test]
fn nonexistent_local_time_moves_forward() {
    let anchor = WeekAnchor::new(Weekday::Sun, NaiveTime::from_hms_opt(2, 30, 0).unwrap());
    let (start, _) = week::window(2024, 10, Chicago, anchor).unwrap();
    // 02:30 n'existe pas le 10 mars : 03:00 CDT
    assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap());

    let (_, previous_end) = week::window(2024, 9, Chicago, anchor).unwrap();
    assert_eq!(previous_end, start);
}

#[test]
fn ambiguous_local_time_takes_earliest() {
    let anchor = WeekAnchor::new(Weekday::Sun, NaiveTime::from_hms_opt(1, 30, 0).unwrap());
    let (start, _) = week::window(2024, 44, Chicago, anchor).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2024, 11, 3, 6, 30, 0).unwrap());
}

#[test]
fn compute_is_pure() {
    let time = NaiveTime::from_hms_opt(9, 15, 0).unwrap();
    let a = compute(2027, 33, "Europe/Paris", Weekday::Wed, time).unwrap();
    let b = compute(2027, 33, "Europe/Paris", Weekday::Wed, time).unwrap();
    assert_eq!(a, b);
}

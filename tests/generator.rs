#![forbid(unsafe_code)]
use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::America::Chicago;
use oncall_rota::week::local_span;
use oncall_rota::{
    assignment_counts, Assignee, HolidayIndex, Roster, RotationConfig, SchedError, Scheduler,
    StaticHolidays, TeamId,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn roster(names: &[&str]) -> Roster {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| Assignee::new(*n, format!("{}", 100 + i)))
        .collect()
}

fn scheduler() -> Scheduler {
    Scheduler::new(&RotationConfig::default()).unwrap()
}

#[test]
fn holiday_cost_counts_local_midnights() {
    let s = scheduler();
    let (start, end) = s.week_window(2024, 1).unwrap();
    let index = HolidayIndex::new([
        date(2024, 1, 5),
        date(2024, 1, 6),
        date(2024, 1, 12),
        date(2024, 1, 13),
    ]);
    // 5 janvier : minuit avant 17:00, compté la semaine précédente
    assert_eq!(index.cost(start, end, Chicago), 2);
    assert_eq!(index.cost_in_zone(start, end, "America/Chicago").unwrap(), 2);
}

#[test]
fn index_for_year_includes_neighbouring_years() {
    let source = StaticHolidays::new([
        date(2023, 12, 25),
        date(2024, 7, 4),
        date(2025, 1, 1),
        date(2026, 1, 1),
    ]);
    let index = HolidayIndex::for_year(&source, 2024).unwrap();
    assert_eq!(index.len(), 3);
    assert!(index.contains(date(2023, 12, 25)));
    assert!(index.contains(date(2025, 1, 1)));
    assert!(!index.contains(date(2026, 1, 1)));
    assert!(HolidayIndex::default().is_empty());
}

#[test]
fn two_person_year_splits_holiday_weeks() {
    let s = scheduler();
    let team = TeamId::new("1");
    let holidays = HolidayIndex::new([date(2024, 1, 1), date(2024, 12, 25), date(2025, 1, 1)]);
    let windows = s
        .generate(&team, 2024, &roster(&["A", "B"]), &holidays)
        .unwrap();

    assert_eq!(windows.len(), 52);
    for pair in windows.windows(2) {
        assert_eq!(pair[0].end_instant, pair[1].start_instant);
        assert_eq!(pair[0].week_number + 1, pair[1].week_number);
    }
    let last = windows.last().unwrap();
    let new_year_midnight = Chicago
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    assert!(last.end_instant >= new_year_midnight);

    // 2024 commence le vendredi 5 janvier : du 1er au 4, c'est la dernière
    // semaine de 2023, le 1er janvier compté est donc celui de 2025
    let jan_1_2024 = Chicago
        .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    assert!(windows.iter().all(|w| !w.covers(jan_1_2024)));
    let (last_2023_start, last_2023_end) = s.week_window(2023, 52).unwrap();
    assert!(last_2023_start <= jan_1_2024 && jan_1_2024 < last_2023_end);
    assert_eq!(last_2023_end, windows[0].start_instant);

    let christmas = Chicago
        .with_ymd_and_hms(2024, 12, 25, 12, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    let new_year = Chicago
        .with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    let christmas_week = windows.iter().find(|w| w.covers(christmas)).unwrap();
    let new_year_week = windows.iter().find(|w| w.covers(new_year)).unwrap();
    assert_ne!(christmas_week.week_number, new_year_week.week_number);
    assert_ne!(christmas_week.assignee_name, new_year_week.assignee_name);

    let counts = assignment_counts(&windows);
    assert_eq!(counts, vec![("A".to_string(), 26), ("B".to_string(), 26)]);
}

#[test]
fn heaviest_weeks_go_first_to_least_loaded() {
    let s = scheduler();
    let team = TeamId::new("ops");
    let holidays = HolidayIndex::new([
        date(2024, 7, 27),
        date(2024, 7, 28),
        date(2024, 3, 11),
    ]);
    let windows = s
        .generate(&team, 2024, &roster(&["A", "B", "C"]), &holidays)
        .unwrap();

    let by_week = |n: u32| windows.iter().find(|w| w.week_number == n).unwrap();
    assert_eq!(by_week(30).assignee_name, "A");
    assert_eq!(by_week(10).assignee_name, "B");
    assert_eq!(by_week(1).assignee_name, "C");
    assert_eq!(by_week(2).assignee_name, "A");
}

#[test]
fn generation_is_deterministic() {
    let s = scheduler();
    let team = TeamId::new("1");
    let source = StaticHolidays::new([
        date(2026, 1, 1),
        date(2026, 7, 4),
        date(2026, 11, 26),
        date(2026, 12, 25),
    ]);
    let holidays = HolidayIndex::for_year(&source, 2026).unwrap();
    let members = roster(&["A", "B", "C", "D"]);

    let first = s.generate(&team, 2026, &members, &holidays).unwrap();
    let second = s.generate(&team, 2026, &members, &holidays).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn counts_differ_by_at_most_one() {
    let s = scheduler();
    let team = TeamId::new("1");
    let holidays = HolidayIndex::new([
        date(2026, 1, 1),
        date(2026, 5, 25),
        date(2026, 12, 24),
        date(2026, 12, 25),
    ]);
    for size in 1..=7 {
        let names: Vec<String> = (0..size).map(|i| format!("P{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let windows = s.generate(&team, 2026, &roster(&refs), &holidays).unwrap();
        assert_eq!(windows.len(), 53);

        let counts: Vec<usize> = assignment_counts(&windows)
            .into_iter()
            .map(|(_, c)| c)
            .collect();
        assert_eq!(counts.len(), size);
        let max = counts.iter().max().unwrap();
        let min = counts.iter().min().unwrap();
        assert!(max - min <= 1, "roster of {size}: {counts:?}");
    }
}

#[test]
fn every_window_spans_seven_local_days() {
    let s = scheduler();
    let windows = s
        .generate(&TeamId::new("1"), 2024, &roster(&["A", "B"]), &HolidayIndex::default())
        .unwrap();
    let mut hours: Vec<i64> = Vec::new();
    for w in &windows {
        assert_eq!(local_span(w.start_instant, w.end_instant, Chicago).num_days(), 7);
        hours.push(w.duration_hours());
    }
    assert!(hours.contains(&167));
    assert!(hours.contains(&169));
}

#[test]
fn empty_roster_is_rejected() {
    let err = scheduler()
        .generate(&TeamId::new("1"), 2024, &Roster::default(), &HolidayIndex::default())
        .unwrap_err();
    assert!(matches!(err, SchedError::EmptyRoster));
}

//! Calcul des fenêtres hebdomadaires.
//!
//! Règle d'ancrage : la semaine 1 commence au premier `anchor_weekday` à partir
//! du lundi de la semaine ISO 1 (celle qui contient le 4 janvier), à
//! `anchor_time` heure locale. Les années successives s'enchaînent donc
//! sans trou.

use crate::config::parse_timezone;
use crate::scheduler::SchedError;
use anyhow::anyhow;
use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc, Weekday,
};
use chrono_tz::Tz;

pub const MAX_WEEK: u32 = 53;

/// Jour et heure locaux où une semaine d'astreinte démarre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekAnchor {
    pub weekday: Weekday,
    pub time: NaiveTime,
}

impl WeekAnchor {
    pub fn new(weekday: Weekday, time: NaiveTime) -> Self {
        Self { weekday, time }
    }
}

/// Fenêtre `(start, end)` pour `(year, week_number)` dans le fuseau nommé.
pub fn compute(
    year: i32,
    week_number: u32,
    timezone_name: &str,
    anchor_weekday: Weekday,
    anchor_time: NaiveTime,
) -> Result<(DateTime<Utc>, DateTime<Utc>), SchedError> {
    let tz = parse_timezone(timezone_name)?;
    window(year, week_number, tz, WeekAnchor::new(anchor_weekday, anchor_time))
}

/// Variante avec fuseau déjà résolu.
///
/// La fin est le début local + 7 jours calendaires, reconvertie en UTC : la
/// durée UTC vaut 167 ou 169 heures quand la semaine traverse un changement
/// d'heure.
pub fn window(
    year: i32,
    week_number: u32,
    tz: Tz,
    anchor: WeekAnchor,
) -> Result<(DateTime<Utc>, DateTime<Utc>), SchedError> {
    let date = anchor_date(year, week_number, anchor.weekday)?;
    let local_start = date.and_time(anchor.time);
    let local_end = local_start + Duration::days(7);
    Ok((resolve_local(tz, local_start), resolve_local(tz, local_end)))
}

/// Date locale de début de la semaine `week_number`.
pub fn anchor_date(year: i32, week_number: u32, weekday: Weekday) -> Result<NaiveDate, SchedError> {
    if !(1..=MAX_WEEK).contains(&week_number) {
        return Err(SchedError::InvalidWeekNumber(week_number));
    }
    let first = first_anchor_date(year, weekday)?;
    Ok(first + Duration::weeks(i64::from(week_number - 1)))
}

fn first_anchor_date(year: i32, weekday: Weekday) -> Result<NaiveDate, SchedError> {
    let monday = NaiveDate::from_isoywd_opt(year, 1, Weekday::Mon)
        .ok_or_else(|| anyhow!("year out of range: {year}"))?;
    Ok(monday + Duration::days(i64::from(weekday.num_days_from_monday())))
}

/// Nombre de semaines à générer pour couvrir l'année (52 ou 53).
///
/// Au moins le nombre de semaines ISO de l'année (pour rejoindre la semaine 1
/// de l'année suivante), et assez pour atteindre le 1er janvier suivant.
pub fn weeks_in_year(year: i32, anchor: WeekAnchor) -> Result<u32, SchedError> {
    let iso = NaiveDate::from_ymd_opt(year, 12, 28)
        .ok_or_else(|| anyhow!("year out of range: {year}"))?
        .iso_week()
        .week();
    let next_new_year = NaiveDate::from_ymd_opt(year + 1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("year out of range: {year}"))?;
    let first = first_anchor_date(year, anchor.weekday)?.and_time(anchor.time);

    let covering = (1..=MAX_WEEK)
        .find(|n| first + Duration::weeks(i64::from(*n)) >= next_new_year)
        .unwrap_or(MAX_WEEK);
    Ok(iso.max(covering).min(MAX_WEEK))
}

/// Convertit une heure locale en UTC de façon déterministe.
///
/// Heure ambiguë (retour à l'heure d'hiver) : le premier instant.
/// Heure inexistante (passage à l'heure d'été) : minute suivante qui existe.
pub fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    let mut probe = naive;
    for _ in 0..(48 * 60) {
        match tz.from_local_datetime(&probe) {
            LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => probe += Duration::minutes(1),
        }
    }
    tz.from_utc_datetime(&naive).with_timezone(&Utc)
}

/// Conversion inverse UTC -> heure locale.
pub fn to_local(instant: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    instant.with_timezone(&tz)
}

/// Écart en heure murale locale entre deux instants.
pub fn local_span(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> Duration {
    to_local(end, tz).naive_local() - to_local(start, tz).naive_local()
}

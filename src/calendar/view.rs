//! Calendar view builders. These are pure over a pre-fetched, date-ordered
//! event slice; handlers resolve the date range, query the store, and hand
//! the rows over.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::calendar::links::{day_link, month_link, roll_month, week_link};
use crate::calendar::week::{week_of, IsoWeek};
use crate::models::event::{Event, EventBody};
use crate::utils::error::AppError;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const DAY_NAMES_SHORT: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub weeks: Vec<WeekRow>,
    pub current_url: String,
    pub prev_url: String,
    pub next_url: String,
}

#[derive(Debug, Serialize)]
pub struct WeekRow {
    pub week: u32,
    pub days: Vec<DayCell>,
}

#[derive(Debug, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub today: bool,
    pub events: Vec<EventBody>,
}

#[derive(Debug, Serialize)]
pub struct WeekView {
    pub year: i32,
    pub week: u32,
    pub monday: NaiveDate,
    pub sunday: NaiveDate,
    pub events: Vec<EventBody>,
    pub current_url: String,
    pub prev_url: String,
    pub next_url: String,
}

#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub month_name: &'static str,
    pub day_of_week: &'static str,
    pub day_of_week_short: &'static str,
    pub events: Vec<EventBody>,
    pub current_url: String,
    pub prev_url: String,
    pub next_url: String,
}

/// First and last date (inclusive) of the full-week grid displayed for a
/// month: the month itself plus the leading and trailing days completing
/// Monday-first weeks.
pub fn month_grid(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), AppError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidDate(format!("{}-{} is not a calendar month", year, month)))?;
    let start = first - Duration::days(first.weekday().num_days_from_monday() as i64);

    let (next_year, next_month) = roll_month(year, month as i32 + 1);
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| AppError::InvalidDate(format!("{}-{} overflows", next_year, next_month)))?;
    let last = next_first - Duration::days(1);
    let end = last + Duration::days(6 - last.weekday().num_days_from_monday() as i64);

    Ok((start, end))
}

pub fn month_view(
    year: i32,
    month: u32,
    now: DateTime<Utc>,
    events: &[Event],
) -> Result<MonthView, AppError> {
    let (start, end) = month_grid(year, month)?;
    let today = now.date_naive();

    let mut weeks = Vec::new();
    let mut date = start;
    while date <= end {
        let mut days = Vec::with_capacity(7);
        for offset in 0..7 {
            let day = date + Duration::days(offset);
            days.push(DayCell {
                date: day,
                in_month: day.month() == month && day.year() == year,
                today: day == today,
                events: events
                    .iter()
                    .filter(|e| e.day() == day)
                    .map(|e| e.body(now))
                    .collect(),
            });
        }
        weeks.push(WeekRow {
            week: week_of(date),
            days,
        });
        date += Duration::days(7);
    }

    Ok(MonthView {
        year,
        month,
        month_name: MONTH_NAMES[(month - 1) as usize],
        weeks,
        current_url: month_link(year, month as i32),
        prev_url: month_link(year, month as i32 - 1),
        next_url: month_link(year, month as i32 + 1),
    })
}

pub fn week_view(week: IsoWeek, now: DateTime<Utc>, events: &[Event]) -> WeekView {
    let monday = week.monday();
    let sunday = week.sunday();
    WeekView {
        year: week.year(),
        week: week.week(),
        monday,
        sunday,
        events: events
            .iter()
            .filter(|e| e.day() >= monday && e.day() <= sunday)
            .map(|e| e.body(now))
            .collect(),
        current_url: week_link(week),
        prev_url: week_link(week.prev()),
        next_url: week_link(week.next()),
    }
}

pub fn day_view(date: NaiveDate, now: DateTime<Utc>, events: &[Event]) -> Result<DayView, AppError> {
    let prev = date
        .pred_opt()
        .ok_or_else(|| AppError::InvalidDate("date underflows the calendar".to_string()))?;
    let next = date
        .succ_opt()
        .ok_or_else(|| AppError::InvalidDate("date overflows the calendar".to_string()))?;

    Ok(DayView {
        date,
        month_name: MONTH_NAMES[(date.month() - 1) as usize],
        day_of_week: DAY_NAMES[date.weekday().num_days_from_monday() as usize],
        day_of_week_short: DAY_NAMES_SHORT[date.weekday().num_days_from_monday() as usize],
        events: events
            .iter()
            .filter(|e| e.day() == date)
            .map(|e| e.body(now))
            .collect(),
        current_url: day_link(date),
        prev_url: day_link(prev),
        next_url: day_link(next),
    })
}

/// UTC midnight opening the given date, for half-open range queries.
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event_on(y: i32, m: u32, d: u32) -> Event {
        let start = Utc.with_ymd_and_hms(y, m, d, 18, 0, 0).unwrap();
        Event {
            id: Uuid::new_v4(),
            date: start,
            length_minutes: Some(120),
            host_id: Uuid::new_v4(),
            added: start - Duration::days(3),
            added_by: Uuid::new_v4(),
        }
    }

    #[test]
    fn grid_covers_full_weeks_monday_first() {
        // January 2017: the 1st is a Sunday, so the grid reaches back to
        // Monday 2016-12-26 and runs through Sunday 2017-02-05.
        let (start, end) = month_grid(2017, 1).unwrap();
        assert_eq!(start, date(2016, 12, 26));
        assert_eq!(end, date(2017, 2, 5));
    }

    #[test]
    fn invalid_months_fail() {
        assert!(matches!(month_grid(2017, 13), Err(AppError::InvalidDate(_))));
        assert!(matches!(month_grid(2017, 0), Err(AppError::InvalidDate(_))));
    }

    #[test]
    fn month_view_tags_weeks_and_today() {
        let now = Utc.with_ymd_and_hms(2017, 1, 15, 10, 0, 0).unwrap();
        let events = vec![event_on(2017, 1, 15), event_on(2016, 12, 28)];
        let view = month_view(2017, 1, now, &events).unwrap();

        assert_eq!(view.month_name, "January");
        assert_eq!(view.weeks.len(), 6);
        assert_eq!(view.weeks[0].week, 52);
        assert_eq!(view.weeks[1].week, 1);

        // Each row is one full week
        for row in &view.weeks {
            assert_eq!(row.days.len(), 7);
        }

        // Leading December days are part of the grid but not the month,
        // and still carry their events.
        let leading = &view.weeks[0].days[2];
        assert_eq!(leading.date, date(2016, 12, 28));
        assert!(!leading.in_month);
        assert_eq!(leading.events.len(), 1);

        let fifteenth = &view.weeks[2].days[6];
        assert_eq!(fifteenth.date, date(2017, 1, 15));
        assert!(fifteenth.in_month);
        assert!(fifteenth.today);
        assert_eq!(fifteenth.events.len(), 1);

        assert_eq!(view.prev_url, "/calendar/2016/12");
        assert_eq!(view.next_url, "/calendar/2017/2");
    }

    #[test]
    fn week_view_spans_monday_to_sunday() {
        let now = Utc.with_ymd_and_hms(2016, 12, 30, 10, 0, 0).unwrap();
        let week = IsoWeek::new(2016, 52).unwrap();
        let events = vec![event_on(2017, 1, 1), event_on(2017, 1, 2)];
        let view = week_view(week, now, &events);

        assert_eq!(view.monday, date(2016, 12, 26));
        assert_eq!(view.sunday, date(2017, 1, 1));
        // Only the Sunday event falls inside this week
        assert_eq!(view.events.len(), 1);
        assert_eq!(view.prev_url, "/calendar/2016/week/51");
        assert_eq!(view.next_url, "/calendar/2017/week/1");
    }

    #[test]
    fn day_view_crosses_month_boundaries() {
        let now = Utc.with_ymd_and_hms(2017, 2, 28, 10, 0, 0).unwrap();
        let view = day_view(date(2017, 3, 1), now, &[]).unwrap();
        assert_eq!(view.prev_url, "/calendar/2017/2/28");
        assert_eq!(view.next_url, "/calendar/2017/3/2");
        assert_eq!(view.day_of_week, "Wednesday");
    }
}

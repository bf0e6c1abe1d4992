use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::utils::error::AppError;

/// ISO-8601 week number of a date.
pub fn week_of(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// An ISO week, anchored at its Monday. Construction validates the
/// (year, week) pair, so boundary lookups can not fail afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoWeek {
    year: i32,
    week: u32,
    monday: NaiveDate,
}

impl IsoWeek {
    pub fn new(year: i32, week: u32) -> Result<Self, AppError> {
        let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).ok_or_else(|| {
            AppError::InvalidDate(format!("week {} does not exist in year {}", week, year))
        })?;
        Ok(Self { year, week, monday })
    }

    pub fn with_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        Self {
            year: iso.year(),
            week: iso.week(),
            monday,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    pub fn sunday(&self) -> NaiveDate {
        self.monday + Duration::days(6)
    }

    pub fn next(&self) -> Self {
        Self::with_date(self.monday + Duration::days(7))
    }

    pub fn prev(&self) -> Self {
        Self::with_date(self.monday - Duration::days(7))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_of_handles_year_boundaries() {
        // 2017-01-01 is a Sunday, still in 2016's last ISO week
        assert_eq!(week_of(date(2017, 1, 1)), 52);
        assert_eq!(week_of(date(2017, 1, 2)), 1);
        // 2015 has 53 ISO weeks
        assert_eq!(week_of(date(2016, 1, 1)), 53);
    }

    #[test]
    fn boundaries_span_monday_to_sunday() {
        let week = IsoWeek::new(2017, 1).unwrap();
        assert_eq!(week.monday(), date(2017, 1, 2));
        assert_eq!(week.sunday(), date(2017, 1, 8));
    }

    #[test]
    fn with_date_matches_iso_year() {
        let week = IsoWeek::with_date(date(2017, 1, 1));
        assert_eq!(week.year(), 2016);
        assert_eq!(week.week(), 52);
        assert_eq!(week.monday(), date(2016, 12, 26));
    }

    #[test]
    fn next_and_prev_cross_year_boundaries() {
        let last = IsoWeek::new(2016, 52).unwrap();
        let first = last.next();
        assert_eq!((first.year(), first.week()), (2017, 1));
        let back = first.prev();
        assert_eq!((back.year(), back.week()), (2016, 52));
    }

    #[test]
    fn invalid_weeks_are_rejected() {
        assert!(IsoWeek::new(2017, 0).is_err());
        assert!(IsoWeek::new(2017, 54).is_err());
        // 2017 has 52 ISO weeks, 2015 has 53
        assert!(IsoWeek::new(2017, 53).is_err());
        assert!(IsoWeek::new(2015, 53).is_ok());
    }
}

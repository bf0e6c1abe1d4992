//! Navigation-target computation. Links are plain URL paths matching the
//! route table; no markup is produced here.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::calendar::week::IsoWeek;

pub const CALENDAR_INDEX: &str = "/calendar";

/// Normalize an out-of-range month by rolling into the adjacent year.
/// Month 0 becomes the previous December, month 13 the next January.
pub fn roll_month(year: i32, month: i32) -> (i32, u32) {
    if month <= 0 {
        (year - 1, (12 + month) as u32)
    } else if month >= 13 {
        (year + 1, (month - 12) as u32)
    } else {
        (year, month as u32)
    }
}

pub fn month_link(year: i32, month: i32) -> String {
    let (year, month) = roll_month(year, month);
    format!("/calendar/{}/{}", year, month)
}

pub fn week_link(week: IsoWeek) -> String {
    format!("/calendar/{}/week/{}", week.year(), week.week())
}

pub fn day_link(date: NaiveDate) -> String {
    format!("/calendar/{}/{}/{}", date.year(), date.month(), date.day())
}

pub fn event_link(id: Uuid) -> String {
    format!("/event/{}", id)
}

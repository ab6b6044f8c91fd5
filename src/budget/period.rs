//! Budget periods and the date windows they cover.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

use crate::Error;

/// How often a budget resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Seven days from the start date.
    Weekly,
    /// One calendar month from the start date.
    Monthly,
    /// One calendar year from the start date.
    Yearly,
}

impl Period {
    /// The name used in JSON and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// The last day of the period that begins on `start`.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the end date is outside the supported date range.
    pub fn window_end(self, start: Date) -> Result<Date, Error> {
        let next_start = match self {
            Self::Weekly => start.checked_add(Duration::days(7)),
            Self::Monthly => add_calendar_months(start, 1),
            Self::Yearly => add_calendar_months(start, 12),
        };

        next_start
            .and_then(Date::previous_day)
            .ok_or_else(|| Error::Validation(format!("start_date {start} is out of range")))
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(format!("unknown budget period \"{other}\"")),
        }
    }
}

/// Add `months` calendar months to `date`.
///
/// The day is clamped to the last day of the resulting month, so Jan 31 plus
/// one month is Feb 28 (or 29 in a leap year).
pub fn add_calendar_months(date: Date, months: u32) -> Option<Date> {
    let zero_based_month = date.month() as i64 - 1 + months as i64;
    let year = date.year() as i64 + zero_based_month.div_euclid(12);
    let year = i32::try_from(year).ok()?;
    let month = Month::try_from((zero_based_month.rem_euclid(12) + 1) as u8).ok()?;
    let day = date.day().min(last_day_of_month(year, month));

    Date::from_calendar_date(year, month, day).ok()
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Weekday names as stored in `faculty_schedule.day_of_week` and reported in
/// replacement details.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString,
    sqlx::Type, ToSchema,
)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

impl DayOfWeek {
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn maps_calendar_dates() {
        // 2024-01-01 was a Monday
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(DayOfWeek::of(monday), DayOfWeek::Monday);
        assert_eq!(DayOfWeek::of(monday.succ_opt().unwrap()), DayOfWeek::Tuesday);

        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(DayOfWeek::of(sunday), DayOfWeek::Sunday);
    }

    #[test]
    fn round_trips_through_names() {
        assert_eq!(DayOfWeek::Wednesday.to_string(), "Wednesday");
        assert_eq!(
            DayOfWeek::from_str("Saturday").unwrap(),
            DayOfWeek::Saturday
        );
        assert!(DayOfWeek::from_str("saturday").is_err());
    }
}

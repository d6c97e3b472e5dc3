//! Study-day handling for streaks.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Timelike};

/// Calendar date of the study day containing `now`.
///
/// Before `daily_reset_hour` the learner is still on the previous day, so a
/// late-night session keeps yesterday's streak alive.
pub fn study_day<Tz: TimeZone>(now: DateTime<Tz>, daily_reset_hour: u32) -> NaiveDate {
    if now.hour() < daily_reset_hour {
        (now - Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    }
}

/// Today's study day in local time.
pub fn get_adjusted_today(daily_reset_hour: u32) -> NaiveDate {
    study_day(Local::now(), daily_reset_hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn midnight_reset_is_calendar_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 30, 0).unwrap();
        assert_eq!(study_day(now, 0), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn before_reset_hour_counts_as_yesterday() {
        let late = Utc.with_ymd_and_hms(2024, 3, 10, 2, 0, 0).unwrap();
        assert_eq!(study_day(late, 4), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());

        let after = Utc.with_ymd_and_hms(2024, 3, 10, 4, 0, 0).unwrap();
        assert_eq!(study_day(after, 4), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }
}

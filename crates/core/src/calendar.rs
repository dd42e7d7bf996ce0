//! Training calendar helpers: where a batch sits relative to today and
//! which batches fall inside a date window.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Upcoming,
    Ongoing,
    Completed,
}

pub fn schedule_status(start: Date, end: Date, today: Date) -> ScheduleStatus {
    if start > today {
        ScheduleStatus::Upcoming
    } else if end < today {
        ScheduleStatus::Completed
    } else {
        ScheduleStatus::Ongoing
    }
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(Date, Date), CoreError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::Validation(format!("Invalid month {year}-{month:02}")))?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_first
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| CoreError::Validation(format!("Invalid month {year}-{month:02}")))?;
    Ok((first, last))
}

/// Check that a filter window is not inverted.
pub fn validate_window(from: Option<Date>, to: Option<Date>) -> Result<(), CoreError> {
    match (from, to) {
        (Some(f), Some(t)) if t < f => Err(CoreError::Validation(format!(
            "end_date ({t}) cannot be before start_date ({f})"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn d(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn status_relative_to_today() {
        let today = d("2026-05-10");
        assert_eq!(schedule_status(d("2026-05-11"), d("2026-05-20"), today), ScheduleStatus::Upcoming);
        assert_eq!(schedule_status(d("2026-05-10"), d("2026-05-20"), today), ScheduleStatus::Ongoing);
        assert_eq!(schedule_status(d("2026-05-01"), d("2026-05-10"), today), ScheduleStatus::Ongoing);
        assert_eq!(schedule_status(d("2026-04-01"), d("2026-05-09"), today), ScheduleStatus::Completed);
    }

    #[test]
    fn month_bounds_handle_leap_and_december() {
        assert_eq!(month_bounds(2028, 2).unwrap(), (d("2028-02-01"), d("2028-02-29")));
        assert_eq!(month_bounds(2026, 12).unwrap(), (d("2026-12-01"), d("2026-12-31")));
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert_matches!(month_bounds(2026, 13), Err(CoreError::Validation(_)));
        assert_matches!(month_bounds(2026, 0), Err(CoreError::Validation(_)));
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert!(validate_window(Some(d("2026-01-01")), Some(d("2026-01-31"))).is_ok());
        assert_matches!(
            validate_window(Some(d("2026-02-01")), Some(d("2026-01-31"))),
            Err(CoreError::Validation(_))
        );
    }
}

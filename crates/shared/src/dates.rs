//! Date arithmetic for the calendar and Gantt views. Dates travel as
//! `YYYY-MM-DD` strings and times as `HH:MM` strings; these helpers validate
//! and compare them without the client and server drifting apart.

use chrono::{NaiveDate, NaiveTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT).ok()
}

/// Width of a Gantt bar: days between two dates, inclusive of both ends.
/// Returns `None` if either string is not a valid date.
pub fn span_days(start: &str, due: &str) -> Option<i64> {
    let start = parse_date(start)?;
    let due = parse_date(due)?;
    Some((due - start).num_days().abs() + 1)
}

/// A task is overdue once today is past its due date and it is not done.
pub fn is_overdue(due_date: &str, done: bool, today: NaiveDate) -> bool {
    if done {
        return false;
    }
    match parse_date(due_date) {
        Some(due) => today > due,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dates_and_times() {
        assert!(parse_date("2025-03-09").is_some());
        assert!(parse_date("09/03/2025").is_none());
        assert!(parse_date("2025-02-30").is_none());
        assert!(parse_time("09:30").is_some());
        assert!(parse_time("24:00").is_none());
        assert!(parse_time("9h30").is_none());
    }

    #[test]
    fn span_is_inclusive() {
        assert_eq!(span_days("2025-03-01", "2025-03-01"), Some(1));
        assert_eq!(span_days("2025-03-01", "2025-03-08"), Some(8));
        // Reversed ranges still yield a positive width.
        assert_eq!(span_days("2025-03-08", "2025-03-01"), Some(8));
        assert_eq!(span_days("2025-03-01", "bad"), None);
    }

    #[test]
    fn overdue_requires_past_due_and_not_done() {
        let today = parse_date("2025-03-10").unwrap();
        assert!(is_overdue("2025-03-09", false, today));
        assert!(!is_overdue("2025-03-10", false, today));
        assert!(!is_overdue("2025-03-09", true, today));
        assert!(!is_overdue("not-a-date", false, today));
    }
}

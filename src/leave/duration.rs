use chrono::{NaiveDate, NaiveTime};

use crate::leave::record::{LeaveKind, LeaveRecord};

/// What one record adds to an employee's totals. Full and half day amounts
/// are in days, hourly amounts in fractional hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeaveAmount {
    FullDays(f64),
    HalfDays(f64),
    Hours(f64),
}

/// Inclusive calendar-day count of a span. A single-day record counts 1.
/// Signed on purpose: dirty historical data with `end < start` propagates
/// its negative count instead of raising.
pub fn span_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    (end_date - start_date).num_days() + 1
}

/// Time-of-day difference in fractional hours on a 24-hour clock. The date
/// is ignored, so a multi-day hourly record means the same daily window
/// repeated over its span, not one elapsed interval.
pub fn hours_between(start_time: NaiveTime, end_time: NaiveTime) -> f64 {
    (end_time - start_time).num_minutes() as f64 / 60.0
}

/// Durations are never stored; they are recomputed from the record so a
/// backdated edit to the leave type shows up in every later report.
pub fn amount(record: &LeaveRecord) -> LeaveAmount {
    let days = span_days(record.start_date, record.end_date) as f64;
    match &record.kind {
        LeaveKind::FullDay => LeaveAmount::FullDays(days),
        LeaveKind::HalfDay { .. } => LeaveAmount::HalfDays(days * 0.5),
        LeaveKind::Hourly {
            start_time,
            end_time,
        } => LeaveAmount::Hours(hours_between(*start_time, *end_time) * days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leave::record::HalfDaySlot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn record(kind: LeaveKind, start: NaiveDate, end: NaiveDate) -> LeaveRecord {
        LeaveRecord {
            employee_id: "EMP-001".into(),
            employee_name: "Alice".into(),
            department: "Engineering".into(),
            kind,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn single_day_full_leave_counts_one_day() {
        let r = record(LeaveKind::FullDay, date(2024, 1, 5), date(2024, 1, 5));
        assert_eq!(amount(&r), LeaveAmount::FullDays(1.0));
    }

    #[test]
    fn full_day_span_is_inclusive() {
        let r = record(LeaveKind::FullDay, date(2024, 1, 1), date(2024, 1, 3));
        assert_eq!(amount(&r), LeaveAmount::FullDays(3.0));
    }

    #[test]
    fn half_day_contributes_half_per_spanned_day() {
        let r = record(
            LeaveKind::HalfDay {
                slot: HalfDaySlot::Morning,
            },
            date(2024, 3, 4),
            date(2024, 3, 7),
        );
        assert_eq!(amount(&r), LeaveAmount::HalfDays(2.0));
    }

    #[test]
    fn hourly_window_is_fractional_and_multiplied_over_span() {
        let r = record(
            LeaveKind::Hourly {
                start_time: time(9, 0),
                end_time: time(17, 30),
            },
            date(2024, 6, 10),
            date(2024, 6, 12),
        );
        assert_eq!(amount(&r), LeaveAmount::Hours(8.5 * 3.0));
    }

    #[test]
    fn hours_between_ignores_the_date_span() {
        assert_eq!(hours_between(time(9, 0), time(12, 0)), 3.0);
        assert_eq!(hours_between(time(23, 0), time(23, 45)), 0.75);
    }

    #[test]
    fn span_crosses_month_boundary() {
        assert_eq!(span_days(date(2024, 2, 25), date(2024, 3, 5)), 10);
    }

    #[test]
    fn inverted_span_propagates_negative_count() {
        let r = record(LeaveKind::FullDay, date(2024, 1, 10), date(2024, 1, 8));
        assert_eq!(amount(&r), LeaveAmount::FullDays(-1.0));
    }
}

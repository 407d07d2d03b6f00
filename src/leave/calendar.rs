use chrono::{Duration, NaiveTime};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::leave::duration::span_days;
use crate::leave::record::{hhmm, HalfDaySlot, LeaveRecord, LeaveType};

/// One event as shown on a calendar day. Carries the record's identity
/// snapshot and shape, never a duration.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "Alice Nguyen")]
    pub employee_name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    pub leave_type: LeaveType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_day_type: Option<HalfDaySlot>,
    #[serde(with = "hhmm", skip_serializing_if = "Option::is_none")]
    #[schema(example = "09:00", value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[serde(with = "hhmm", skip_serializing_if = "Option::is_none")]
    #[schema(example = "17:30", value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
}

impl From<&LeaveRecord> for EventSummary {
    fn from(record: &LeaveRecord) -> Self {
        let (start_time, end_time) = match record.kind.times() {
            Some((s, e)) => (Some(s), Some(e)),
            None => (None, None),
        };
        EventSummary {
            employee_id: record.employee_id.clone(),
            employee_name: record.employee_name.clone(),
            department: record.department.clone(),
            leave_type: record.kind.leave_type(),
            half_day_type: record.kind.half_day_slot(),
            start_time,
            end_time,
        }
    }
}

/// All events touching one calendar day, keyed by its ISO date string.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CalendarDay {
    #[schema(example = "2024-01-02")]
    pub date: String,
    pub events: Vec<EventSummary>,
}

/// Expand each record's inclusive date span into one event per covered day.
///
/// Buckets are created lazily on first touch and returned in first-touch
/// order, so input pre-sorted by start date yields ascending dates. Days
/// nobody is on leave do not appear. Within a bucket, events keep the order
/// their records were supplied in.
pub fn expand(records: &[LeaveRecord]) -> Vec<CalendarDay> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut days: Vec<CalendarDay> = Vec::new();

    for record in records {
        let span = span_days(record.start_date, record.end_date);
        for offset in 0..span {
            let date = record.start_date + Duration::days(offset);
            let key = date.format("%Y-%m-%d").to_string();
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                days.push(CalendarDay {
                    date: key,
                    events: Vec::new(),
                });
                days.len() - 1
            });
            days[slot].events.push(EventSummary::from(record));
        }
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leave::record::LeaveKind;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn full_day(id: &str, start: NaiveDate, end: NaiveDate) -> LeaveRecord {
        LeaveRecord {
            employee_id: id.into(),
            employee_name: format!("Employee {id}"),
            department: "Engineering".into(),
            kind: LeaveKind::FullDay,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn single_day_record_emits_exactly_one_event() {
        let records = vec![full_day("EMP-001", date(2024, 1, 5), date(2024, 1, 5))];
        let days = expand(&records);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, "2024-01-05");
        assert_eq!(days[0].events.len(), 1);
    }

    #[test]
    fn k_day_span_inserts_k_events_one_per_day() {
        let records = vec![full_day("EMP-001", date(2024, 1, 29), date(2024, 2, 2))];
        let days = expand(&records);
        let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            dates,
            ["2024-01-29", "2024-01-30", "2024-01-31", "2024-02-01", "2024-02-02"]
        );
        assert!(days.iter().all(|d| d.events.len() == 1));
    }

    #[test]
    fn buckets_are_sparse() {
        let records = vec![
            full_day("EMP-001", date(2024, 1, 1), date(2024, 1, 1)),
            full_day("EMP-002", date(2024, 1, 10), date(2024, 1, 10)),
        ];
        let days = expand(&records);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-01-01");
        assert_eq!(days[1].date, "2024-01-10");
    }

    #[test]
    fn overlapping_records_share_a_bucket_in_input_order() {
        let hourly = LeaveRecord {
            employee_id: "EMP-002".into(),
            employee_name: "Employee EMP-002".into(),
            department: "Sales".into(),
            kind: LeaveKind::Hourly {
                start_time: time(9, 0),
                end_time: time(12, 0),
            },
            start_date: date(2024, 1, 2),
            end_date: date(2024, 1, 2),
        };
        let records = vec![
            full_day("EMP-001", date(2024, 1, 1), date(2024, 1, 3)),
            hourly,
        ];
        let days = expand(&records);
        assert_eq!(days.len(), 3);
        let middle = &days[1];
        assert_eq!(middle.date, "2024-01-02");
        assert_eq!(middle.events.len(), 2);
        assert_eq!(middle.events[0].employee_id, "EMP-001");
        assert_eq!(middle.events[1].employee_id, "EMP-002");
        assert_eq!(middle.events[1].start_time, Some(time(9, 0)));
    }

    #[test]
    fn expansion_is_reproducible() {
        let records = vec![
            full_day("EMP-001", date(2024, 1, 1), date(2024, 1, 3)),
            full_day("EMP-002", date(2024, 1, 2), date(2024, 1, 4)),
        ];
        assert_eq!(expand(&records), expand(&records));
    }

    #[test]
    fn inverted_span_emits_nothing() {
        let records = vec![full_day("EMP-001", date(2024, 1, 10), date(2024, 1, 8))];
        assert!(expand(&records).is_empty());
    }
}

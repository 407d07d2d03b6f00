use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::leave::duration::{amount, LeaveAmount};
use crate::leave::record::LeaveRecord;

/// Per-employee running totals for a reporting period. Fractions accumulate
/// unrounded; rounding is left to whoever renders the numbers.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStatistic {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "Alice Nguyen")]
    pub employee_name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = 3.5)]
    pub total_days: f64,
    #[schema(example = 6.0)]
    pub total_hours: f64,
    #[schema(example = 3.0)]
    pub full_days: f64,
    #[schema(example = 0.5)]
    pub half_days: f64,
    #[schema(example = 6.0)]
    pub hourly_leaves: f64,
}

impl EmployeeStatistic {
    fn seeded_from(record: &LeaveRecord) -> Self {
        EmployeeStatistic {
            employee_id: record.employee_id.clone(),
            employee_name: record.employee_name.clone(),
            department: record.department.clone(),
            total_days: 0.0,
            total_hours: 0.0,
            full_days: 0.0,
            half_days: 0.0,
            hourly_leaves: 0.0,
        }
    }
}

/// Fold approved records into one statistic per employee, in first-seen key
/// order. The first record for a key seeds the name and department snapshot;
/// later records only add numbers, even if their snapshots differ.
pub fn summarize(records: &[LeaveRecord]) -> Vec<EmployeeStatistic> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut stats: Vec<EmployeeStatistic> = Vec::new();

    for record in records {
        let slot = *index.entry(record.employee_id.clone()).or_insert_with(|| {
            stats.push(EmployeeStatistic::seeded_from(record));
            stats.len() - 1
        });
        let stat = &mut stats[slot];
        match amount(record) {
            LeaveAmount::FullDays(days) => {
                stat.total_days += days;
                stat.full_days += days;
            }
            LeaveAmount::HalfDays(days) => {
                stat.total_days += days;
                stat.half_days += days;
            }
            LeaveAmount::Hours(hours) => {
                stat.total_hours += hours;
                stat.hourly_leaves += hours;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leave::record::{HalfDaySlot, LeaveKind};
    use chrono::{NaiveDate, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn record(
        id: &str,
        name: &str,
        kind: LeaveKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> LeaveRecord {
        LeaveRecord {
            employee_id: id.into(),
            employee_name: name.into(),
            department: "Engineering".into(),
            kind,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn mixed_types_land_in_their_own_counters() {
        let records = vec![
            record(
                "EMP-001",
                "Alice",
                LeaveKind::FullDay,
                date(2024, 1, 1),
                date(2024, 1, 3),
            ),
            record(
                "EMP-001",
                "Alice",
                LeaveKind::Hourly {
                    start_time: time(9, 0),
                    end_time: time(12, 0),
                },
                date(2024, 1, 2),
                date(2024, 1, 2),
            ),
        ];
        let stats = summarize(&records);
        assert_eq!(stats.len(), 1);
        let alice = &stats[0];
        assert_eq!(alice.total_days, 3.0);
        assert_eq!(alice.full_days, 3.0);
        assert_eq!(alice.total_hours, 3.0);
        assert_eq!(alice.hourly_leaves, 3.0);
        assert_eq!(alice.half_days, 0.0);
    }

    #[test]
    fn half_days_accumulate_in_days() {
        let records = vec![record(
            "EMP-002",
            "Binh",
            LeaveKind::HalfDay {
                slot: HalfDaySlot::Afternoon,
            },
            date(2024, 5, 6),
            date(2024, 5, 8),
        )];
        let stats = summarize(&records);
        assert_eq!(stats[0].total_days, 1.5);
        assert_eq!(stats[0].half_days, 1.5);
        assert_eq!(stats[0].full_days, 0.0);
    }

    #[test]
    fn totals_ignore_input_order() {
        let a = record(
            "EMP-001",
            "Alice",
            LeaveKind::FullDay,
            date(2024, 1, 1),
            date(2024, 1, 2),
        );
        let b = record(
            "EMP-002",
            "Binh",
            LeaveKind::Hourly {
                start_time: time(13, 0),
                end_time: time(17, 0),
            },
            date(2024, 1, 3),
            date(2024, 1, 3),
        );
        let c = record(
            "EMP-001",
            "Alice",
            LeaveKind::HalfDay {
                slot: HalfDaySlot::Morning,
            },
            date(2024, 1, 5),
            date(2024, 1, 5),
        );

        let forward = summarize(&[a.clone(), b.clone(), c.clone()]);
        let backward = summarize(&[c, b, a]);

        for stat in &forward {
            let twin = backward
                .iter()
                .find(|s| s.employee_id == stat.employee_id)
                .unwrap();
            assert_eq!(stat, twin);
        }
    }

    #[test]
    fn output_follows_first_seen_key_order() {
        let records = vec![
            record(
                "EMP-009",
                "Zed",
                LeaveKind::FullDay,
                date(2024, 1, 2),
                date(2024, 1, 2),
            ),
            record(
                "EMP-001",
                "Alice",
                LeaveKind::FullDay,
                date(2024, 1, 1),
                date(2024, 1, 1),
            ),
            record(
                "EMP-009",
                "Zed",
                LeaveKind::FullDay,
                date(2024, 1, 9),
                date(2024, 1, 9),
            ),
        ];
        let stats = summarize(&records);
        assert_eq!(stats[0].employee_id, "EMP-009");
        assert_eq!(stats[1].employee_id, "EMP-001");
    }

    #[test]
    fn first_record_wins_the_name_snapshot() {
        let records = vec![
            record(
                "EMP-003",
                "C. Tran",
                LeaveKind::FullDay,
                date(2024, 2, 1),
                date(2024, 2, 1),
            ),
            record(
                "EMP-003",
                "Chi Tran",
                LeaveKind::FullDay,
                date(2024, 2, 5),
                date(2024, 2, 5),
            ),
        ];
        let stats = summarize(&records);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].employee_name, "C. Tran");
        assert_eq!(stats[0].total_days, 2.0);
    }

    #[test]
    fn boundary_straddling_record_is_never_clipped() {
        // Matched under a March period, the record still contributes all
        // ten days, not only the five that fall inside March.
        let records = vec![record(
            "EMP-004",
            "Dat",
            LeaveKind::FullDay,
            date(2024, 2, 25),
            date(2024, 3, 5),
        )];
        let stats = summarize(&records);
        assert_eq!(stats[0].total_days, 10.0);
        assert_eq!(stats[0].full_days, 10.0);
    }
}

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;
use utoipa::ToSchema;

use crate::leave::record::{hhmm, HalfDaySlot, LeaveKind, LeaveRecord, LeaveType};

/// External file reference attached to a request. The upload collaborator
/// owns the bytes; we only keep its metadata.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[schema(example = "https://assets.example.com/leave/att-17283.pdf")]
    pub url: String,
    #[schema(example = "leave/att-17283")]
    pub storage_id: String,
    #[schema(example = "doctor-note.pdf")]
    pub original_name: String,
    #[schema(example = 48213)]
    pub size: u64,
    #[schema(example = "application/pdf")]
    pub mime_type: String,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "Alice Nguyen")]
    pub employee_name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "full_day")]
    pub leave_type: String,
    #[schema(example = "morning")]
    pub half_day_type: Option<String>,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-03", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    #[serde(with = "hhmm")]
    #[schema(example = "09:00", value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[serde(with = "hhmm")]
    #[schema(example = "17:30", value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    #[schema(example = "Family matters")]
    pub reason: Option<String>,
    #[schema(value_type = Vec<Attachment>)]
    pub attachments: sqlx::types::Json<Vec<Attachment>>,
    #[schema(example = "pending")]
    pub status: String,
    pub approved_by: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    /// Core-facing view of the row. Rows that cannot express one of the
    /// three legal shapes (unknown type, half-day without a slot, hourly
    /// missing a time) are logged and dropped, which is the zero-contribution
    /// degradation the reports expect from dirty historical data.
    pub fn to_record(&self) -> Option<LeaveRecord> {
        let leave_type = match LeaveType::from_str(&self.leave_type) {
            Ok(t) => t,
            Err(_) => {
                warn!(id = self.id, leave_type = %self.leave_type, "Unknown leave type on row");
                return None;
            }
        };

        let kind = match leave_type {
            LeaveType::FullDay => LeaveKind::FullDay,
            LeaveType::HalfDay => {
                let slot = self
                    .half_day_type
                    .as_deref()
                    .and_then(|s| HalfDaySlot::from_str(s).ok());
                match slot {
                    Some(slot) => LeaveKind::HalfDay { slot },
                    None => {
                        warn!(id = self.id, "Half-day row without a valid slot");
                        return None;
                    }
                }
            }
            LeaveType::Hourly => match (self.start_time, self.end_time) {
                (Some(start_time), Some(end_time)) => LeaveKind::Hourly {
                    start_time,
                    end_time,
                },
                _ => {
                    warn!(id = self.id, "Hourly row missing start or end time");
                    return None;
                }
            },
        };

        Some(LeaveRecord {
            employee_id: self.employee_id.clone(),
            employee_name: self.employee_name.clone(),
            department: self.department.clone(),
            kind,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(leave_type: &str) -> LeaveRequest {
        LeaveRequest {
            id: 7,
            employee_id: "EMP-001".into(),
            employee_name: "Alice Nguyen".into(),
            department: "Engineering".into(),
            leave_type: leave_type.into(),
            half_day_type: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            start_time: None,
            end_time: None,
            reason: None,
            attachments: sqlx::types::Json(Vec::new()),
            status: "approved".into(),
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            created_at: None,
        }
    }

    #[test]
    fn full_day_row_converts() {
        let record = row("full_day").to_record().unwrap();
        assert_eq!(record.kind, LeaveKind::FullDay);
        assert_eq!(record.employee_id, "EMP-001");
    }

    #[test]
    fn hourly_row_without_times_is_dropped() {
        assert!(row("hourly").to_record().is_none());
    }

    #[test]
    fn hourly_row_with_times_converts() {
        let mut r = row("hourly");
        r.start_time = NaiveTime::from_hms_opt(9, 0, 0);
        r.end_time = NaiveTime::from_hms_opt(12, 0, 0);
        let record = r.to_record().unwrap();
        assert!(matches!(record.kind, LeaveKind::Hourly { .. }));
    }

    #[test]
    fn half_day_row_without_slot_is_dropped() {
        assert!(row("half_day").to_record().is_none());
    }

    #[test]
    fn unknown_type_is_dropped() {
        assert!(row("sabbatical").to_record().is_none());
    }
}

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveType {
    FullDay,
    HalfDay,
    Hourly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HalfDaySlot {
    Morning,
    Afternoon,
    Evening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// Leave shape, closed over the three variants. Each variant carries only
/// the fields legal for it, so a half-day record always has its slot and an
/// hourly record always has both times.
#[derive(Debug, Clone, PartialEq)]
pub enum LeaveKind {
    FullDay,
    HalfDay {
        slot: HalfDaySlot,
    },
    Hourly {
        start_time: NaiveTime,
        end_time: NaiveTime,
    },
}

impl LeaveKind {
    pub fn leave_type(&self) -> LeaveType {
        match self {
            LeaveKind::FullDay => LeaveType::FullDay,
            LeaveKind::HalfDay { .. } => LeaveType::HalfDay,
            LeaveKind::Hourly { .. } => LeaveType::Hourly,
        }
    }

    pub fn half_day_slot(&self) -> Option<HalfDaySlot> {
        match self {
            LeaveKind::HalfDay { slot } => Some(*slot),
            _ => None,
        }
    }

    pub fn times(&self) -> Option<(NaiveTime, NaiveTime)> {
        match self {
            LeaveKind::Hourly {
                start_time,
                end_time,
            } => Some((*start_time, *end_time)),
            _ => None,
        }
    }
}

/// One leave request as the aggregation core sees it: identity snapshot plus
/// the inclusive date span. Status filtering happens before records get here.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRecord {
    pub employee_id: String,
    pub employee_name: String,
    pub department: String,
    pub kind: LeaveKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Serialize `Option<NaiveTime>` as "HH:mm", the format leave times travel
/// in on the wire and in storage.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        match value {
            Some(s) => NaiveTime::parse_from_str(&s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn leave_type_round_trips_through_strings() {
        assert_eq!(LeaveType::FullDay.to_string(), "full_day");
        assert_eq!(LeaveType::from_str("hourly").unwrap(), LeaveType::Hourly);
        assert_eq!(HalfDaySlot::from_str("afternoon").unwrap(), HalfDaySlot::Afternoon);
        assert_eq!(LeaveStatus::Approved.to_string(), "approved");
        assert!(LeaveType::from_str("weekly").is_err());
    }

    #[test]
    fn kind_projects_wire_fields() {
        let hourly = LeaveKind::Hourly {
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
        };
        assert_eq!(hourly.leave_type(), LeaveType::Hourly);
        assert_eq!(hourly.half_day_slot(), None);
        assert!(hourly.times().is_some());

        let half = LeaveKind::HalfDay {
            slot: HalfDaySlot::Morning,
        };
        assert_eq!(half.leave_type(), LeaveType::HalfDay);
        assert_eq!(half.half_day_slot(), Some(HalfDaySlot::Morning));
        assert_eq!(half.times(), None);
    }
}

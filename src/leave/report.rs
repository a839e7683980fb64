use crate::model::day_of_week::DayOfWeek;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Candidate replacements found for one class slot on one leave day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotReport {
    #[schema(example = "09:00:00", value_type = String, format = "time")]
    pub start_time: NaiveTime,
    #[schema(example = "10:00:00", value_type = String, format = "time")]
    pub end_time: NaiveTime,
    /// Usernames returned by the availability lookup, in query order.
    pub replacements: Vec<String>,
}

/// Per-calendar-day slice of the replacement report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    #[schema(example = "2026-03-02", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "Monday")]
    pub day: DayOfWeek,
    /// true iff the applicant teaches at least one class that weekday.
    pub required: bool,
    pub available_replacements: Vec<SlotReport>,
}

impl DayReport {
    /// A day blocks approval only when it is required and some slot came back
    /// with no candidates.
    pub fn is_satisfied(&self) -> bool {
        !self.required
            || self
                .available_replacements
                .iter()
                .all(|slot| !slot.replacements.is_empty())
    }
}

/// Outcome of evaluating one leave request. Rejection is a decision, not an
/// error: it carries the same report shape and nothing is persisted.
#[derive(Debug)]
pub enum LeaveDecision {
    Approved {
        application_id: u64,
        report: Vec<DayReport>,
    },
    Rejected {
        report: Vec<DayReport>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(replacements: &[&str]) -> SlotReport {
        SlotReport {
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            replacements: replacements.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn non_teaching_day_is_always_satisfied() {
        let day = DayReport {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            day: DayOfWeek::Monday,
            required: false,
            available_replacements: Vec::new(),
        };
        assert!(day.is_satisfied());
    }

    #[test]
    fn one_empty_slot_blocks_the_day() {
        let day = DayReport {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            day: DayOfWeek::Monday,
            required: true,
            available_replacements: vec![slot(&["asen"]), slot(&[])],
        };
        assert!(!day.is_satisfied());
    }

    #[test]
    fn report_serializes_with_original_keys() {
        let day = DayReport {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            day: DayOfWeek::Monday,
            required: true,
            available_replacements: vec![slot(&["asen"])],
        };

        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["day"], "Monday");
        assert_eq!(json["availableReplacements"][0]["startTime"], "09:00:00");
        assert_eq!(json["availableReplacements"][0]["replacements"][0], "asen");
    }
}

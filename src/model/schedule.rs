use crate::model::day_of_week::DayOfWeek;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One weekly class slot owned by an account. Created and deleted whole,
/// never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ScheduleEntry {
    #[schema(example = 1)]
    pub schedule_id: u64,

    #[schema(example = "Monday")]
    pub day_of_week: DayOfWeek,

    #[schema(example = "09:00:00", value_type = String, format = "time")]
    pub start_time: NaiveTime,

    #[schema(example = "10:00:00", value_type = String, format = "time")]
    pub end_time: NaiveTime,

    #[schema(example = "Operating Systems")]
    pub subject: String,

    #[schema(example = "B-204")]
    pub room_number: String,
}

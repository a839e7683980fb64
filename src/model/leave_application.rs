use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveApplication {
    pub id: u64,
    pub email: String,
    pub leave_type: String,
    #[schema(example = "2026-03-02", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-04", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    pub reason: String,
    /// Always "Approved" when persisted; rejections are never stored.
    pub status: String,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for an approved application.
#[derive(Debug, Clone)]
pub struct NewLeaveApplication {
    pub email: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

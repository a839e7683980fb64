use crate::errors::ApiError;
use crate::model::{
    day_of_week::DayOfWeek, leave_application::NewLeaveApplication, schedule::ScheduleEntry,
};
use chrono::NaiveTime;
use sqlx::MySqlPool;

/// Directory-store operations the leave evaluator needs. Kept as a trait so
/// the evaluator can be exercised against an in-memory directory in tests.
pub trait FacultyDirectory {
    async fn find_account_id_by_email(&self, email: &str) -> Result<Option<u64>, ApiError>;

    /// The applicant's full weekly schedule, loaded once per evaluation.
    async fn list_schedule(&self, account_id: u64) -> Result<Vec<ScheduleEntry>, ApiError>;

    /// Usernames of accounts whose own schedule entry on `day` COVERS the
    /// requested slot (`start_time <= slot_start AND end_time >= slot_end`).
    ///
    /// Inherited covering-match heuristic: this matches accounts already
    /// teaching across that window, not free ones, and does not exclude the
    /// applicant or de-duplicate. Kept for behavioral parity; see DESIGN.md.
    async fn find_replacements(
        &self,
        day: DayOfWeek,
        slot_start: NaiveTime,
        slot_end: NaiveTime,
    ) -> Result<Vec<String>, ApiError>;

    /// Persist an approved application and bump the applicant's total_leaves
    /// by `days`, atomically. Returns the generated application id.
    async fn record_approved_leave(
        &self,
        application: &NewLeaveApplication,
        account_id: u64,
        days: u32,
    ) -> Result<u64, ApiError>;
}

/// `FacultyDirectory` backed by the MySQL pool.
pub struct MySqlDirectory<'a> {
    pool: &'a MySqlPool,
}

impl<'a> MySqlDirectory<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }
}

impl FacultyDirectory for MySqlDirectory<'_> {
    async fn find_account_id_by_email(&self, email: &str) -> Result<Option<u64>, ApiError> {
        let id = sqlx::query_scalar::<_, u64>("SELECT id FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(id)
    }

    async fn list_schedule(&self, account_id: u64) -> Result<Vec<ScheduleEntry>, ApiError> {
        let entries = sqlx::query_as::<_, ScheduleEntry>(
            r#"
            SELECT schedule_id, day_of_week, start_time, end_time, subject, room_number
            FROM faculty_schedule
            WHERE account_id = ?
            ORDER BY schedule_id
            "#,
        )
        .bind(account_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    async fn find_replacements(
        &self,
        day: DayOfWeek,
        slot_start: NaiveTime,
        slot_end: NaiveTime,
    ) -> Result<Vec<String>, ApiError> {
        let usernames = sqlx::query_scalar::<_, String>(
            r#"
            SELECT u.username
            FROM faculty_schedule fs
            JOIN accounts u ON fs.account_id = u.id
            WHERE fs.day_of_week = ?
            AND fs.start_time <= ?
            AND fs.end_time >= ?
            "#,
        )
        .bind(day)
        .bind(slot_start)
        .bind(slot_end)
        .fetch_all(self.pool)
        .await?;

        Ok(usernames)
    }

    async fn record_approved_leave(
        &self,
        application: &NewLeaveApplication,
        account_id: u64,
        days: u32,
    ) -> Result<u64, ApiError> {
        // Both writes commit or neither does; a half-applied approval would
        // leave the leave counter out of step with the stored application.
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO leave_applications (email, leave_type, start_date, end_date, reason, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&application.email)
        .bind(&application.leave_type)
        .bind(application.start_date)
        .bind(application.end_date)
        .bind(&application.reason)
        .bind("Approved")
        .execute(&mut *tx)
        .await?;

        let application_id = result.last_insert_id();

        sqlx::query("UPDATE accounts SET total_leaves = total_leaves + ? WHERE id = ?")
            .bind(days)
            .bind(account_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(application_id)
    }
}

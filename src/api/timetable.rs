use crate::auth::auth::AuthUser;
use crate::errors::ApiError;
use crate::leave::{FacultyDirectory, MySqlDirectory};
use crate::model::{day_of_week::DayOfWeek, schedule::ScheduleEntry};
use actix_web::{HttpResponse, web};
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct AddScheduleEntry {
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

/// Weekly timetable of the authenticated account
#[utoipa::path(
    get,
    path = "/api/timetable",
    responses(
        (status = 200, description = "Schedule entries of the caller", body = [ScheduleEntry]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Timetable"
)]
pub async fn list_timetable(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let directory = MySqlDirectory::new(pool.get_ref());

    let account_id = directory
        .find_account_id_by_email(&auth.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let entries = directory.list_schedule(account_id).await?;

    Ok(HttpResponse::Ok().json(entries))
}

/// Add a class to the caller's timetable
#[utoipa::path(
    post,
    path = "/api/timetable",
    request_body = AddScheduleEntry,
    responses(
        (status = 201, description = "Class added successfully", body = Object, example = json!({
            "message": "Class added successfully",
            "scheduleId": 42
        })),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Timetable"
)]
pub async fn add_timetable_entry(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<AddScheduleEntry>,
) -> Result<HttpResponse, ApiError> {
    if payload.subject.trim().is_empty() || payload.room_number.trim().is_empty() {
        return Err(ApiError::Validation("Missing required fields".into()));
    }

    if payload.start_time > payload.end_time {
        return Err(ApiError::Validation(
            "start_time cannot be after end_time".into(),
        ));
    }

    let directory = MySqlDirectory::new(pool.get_ref());
    let account_id = directory
        .find_account_id_by_email(&auth.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let result = sqlx::query(
        r#"
        INSERT INTO faculty_schedule
            (account_id, day_of_week, start_time, end_time, subject, room_number)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(account_id)
    .bind(payload.day_of_week)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .bind(payload.subject.trim())
    .bind(payload.room_number.trim())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, account_id, "Failed to add schedule entry");
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Class added successfully",
        "scheduleId": result.last_insert_id()
    })))
}

/// Delete a class from the caller's timetable
#[utoipa::path(
    delete,
    path = "/api/timetable/{schedule_id}",
    params(
        ("schedule_id" = u64, Path, description = "ID of the schedule entry to delete")
    ),
    responses(
        (status = 200, description = "Class deleted successfully", body = Object, example = json!({
            "message": "Class deleted successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Entry missing or not owned by the caller")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Timetable"
)]
pub async fn delete_timetable_entry(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let schedule_id = path.into_inner();

    let directory = MySqlDirectory::new(pool.get_ref());
    let account_id = directory
        .find_account_id_by_email(&auth.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    // Owner-scoped delete: a foreign entry is indistinguishable from a
    // missing one.
    let result =
        sqlx::query("DELETE FROM faculty_schedule WHERE schedule_id = ? AND account_id = ?")
            .bind(schedule_id)
            .bind(account_id)
            .execute(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, schedule_id, "Failed to delete schedule entry");
                ApiError::from(e)
            })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(
            "Class not found or does not belong to the user".into(),
        ));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Class deleted successfully"
    })))
}

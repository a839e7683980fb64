use crate::auth::auth::AuthUser;
use crate::errors::ApiError;
use crate::leave::report::DayReport;
use crate::leave::{LeaveDecision, LeaveRequest, MySqlDirectory, evaluate};
use crate::model::leave_application::LeaveApplication;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ApplyLeaveForm {
    #[serde(rename = "type")]
    #[schema(example = "Casual")]
    pub leave_type: String,
    #[serde(rename = "startDate")]
    #[schema(example = "2026-03-02", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    #[schema(example = "2026-03-04", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    #[schema(example = "Family function")]
    pub reason: String,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveApprovedResponse {
    #[schema(example = "Leave application submitted and approved.")]
    pub message: String,
    #[serde(rename = "applicationId")]
    #[schema(example = 17)]
    pub application_id: u64,
    #[serde(rename = "replacementDetails")]
    pub replacement_details: Vec<DayReport>,
}

/// Apply for leave
///
/// Every calendar day in the range is checked: each of the applicant's
/// classes that day needs at least one replacement candidate, otherwise the
/// whole request is rejected and nothing is stored.
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body = ApplyLeaveForm,
    responses(
        (status = 201, description = "Leave approved and recorded", body = LeaveApprovedResponse),
        (status = 400, description = "Invalid dates, or no replacement available for some slot"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn apply_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ApplyLeaveForm>,
) -> Result<HttpResponse, ApiError> {
    let form = payload.into_inner();

    debug!(
        account_id = auth.account_id,
        role = %auth.role,
        department = %auth.department,
        "Leave application received"
    );

    let directory = MySqlDirectory::new(pool.get_ref());
    let decision = evaluate(
        &directory,
        &auth.email,
        LeaveRequest {
            leave_type: form.leave_type,
            start_date: form.start_date,
            end_date: form.end_date,
            reason: form.reason,
        },
    )
    .await?;

    match decision {
        LeaveDecision::Approved {
            application_id,
            report,
        } => Ok(HttpResponse::Created().json(LeaveApprovedResponse {
            message: "Leave application submitted and approved.".into(),
            application_id,
            replacement_details: report,
        })),
        // A business rejection, not an error: same report shape, nothing
        // persisted.
        LeaveDecision::Rejected { report } => Ok(HttpResponse::BadRequest().json(json!({
            "message": "Leave cannot be approved. No replacement faculty available for all days.",
            "replacementDetails": report,
        }))),
    }
}

/// Leave applications of the authenticated account
#[utoipa::path(
    get,
    path = "/api/leave",
    responses(
        (status = 200, description = "Leave applications of the caller", body = [LeaveApplication]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn list_leave_applications(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let applications = sqlx::query_as::<_, LeaveApplication>(
        r#"
        SELECT id, email, leave_type, start_date, end_date, reason, status, created_at
        FROM leave_applications
        WHERE email = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(&auth.email)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch leave applications");
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(applications))
}

use crate::auth::auth::AuthUser;
use crate::errors::ApiError;
use crate::model::{department::Department, role::Role};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct ProfileResponse {
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "jdoe@college.edu")]
    pub email: String,
    #[schema(example = "CSE")]
    pub department: Department,
    #[schema(example = "faculty")]
    pub role: Role,
    #[schema(example = 10)]
    pub max_leaves: u32,
    #[schema(example = 2)]
    pub total_leaves: u32,
    #[schema(example = 52000)]
    pub salary: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateSalary {
    #[serde(rename = "newSalary")]
    #[schema(example = 55000)]
    pub new_salary: i64,
}

/// Profile of the authenticated account
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile of the caller", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn get_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let profile = sqlx::query_as::<_, ProfileResponse>(
        r#"
        SELECT username, email, department, role, max_leaves, total_leaves, salary
        FROM accounts
        WHERE email = ?
        "#,
    )
    .bind(&auth.email)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch profile");
        ApiError::from(e)
    })?;

    match profile {
        Some(profile) => Ok(HttpResponse::Ok().json(profile)),
        None => Err(ApiError::NotFound("User not found".into())),
    }
}

/// Update the caller's salary
#[utoipa::path(
    put,
    path = "/api/profile/salary",
    request_body = UpdateSalary,
    responses(
        (status = 200, description = "Salary updated successfully", body = Object, example = json!({
            "message": "Salary updated successfully"
        })),
        (status = 400, description = "Missing or negative salary value"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn update_salary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<UpdateSalary>,
) -> Result<HttpResponse, ApiError> {
    if payload.new_salary < 0 {
        return Err(ApiError::Validation("Invalid salary value".into()));
    }

    let result = sqlx::query("UPDATE accounts SET salary = ? WHERE email = ?")
        .bind(payload.new_salary as u64)
        .bind(&auth.email)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update salary");
            ApiError::from(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("User not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Salary updated successfully"
    })))
}

use crate::{
    auth::{
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    errors::ApiError,
    model::{account::Account, department::Department, role::Role},
    models::{LoginForm, SignupForm, TokenType},
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use sqlx::MySqlPool;
use std::str::FromStr;
use tracing::{debug, error, info, instrument};

use crate::utils::identity_cache;
use crate::utils::identity_filter;

/// Pure signup validation: field presence, password confirmation, and the
/// fixed department/role sets.
fn validate_signup(form: &SignupForm) -> Result<(Department, Role), ApiError> {
    if form.username.trim().is_empty()
        || form.email.trim().is_empty()
        || form.password.is_empty()
    {
        return Err(ApiError::Validation(
            "Username, email and password must not be empty".into(),
        ));
    }

    if form.password != form.confirm_password {
        return Err(ApiError::Validation("Passwords do not match".into()));
    }

    let department = Department::from_str(form.department.trim())
        .map_err(|_| ApiError::Validation("Invalid department selected".into()))?;

    let role = Role::from_str(form.role.trim())
        .map_err(|_| ApiError::Validation("Invalid role selected".into()))?;

    Ok((department, role))
}

/// true  => both username and email are AVAILABLE
/// false => at least one is TAKEN
pub async fn is_identity_available(username: &str, email: &str, pool: &MySqlPool) -> bool {
    // 1. Cuckoo filter — fast negative: neither identity can exist
    if !identity_filter::might_exist(username) && !identity_filter::might_exist(email) {
        return true;
    }

    // 2. Moka cache — fast positive
    if identity_cache::is_taken(username).await || identity_cache::is_taken(email).await {
        return false;
    }

    // 3. Database fallback
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM accounts WHERE username = ? OR email = ? LIMIT 1)",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap_or(true); // fail-safe

    !exists
}

/// Inserts a new account and keeps the identity filter/cache populated
async fn insert_account(
    form: &SignupForm,
    department: Department,
    role: Role,
    pool: &MySqlPool,
) -> Result<(), ApiError> {
    let hashed = hash_password(&form.password);

    let result = sqlx::query(
        r#"
        INSERT INTO accounts
            (username, email, department, role, password, salary, max_leaves, total_leaves)
        VALUES (?, ?, ?, ?, ?, ?, 10, 0)
        "#,
    )
    .bind(form.username.trim())
    .bind(form.email.trim())
    .bind(department)
    .bind(role)
    .bind(&hashed)
    .bind(form.salary)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {
            identity_filter::insert(form.username.trim());
            identity_filter::insert(form.email.trim());
            identity_cache::mark_taken(form.username.trim()).await;
            identity_cache::mark_taken(form.email.trim()).await;
            Ok(())
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Err(ApiError::Conflict("Username or email already exists".into()));
                }
            }

            error!(error = %e, "Failed to create account");
            Err(ApiError::from(e))
        }
    }
}

/// Account registration handler
pub async fn signup(
    form: web::Json<SignupForm>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let (department, role) = validate_signup(&form)?;

    if !is_identity_available(form.username.trim(), form.email.trim(), pool.get_ref()).await {
        return Err(ApiError::Conflict("Username or email already exists".into()));
    }

    // Safe to insert after DB check
    insert_account(&form, department, role, pool.get_ref()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Account created successfully"
    })))
}

#[instrument(
    name = "auth_login",
    skip(pool, config, form),
    fields(identity = %form.username)
)]
pub async fn login(
    form: web::Json<LoginForm>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    // 1. Basic validation
    if form.username.trim().is_empty() || form.password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(ApiError::Validation("Username or password required".into()));
    }

    debug!("Fetching account from database");

    // 2. Fetch account by username or email
    let account = sqlx::query_as::<_, Account>(
        r#"
        SELECT id, username, email, department, role, password, salary, max_leaves, total_leaves
        FROM accounts
        WHERE username = ? OR email = ?
        "#,
    )
    .bind(&form.username)
    .bind(&form.username)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Database error while fetching account");
        ApiError::from(e)
    })?;

    let account = match account {
        Some(account) => {
            debug!(account_id = account.id, "Account found");
            account
        }
        None => {
            info!("Invalid credentials: account not found");
            return Err(ApiError::Authentication(
                "Invalid username or password".into(),
            ));
        }
    };

    // 3. Verify password
    debug!("Verifying password");

    if verify_password(&form.password, &account.password).is_err() {
        info!("Invalid credentials: password mismatch");
        return Err(ApiError::Authentication(
            "Invalid username or password".into(),
        ));
    }

    debug!("Password verified");

    // 4. Generate token pair
    let access_token = generate_access_token(
        account.id,
        account.email.clone(),
        account.role,
        account.department,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    let (refresh_token, refresh_claims) = generate_refresh_token(
        account.id,
        account.email.clone(),
        account.role,
        account.department,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    // 5. Store refresh token
    debug!(
        account_id = account.id,
        jti = %refresh_claims.jti,
        "Storing refresh token"
    );

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (account_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(account.id)
    .bind(&refresh_claims.jti)
    .bind(refresh_claims.exp as i64)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to store refresh token");
        ApiError::from(e)
    })?;

    // 6. Update last_login_at (non-fatal)
    if let Err(e) = sqlx::query("UPDATE accounts SET last_login_at = NOW() WHERE id = ?")
        .bind(account.id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to update last_login_at");
        // intentionally not failing login
    }

    info!("Login successful");

    Ok(HttpResponse::Ok().json(json!({
        "email": account.email,
        "role": account.role,
        "department": account.department,
        "access_token": access_token,
        "refresh_token": refresh_token,
    })))
}

pub async fn refresh_token(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return Err(ApiError::Authentication("No token".into())),
    };

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Authentication("Invalid token".into()))?;

    let claims = verify_token(token, &config.jwt_secret)
        .map_err(|_| ApiError::Authentication("Invalid or expired token".into()))?;

    if claims.token_type != TokenType::Refresh {
        return Err(ApiError::Authentication("Not a refresh token".into()));
    }

    // Find refresh token in DB
    let record = sqlx::query_as::<_, (u64, u64, bool)>(
        r#"
        SELECT id, account_id, revoked
        FROM refresh_tokens
        WHERE jti = ?
        "#,
    )
    .bind(&claims.jti)
    .fetch_optional(pool.get_ref())
    .await?;

    let (record_id, account_id) = match record {
        Some((id, account_id, revoked)) if !revoked => (id, account_id),
        _ => return Err(ApiError::Authentication("Token revoked or unknown".into())),
    };

    // Revoke old refresh token
    sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = ?")
        .bind(record_id)
        .execute(pool.get_ref())
        .await?;

    // Issue new refresh token
    let (new_refresh_token, new_claims) = generate_refresh_token(
        claims.account_id,
        claims.sub.clone(),
        claims.role,
        claims.department,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (account_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(account_id)
    .bind(&new_claims.jti)
    .bind(new_claims.exp as i64)
    .execute(pool.get_ref())
    .await?;

    // New access token
    let access_token = generate_access_token(
        claims.account_id,
        claims.sub.clone(),
        claims.role,
        claims.department,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    Ok(HttpResponse::Ok().json(json!({
        "access_token": access_token,
        "refresh_token": new_refresh_token
    })))
}

pub async fn logout(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> HttpResponse {
    // 1. Extract Authorization header
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::NoContent().finish(),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::NoContent().finish(),
    };

    // 2. Verify JWT
    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::NoContent().finish(),
    };

    // 3. Only refresh tokens can log out
    if claims.token_type != TokenType::Refresh {
        return HttpResponse::NoContent().finish();
    }

    // 4. Revoke refresh token (idempotent)
    let _ = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = 1
        WHERE jti = ?
        "#,
    )
    .bind(&claims.jti)
    .execute(pool.get_ref())
    .await;

    // 5. Success (even if token didn't exist)
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SignupForm {
        SignupForm {
            username: "jdoe".into(),
            email: "jdoe@college.edu".into(),
            department: "CSE".into(),
            password: "pass123".into(),
            confirm_password: "pass123".into(),
            role: "faculty".into(),
            salary: 52000,
        }
    }

    #[test]
    fn valid_signup_passes() {
        let (department, role) = validate_signup(&form()).unwrap();
        assert_eq!(department, Department::CSE);
        assert_eq!(role, Role::Faculty);
    }

    #[test]
    fn password_mismatch_is_rejected() {
        let mut f = form();
        f.confirm_password = "different".into();
        match validate_signup(&f) {
            Err(ApiError::Validation(msg)) => assert!(msg.contains("match")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_department_is_rejected() {
        let mut f = form();
        f.department = "EEE".into();
        assert!(matches!(
            validate_signup(&f),
            Err(ApiError::Validation(msg)) if msg.contains("department")
        ));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let mut f = form();
        f.role = "hr".into();
        assert!(matches!(
            validate_signup(&f),
            Err(ApiError::Validation(msg)) if msg.contains("role")
        ));
    }

    #[test]
    fn empty_username_is_rejected() {
        let mut f = form();
        f.username = "  ".into();
        assert!(matches!(validate_signup(&f), Err(ApiError::Validation(_))));
    }
}

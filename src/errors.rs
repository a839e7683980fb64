use actix_web::{HttpResponse, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Request-level failure taxonomy. Every handler funnels into one of these so
/// the response always carries a machine-readable kind plus a message.
///
/// A leave request that cannot be satisfied is NOT an error; that outcome is
/// the `Rejected` arm of `leave::LeaveDecision`.
#[derive(Debug, Display)]
pub enum ApiError {
    /// Malformed, missing, or contradictory input. User-fixable, no retry.
    #[display(fmt = "{}", _0)]
    Validation(String),
    /// Referenced account or entry does not exist.
    #[display(fmt = "{}", _0)]
    NotFound(String),
    /// A unique field (username, email) is already taken.
    #[display(fmt = "{}", _0)]
    Conflict(String),
    /// Missing or invalid credentials/token.
    #[display(fmt = "{}", _0)]
    Authentication(String),
    /// Underlying query failure. Cause is logged, never sent to the client.
    #[display(fmt = "Database error")]
    Store(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Authentication(_) => "authentication",
            ApiError::Store(_) => "store",
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Store(e.to_string())
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Store(cause) = self {
            tracing::error!(error = %cause, "Store failure");
        }

        HttpResponse::build(self.status_code()).json(json!({
            "kind": self.kind(),
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Authentication("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Store("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_message_does_not_leak_cause() {
        let err = ApiError::Store("connection refused at 10.0.0.3".into());
        assert_eq!(err.to_string(), "Database error");
    }
}

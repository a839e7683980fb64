use crate::model::{department::Department, role::Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SignupForm {
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "jdoe@college.edu", format = "email")]
    pub email: String,
    /// One of AIML, DS, IT, CSE, MECHANICAL
    #[schema(example = "CSE")]
    pub department: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
    /// One of faculty, admin
    #[schema(example = "faculty")]
    pub role: String,
    #[schema(example = 52000)]
    pub salary: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    /// Username or email address
    #[schema(example = "jdoe")]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub account_id: u64,
    /// Email address of the authenticated account
    pub sub: String,
    pub role: Role,
    pub department: Department,
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}

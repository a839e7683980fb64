use crate::model::{department::Department, role::Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub department: Department,
    pub role: Role,
    /// Argon2 PHC string, never the plaintext
    pub password: String,
    pub salary: u64,
    pub max_leaves: u32,
    pub total_leaves: u32,
}

//! User Model (用户/员工账户)

use serde::{Deserialize, Serialize};
use validator::Validate;

/// User row (internal; carries the password hash, never serialized)
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    /// "manager" | "staff" | "customer"
    pub role: String,
    pub full_name: String,
    pub created_at: i64,
}

/// User response (without password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserPublic {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub full_name: String,
    pub created_at: i64,
}

impl From<User> for UserPublic {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            full_name: u.full_name,
            created_at: u.created_at,
        }
    }
}

/// Create employee payload (always created with the staff role)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmployeeCreate {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(max = 100))]
    pub full_name: String,
}

/// Update employee payload
///
/// `password = None` (or empty) keeps the existing hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

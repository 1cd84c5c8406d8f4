//! User Repository (员工账户管理)

use super::{RepoError, RepoResult};
use crate::utils::password;
use shared::models::{EmployeeCreate, EmployeeUpdate, User, UserPublic};
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, role, full_name, created_at FROM user WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, role, full_name, created_at FROM user WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// All staff accounts (manager's employee tab)
pub async fn find_all_staff(pool: &SqlitePool) -> RepoResult<Vec<UserPublic>> {
    let rows = sqlx::query_as::<_, UserPublic>(
        "SELECT id, username, role, full_name, created_at FROM user WHERE role = 'staff' ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Create a staff account; duplicate usernames are rejected with the
/// original state unchanged
pub async fn create_staff(pool: &SqlitePool, data: EmployeeCreate) -> RepoResult<UserPublic> {
    let username = data.username.trim().to_string();
    if username.is_empty() {
        return Err(RepoError::Validation("Username must not be empty".into()));
    }
    let hash = password::hash_password(&data.password)
        .map_err(|e| RepoError::Validation(e.to_string()))?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO user (id, username, password_hash, role, full_name, created_at) VALUES (?1, ?2, ?3, 'staff', ?4, ?5)",
    )
    .bind(id)
    .bind(&username)
    .bind(&hash)
    .bind(&data.full_name)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Username {username} already exists"))
        }
        other => other,
    })?;
    Ok(UserPublic {
        id,
        username,
        role: "staff".to_string(),
        full_name: data.full_name,
        created_at: now,
    })
}

/// Update a staff account; an empty or missing password keeps the old hash
pub async fn update_staff(
    pool: &SqlitePool,
    id: i64,
    data: EmployeeUpdate,
) -> RepoResult<UserPublic> {
    let new_hash = match data.password.as_deref() {
        Some(pwd) if !pwd.trim().is_empty() => Some(
            password::hash_password(pwd).map_err(|e| RepoError::Validation(e.to_string()))?,
        ),
        _ => None,
    };
    let rows = sqlx::query(
        "UPDATE user SET username = COALESCE(?1, username), full_name = COALESCE(?2, full_name), password_hash = COALESCE(?3, password_hash) WHERE id = ?4 AND role = 'staff'",
    )
    .bind(&data.username)
    .bind(&data.full_name)
    .bind(&new_hash)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate("Username already exists".to_string()),
        other => other,
    })?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    let user = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))?;
    Ok(user.into())
}

pub async fn delete_staff(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM user WHERE id = ? AND role = 'staff'")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

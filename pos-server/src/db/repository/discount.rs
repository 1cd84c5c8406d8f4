//! Discount Code Repository

use super::{RepoError, RepoResult};
use shared::models::{DiscountCode, DiscountCodeCreate, DiscountCodeUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiscountCode>> {
    let rows = sqlx::query_as::<_, DiscountCode>(
        "SELECT id, code, percentage, is_active FROM discount_code ORDER BY code",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Active-code lookup. The caller normalizes (trim + upper-case); codes are
/// stored upper-cased, which is what makes matching case-insensitive.
pub async fn find_active_by_code(
    pool: &SqlitePool,
    code: &str,
) -> RepoResult<Option<DiscountCode>> {
    let row = sqlx::query_as::<_, DiscountCode>(
        "SELECT id, code, percentage, is_active FROM discount_code WHERE code = ? AND is_active = 1",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: DiscountCodeCreate) -> RepoResult<DiscountCode> {
    let code = data.code.trim().to_uppercase();
    if code.is_empty() {
        return Err(RepoError::Validation("Discount code must not be empty".into()));
    }
    if !(0.0..=100.0).contains(&data.percentage) {
        return Err(RepoError::Validation(
            "Discount percentage must be between 0 and 100".into(),
        ));
    }
    let id = shared::util::snowflake_id();
    // UNIQUE(code) turns a duplicate into RepoError::Duplicate
    sqlx::query("INSERT INTO discount_code (id, code, percentage, is_active) VALUES (?1, ?2, ?3, 1)")
        .bind(id)
        .bind(&code)
        .bind(data.percentage)
        .execute(pool)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => {
                RepoError::Duplicate(format!("Discount code {code} already exists"))
            }
            other => other,
        })?;
    Ok(DiscountCode {
        id,
        code,
        percentage: data.percentage,
        is_active: true,
    })
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: DiscountCodeUpdate,
) -> RepoResult<DiscountCode> {
    if let Some(pct) = data.percentage
        && !(0.0..=100.0).contains(&pct)
    {
        return Err(RepoError::Validation(
            "Discount percentage must be between 0 and 100".into(),
        ));
    }
    let rows = sqlx::query(
        "UPDATE discount_code SET percentage = COALESCE(?1, percentage), is_active = COALESCE(?2, is_active) WHERE id = ?3",
    )
    .bind(data.percentage)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Discount code {id} not found")));
    }
    let row = sqlx::query_as::<_, DiscountCode>(
        "SELECT id, code, percentage, is_active FROM discount_code WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::NotFound(format!("Discount code {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM discount_code WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

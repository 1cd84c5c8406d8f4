//! Default data seeding (默认账户与示例菜单)
//!
//! Mirrors first-run provisioning: a manager account always exists, sample
//! staff/customer accounts are created once, and an empty catalog gets one
//! starter product so the menu is never blank on a fresh install.

use sqlx::SqlitePool;

use crate::utils::AppError;
use crate::utils::password::hash_password;

const DEFAULT_PASSWORD: &str = "123";

/// Ensure the default accounts and a starter menu exist. Idempotent.
pub async fn ensure_defaults(pool: &SqlitePool) -> Result<(), AppError> {
    ensure_account(pool, "admin", "manager", "Café Owner").await?;
    ensure_account(pool, "staff", "staff", "Sample Barista").await?;
    ensure_account(pool, "guest", "customer", "Walk-in Guest").await?;

    let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    if products == 0 {
        let now = shared::util::now_millis();
        let id = shared::util::snowflake_id();
        sqlx::query(
            "INSERT INTO product (id, name, price, image, category, is_active, created_at, updated_at) VALUES (?1, 'House Black', 25000, '/static/img/house_black.jpg', 'Coffee', 1, ?2, ?2)",
        )
        .bind(id)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
        sqlx::query("INSERT INTO inventory (id, product_id, stock_quantity) VALUES (?1, ?2, 50)")
            .bind(shared::util::snowflake_id())
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        tracing::info!("Seeded starter menu");
    }

    Ok(())
}

async fn ensure_account(
    pool: &SqlitePool,
    username: &str,
    role: &str,
    full_name: &str,
) -> Result<(), AppError> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM user WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    if existing.is_some() {
        return Ok(());
    }
    let hash = hash_password(DEFAULT_PASSWORD)?;
    sqlx::query(
        "INSERT INTO user (id, username, password_hash, role, full_name, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(shared::util::snowflake_id())
    .bind(username)
    .bind(&hash)
    .bind(role)
    .bind(full_name)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await
    .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!(username, role, "Seeded default account");
    Ok(())
}

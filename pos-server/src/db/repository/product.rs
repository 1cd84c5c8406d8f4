//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate, ProductWithStock};
use sqlx::SqlitePool;

const PRODUCT_WITH_STOCK_SELECT: &str = "SELECT p.id, p.name, p.price, p.image, p.category, p.is_active, i.stock_quantity FROM product p JOIN inventory i ON i.product_id = p.id";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ProductWithStock>> {
    let sql = format!("{} ORDER BY p.category, p.name", PRODUCT_WITH_STOCK_SELECT);
    let rows = sqlx::query_as::<_, ProductWithStock>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Customer menu: active products with stock on hand
pub async fn find_menu(pool: &SqlitePool) -> RepoResult<Vec<ProductWithStock>> {
    let sql = format!(
        "{} WHERE p.is_active = 1 AND i.stock_quantity > 0 ORDER BY p.category, p.name",
        PRODUCT_WITH_STOCK_SELECT
    );
    let rows = sqlx::query_as::<_, ProductWithStock>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProductWithStock>> {
    let sql = format!("{} WHERE p.id = ?", PRODUCT_WITH_STOCK_SELECT);
    let row = sqlx::query_as::<_, ProductWithStock>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<ProductWithStock> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let stock = data.stock.unwrap_or(100).max(0);

    // Product and its inventory row share one lifecycle: create together
    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO product (id, name, price, image, category, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.price)
    .bind(data.image.unwrap_or_default())
    .bind(&data.category)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .execute(&mut *tx)
    .await?;
    sqlx::query("INSERT INTO inventory (id, product_id, stock_quantity) VALUES (?1, ?2, ?3)")
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(stock)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<ProductWithStock> {
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;
    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), price = COALESCE(?2, price), image = COALESCE(?3, image), category = COALESCE(?4, category), is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.image)
    .bind(&data.category)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    if let Some(stock) = data.stock {
        sqlx::query("UPDATE inventory SET stock_quantity = ?1 WHERE product_id = ?2")
            .bind(stock.max(0))
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Hard delete; the inventory row goes with it (ON DELETE CASCADE)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Plain product row (no stock join)
pub async fn find_row_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, Product>(
        "SELECT id, name, price, image, category, is_active, created_at, updated_at FROM product WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

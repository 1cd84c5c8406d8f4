//! OrderCoordinator test suite
//!
//! Each test runs against a fresh migrated SQLite file in a temp dir.

use super::*;
use crate::db::DbService;
use crate::message::MessageBus;
use shared::order::OperatorContext;
use sqlx::SqlitePool;
use std::sync::Arc;

mod test_boundary;
mod test_core;
mod test_flows;

/// Fresh coordinator over a scratch database
///
/// The TempDir must stay alive for the duration of the test. The operator
/// accounts behind [`customer_ctx`]/[`staff_ctx`] are pre-seeded (orders
/// carry foreign keys to user rows).
pub async fn create_test_coordinator() -> (OrderCoordinator, Arc<MessageBus>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db_path = dir.path().join("pos-test.db");
    let db = DbService::new(db_path.to_str().unwrap())
        .await
        .expect("open test database");
    seed_user(&db.pool, 1001, "guest", "customer", "Test Customer").await;
    seed_user(&db.pool, 2001, "barista", "staff", "Test Barista").await;
    let bus = Arc::new(MessageBus::new());
    let coordinator = OrderCoordinator::new(db.pool, bus.clone(), chrono_tz::UTC);
    (coordinator, bus, dir)
}

pub async fn seed_user(pool: &SqlitePool, id: i64, username: &str, role: &str, full_name: &str) {
    sqlx::query(
        "INSERT INTO user (id, username, password_hash, role, full_name, created_at) VALUES (?1, ?2, 'test-hash', ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(username)
    .bind(role)
    .bind(full_name)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await
    .unwrap();
}

pub fn customer_ctx() -> OperatorContext {
    OperatorContext::new(1001, "Test Customer", "session-customer")
}

pub fn staff_ctx() -> OperatorContext {
    OperatorContext::new(2001, "Test Barista", "session-staff")
}

pub async fn seed_product(
    pool: &SqlitePool,
    name: &str,
    price: f64,
    stock: i64,
    active: bool,
) -> i64 {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO product (id, name, price, image, category, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, '', 'Coffee', ?4, ?5, ?5)",
    )
    .bind(id)
    .bind(name)
    .bind(price)
    .bind(active)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO inventory (id, product_id, stock_quantity) VALUES (?1, ?2, ?3)")
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(stock)
        .execute(pool)
        .await
        .unwrap();
    id
}

pub async fn seed_discount(pool: &SqlitePool, code: &str, percentage: f64, active: bool) {
    sqlx::query("INSERT INTO discount_code (id, code, percentage, is_active) VALUES (?1, ?2, ?3, ?4)")
        .bind(shared::util::snowflake_id())
        .bind(code)
        .bind(percentage)
        .bind(active)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn stock_of(pool: &SqlitePool, product_id: i64) -> i64 {
    sqlx::query_scalar("SELECT stock_quantity FROM inventory WHERE product_id = ?")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_rows(pool: &SqlitePool, table: &str, order_id: i64) -> i64 {
    let sql = match table {
        "order_line" => "SELECT COUNT(*) FROM order_line WHERE order_id = ?",
        "bill" => "SELECT COUNT(*) FROM bill WHERE order_id = ?",
        "payment" => {
            "SELECT COUNT(*) FROM payment WHERE bill_id IN (SELECT id FROM bill WHERE order_id = ?)"
        }
        _ => panic!("unexpected table {table}"),
    };
    sqlx::query_scalar(sql)
        .bind(order_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn cart_line(product_id: i64, qty: i64) -> shared::order::CartLineInput {
    shared::order::CartLineInput {
        product_id,
        quantity: qty,
        customization: None,
    }
}

/// f64 money comparison without bitwise equality traps
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

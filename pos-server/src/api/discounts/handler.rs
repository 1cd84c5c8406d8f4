//! Discount Code API Handlers
//!
//! Codes are stored upper-cased; duplicates are rejected with 409 and the
//! registry left unchanged. Validation of a code against an order happens
//! on the event channel (`check_discount_code`), not here.

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::discount;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};
use shared::models::{DiscountCode, DiscountCodeCreate, DiscountCodeUpdate};

const RESOURCE_DISCOUNT: &str = "discount";

/// GET /api/discounts - 所有折扣码
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiscountCode>>> {
    let discounts = discount::find_all(&state.pool).await?;
    Ok(Json(discounts))
}

/// POST /api/discounts - 新建折扣码
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<DiscountCodeCreate>,
) -> AppResult<Json<DiscountCode>> {
    data.validate()?;
    let created = discount::create(&state.pool, data).await?;
    state
        .broadcast_sync(RESOURCE_DISCOUNT, "created", &created.id.to_string(), Some(&created))
        .await;
    Ok(Json(created))
}

/// PUT /api/discounts/{id} - 更新折扣码 (启停/调整比例)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<DiscountCodeUpdate>,
) -> AppResult<Json<DiscountCode>> {
    let updated = discount::update(&state.pool, id, data).await?;
    state
        .broadcast_sync(RESOURCE_DISCOUNT, "updated", &id.to_string(), Some(&updated))
        .await;
    Ok(Json(updated))
}

/// DELETE /api/discounts/{id} - 删除折扣码
///
/// 已下单的折扣快照不受影响 (快照在订单上，不回溯)。
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    let deleted = discount::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Discount code {}", id)));
    }
    state
        .broadcast_sync::<()>(RESOURCE_DISCOUNT, "deleted", &id.to_string(), None)
        .await;
    Ok(ok_with_message((), "Discount code deleted"))
}

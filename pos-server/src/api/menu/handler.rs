//! Menu API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::product;
use crate::utils::AppResult;
use shared::models::ProductWithStock;

/// GET /api/menu - 在售且有库存的商品 (顾客下单页)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductWithStock>>> {
    let products = product::find_menu(&state.pool).await?;
    Ok(Json(products))
}

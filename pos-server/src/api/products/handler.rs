//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::product;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};
use shared::models::{ProductCreate, ProductUpdate, ProductWithStock};

const RESOURCE_PRODUCT: &str = "product";

/// GET /api/products - 获取所有商品 (含库存)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductWithStock>>> {
    let products = product::find_all(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/{id} - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductWithStock>> {
    let product = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {}", id)))?;
    Ok(Json(product))
}

/// POST /api/products - 新建商品 (连带库存记录)
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<ProductCreate>,
) -> AppResult<Json<ProductWithStock>> {
    data.validate()?;
    let created = product::create(&state.pool, data).await?;
    state
        .broadcast_sync(RESOURCE_PRODUCT, "created", &created.id.to_string(), Some(&created))
        .await;
    Ok(Json(created))
}

/// PUT /api/products/{id} - 更新商品 (可选更新库存)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<ProductUpdate>,
) -> AppResult<Json<ProductWithStock>> {
    data.validate()?;
    let updated = product::update(&state.pool, id, data).await?;
    state
        .broadcast_sync(RESOURCE_PRODUCT, "updated", &id.to_string(), Some(&updated))
        .await;
    Ok(Json(updated))
}

/// DELETE /api/products/{id} - 删除商品 (库存随之删除)
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    let deleted = product::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Product {}", id)));
    }
    state
        .broadcast_sync::<()>(RESOURCE_PRODUCT, "deleted", &id.to_string(), None)
        .await;
    Ok(ok_with_message((), "Product deleted"))
}

//! Order read API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::order::{self, OpenOrderSummary, OrderDetail};
use crate::utils::{AppError, AppResult};

/// GET /api/orders/open - 未完成订单，最新在前 (员工看板)
pub async fn list_open(State(state): State<ServerState>) -> AppResult<Json<Vec<OpenOrderSummary>>> {
    let orders = order::find_open(&state.pool).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - 订单明细 (行项目 + 账单 + 支付)
pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = order::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {}", id)))?;
    Ok(Json(detail))
}

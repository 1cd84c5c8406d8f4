//! Health API 模块 (健康检查)

use axum::{Json, Router, extract::State, routing::get};
use serde_json::json;

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health - 服务健康状态
async fn health(State(state): State<ServerState>) -> AppResult<Json<serde_json::Value>> {
    // A cheap liveness probe against the pool
    let db_ok = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .is_ok();

    Ok(Json(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": shared::util::now_millis(),
        "sessions": state.bus.connected_sessions().len(),
    })))
}

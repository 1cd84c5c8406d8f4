//! Reports API 模块 (营收报表)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/revenue", get(handler::revenue_range))
        .route("/revenue/summary", get(handler::revenue_summary))
}

//! Orders API 模块 (订单读取)
//!
//! 写路径 (下单/出单/收款) 全部走事件通道；这里只有读取端点。
//! 断线重连的会话用这些端点重新拉取状态，而不是事件回放。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/open", get(handler::list_open))
        .route("/{id}", get(handler::get_detail))
}

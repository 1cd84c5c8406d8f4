//! Revenue Report Handlers
//!
//! Revenue comes from billed amounts over an explicit `[from, to)` millis
//! range; the summary endpoint derives its day/week/month windows from the
//! business timezone instead of matching date strings.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::{AppError, AppResult};
use crate::utils::time;

#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    /// Range start, Unix millis (inclusive)
    pub from: i64,
    /// Range end, Unix millis (exclusive)
    pub to: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueRange {
    pub from: i64,
    pub to: i64,
    pub revenue: f64,
    pub bills: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueSummary {
    pub day: f64,
    pub week: f64,
    pub month: f64,
}

/// GET /api/reports/revenue?from=&to= - 指定区间营收
pub async fn revenue_range(
    State(state): State<ServerState>,
    Query(query): Query<RevenueQuery>,
) -> AppResult<Json<RevenueRange>> {
    if query.from >= query.to {
        return Err(AppError::Validation(
            "'from' must be earlier than 'to'".to_string(),
        ));
    }
    let revenue = order::revenue_between(&state.pool, query.from, query.to).await?;
    let bills = order::bill_count_between(&state.pool, query.from, query.to).await?;
    Ok(Json(RevenueRange {
        from: query.from,
        to: query.to,
        revenue,
        bills,
    }))
}

/// GET /api/reports/revenue/summary - 今日/本周/本月营收
pub async fn revenue_summary(
    State(state): State<ServerState>,
) -> AppResult<Json<RevenueSummary>> {
    let tz = state.config.tz();
    let (day_start, day_end) = time::today_window(tz);
    let (week_start, week_end) = time::week_window(tz);
    let (month_start, month_end) = time::month_window(tz);

    Ok(Json(RevenueSummary {
        day: order::revenue_between(&state.pool, day_start, day_end).await?,
        week: order::revenue_between(&state.pool, week_start, week_end).await?,
        month: order::revenue_between(&state.pool, month_start, month_end).await?,
    }))
}

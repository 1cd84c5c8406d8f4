//! Employee API Handlers
//!
//! Duplicate usernames surface as 409 Conflict with the original state
//! unchanged; an empty password on update keeps the existing hash.

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};
use shared::models::{EmployeeCreate, EmployeeUpdate, UserPublic};

const RESOURCE_EMPLOYEE: &str = "employee";

/// GET /api/employees - 所有员工账户
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserPublic>>> {
    let employees = user::find_all_staff(&state.pool).await?;
    Ok(Json(employees))
}

/// POST /api/employees - 新建员工账户
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<EmployeeCreate>,
) -> AppResult<Json<UserPublic>> {
    data.validate()?;
    let created = user::create_staff(&state.pool, data).await?;
    state
        .broadcast_sync(RESOURCE_EMPLOYEE, "created", &created.id.to_string(), Some(&created))
        .await;
    Ok(Json(created))
}

/// PUT /api/employees/{id} - 更新员工账户
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<EmployeeUpdate>,
) -> AppResult<Json<UserPublic>> {
    let updated = user::update_staff(&state.pool, id, data).await?;
    state
        .broadcast_sync(RESOURCE_EMPLOYEE, "updated", &id.to_string(), Some(&updated))
        .await;
    Ok(Json(updated))
}

/// DELETE /api/employees/{id} - 删除员工账户
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    let deleted = user::delete_staff(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Employee {}", id)));
    }
    state
        .broadcast_sync::<()>(RESOURCE_EMPLOYEE, "deleted", &id.to_string(), None)
        .await;
    Ok(ok_with_message((), "Employee deleted"))
}

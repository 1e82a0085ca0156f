use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use service::auth::{Caller, RoleGate};
use service::stats::DashboardStats;
use service::users::domain::{NewUser, User, UserPatch, UserSummary};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/admin/stats", tag = "admin", security(("bearer" = [])), responses((status = 200, description = "OK", body = crate::openapi::DashboardStatsDoc), (status = 403, description = "Forbidden")))]
pub async fn stats(State(state): State<ServerState>, Extension(caller): Extension<Caller>) -> Result<Json<DashboardStats>, ApiError> {
    RoleGate::Admin.check(&caller)?;
    Ok(Json(state.dashboard.stats().await?))
}

#[utoipa::path(get, path = "/api/admin/users", tag = "admin", security(("bearer" = [])), responses((status = 200, description = "OK", body = [crate::openapi::UserSummaryDoc])))]
pub async fn list_users(State(state): State<ServerState>, Extension(caller): Extension<Caller>) -> Result<Json<Vec<UserSummary>>, ApiError> {
    RoleGate::Admin.check(&caller)?;
    Ok(Json(state.users.list().await?))
}

#[utoipa::path(post, path = "/api/admin/users", tag = "admin", security(("bearer" = [])), request_body = crate::openapi::NewUserDoc, responses((status = 201, description = "Created", body = crate::openapi::UserDoc), (status = 409, description = "Conflict"), (status = 422, description = "Validation failed")))]
pub async fn create_user(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    JsonBody(input): JsonBody<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    RoleGate::Admin.check(&caller)?;
    let user = state.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(get, path = "/api/admin/users/{id}", tag = "admin", security(("bearer" = [])), params(("id" = Uuid, Path,)), responses((status = 200, description = "OK", body = crate::openapi::UserDoc), (status = 404, description = "Not Found")))]
pub async fn get_user(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    RoleGate::Admin.check(&caller)?;
    Ok(Json(state.users.get(id).await?))
}

#[utoipa::path(put, path = "/api/admin/users/{id}", tag = "admin", security(("bearer" = [])), params(("id" = Uuid, Path,)), request_body = crate::openapi::UserPatchDoc, responses((status = 200, description = "OK", body = crate::openapi::UserDoc), (status = 400, description = "Last administrator"), (status = 404, description = "Not Found"), (status = 409, description = "Conflict")))]
pub async fn update_user(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    JsonBody(patch): JsonBody<UserPatch>,
) -> Result<Json<User>, ApiError> {
    RoleGate::Admin.check(&caller)?;
    Ok(Json(state.users.update(id, patch).await?))
}

#[utoipa::path(delete, path = "/api/admin/users/{id}", tag = "admin", security(("bearer" = [])), params(("id" = Uuid, Path,)), responses((status = 204, description = "Deleted"), (status = 400, description = "Last administrator"), (status = 404, description = "Not Found")))]
pub async fn delete_user(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    RoleGate::Admin.check(&caller)?;
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use service::auth::{Caller, RoleGate};
use service::leave_slips::domain::{LeaveSlip, LeaveSlipPatch, NewLeaveSlip, PrefillLookup};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/hr/slips", tag = "hr", security(("bearer" = [])), responses((status = 200, description = "OK", body = [crate::openapi::LeaveSlipDoc])))]
pub async fn list(State(state): State<ServerState>, Extension(caller): Extension<Caller>) -> Result<Json<Vec<LeaveSlip>>, ApiError> {
    RoleGate::AnyStaff.check(&caller)?;
    Ok(Json(state.slips.list().await?))
}

#[utoipa::path(post, path = "/api/hr/slips", tag = "hr", security(("bearer" = [])), request_body = crate::openapi::NewLeaveSlipDoc, responses((status = 201, description = "Created", body = crate::openapi::LeaveSlipDoc), (status = 409, description = "Employee code taken"), (status = 422, description = "Validation failed")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    JsonBody(input): JsonBody<NewLeaveSlip>,
) -> Result<(StatusCode, Json<LeaveSlip>), ApiError> {
    RoleGate::Hr.check(&caller)?;
    let slip = state.slips.create(input).await?;
    Ok((StatusCode::CREATED, Json(slip)))
}

#[utoipa::path(get, path = "/api/hr/slips/{id}", tag = "hr", security(("bearer" = [])), params(("id" = Uuid, Path,)), responses((status = 200, description = "OK", body = crate::openapi::LeaveSlipDoc), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<LeaveSlip>, ApiError> {
    RoleGate::AnyStaff.check(&caller)?;
    Ok(Json(state.slips.get(id).await?))
}

#[utoipa::path(put, path = "/api/hr/slips/{id}", tag = "hr", security(("bearer" = [])), params(("id" = Uuid, Path,)), request_body = crate::openapi::LeaveSlipPatchDoc, responses((status = 200, description = "OK", body = crate::openapi::LeaveSlipDoc), (status = 404, description = "Not Found"), (status = 409, description = "Employee code taken")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    JsonBody(patch): JsonBody<LeaveSlipPatch>,
) -> Result<Json<LeaveSlip>, ApiError> {
    RoleGate::Hr.check(&caller)?;
    Ok(Json(state.slips.update(id, patch).await?))
}

#[utoipa::path(delete, path = "/api/hr/slips/{id}", tag = "hr", security(("bearer" = [])), params(("id" = Uuid, Path,)), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    RoleGate::Hr.check(&caller)?;
    state.slips.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Prefill data from the employee's latest slip.
#[utoipa::path(get, path = "/api/hr/employees/{national_id}", tag = "hr", security(("bearer" = [])), params(("national_id" = String, Path,)), responses((status = 200, description = "Lookup result; check `found`", body = crate::openapi::PrefillLookupDoc)))]
pub async fn prefill(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    Path(national_id): Path<String>,
) -> Result<Json<PrefillLookup>, ApiError> {
    RoleGate::Hr.check(&caller)?;
    Ok(Json(state.slips.find_latest_by_national_id(&national_id).await?))
}

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Json,
};
use sea_orm::DatabaseConnection;
use service::auth::domain::{LoginInput, LoginOutcome};
use service::auth::{AuthService, CredentialResolver};
use service::clock::Clock;
use service::leave_slips::repo::seaorm::SeaOrmLeaveSlipRepository;
use service::leave_slips::repository::LeaveSlipRepository;
use service::leave_slips::LeaveSlipService;
use service::stats::DashboardService;
use service::users::repo::seaorm::SeaOrmUserRepository;
use service::users::repository::UserRepository;
use service::users::UserService;

use crate::errors::ApiError;
use crate::extract::JsonBody;

/// Services shared by all handlers. Repositories are trait objects so tests can
/// swap in the in-memory implementations.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn UserRepository>>,
    pub users: Arc<UserService<dyn UserRepository>>,
    pub slips: Arc<LeaveSlipService<dyn LeaveSlipRepository>>,
    pub dashboard: Arc<DashboardService<dyn UserRepository, dyn LeaveSlipRepository>>,
}

impl ServerState {
    pub fn new(users: Arc<dyn UserRepository>, slips: Arc<dyn LeaveSlipRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users.clone())),
            users: Arc::new(UserService::new(users.clone())),
            slips: Arc::new(LeaveSlipService::new(slips.clone(), clock)),
            dashboard: Arc::new(DashboardService::new(users, slips)),
        }
    }

    pub fn with_db(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository { db: db.clone() });
        let slips: Arc<dyn LeaveSlipRepository> = Arc::new(SeaOrmLeaveSlipRepository { db });
        Self::new(users, slips, clock)
    }
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Login attempt result; check `success`", body = crate::openapi::LoginResponse)))]
pub async fn login(State(state): State<ServerState>, JsonBody(input): JsonBody<LoginInput>) -> Result<Json<LoginOutcome>, ApiError> {
    Ok(Json(state.auth.login(input).await?))
}

fn bearer(req: &Request) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Resolve `Authorization: Bearer <username>:<national_id>` and attach the
/// [`service::auth::Caller`] to the request. Role checks happen in handlers.
pub async fn authenticate(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let Some(token) = bearer(&req) else {
        tracing::warn!(path = %req.uri().path(), "missing or malformed Authorization header");
        return Err(ApiError::unauthenticated("missing bearer credential"));
    };
    let caller = state.auth.resolve(&token).await?;
    tracing::debug!(username = %caller.username, role = %caller.role, "caller resolved");
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

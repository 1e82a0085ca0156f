use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{http::HeaderValue, Router};
use dotenvy::dotenv;
use migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use configs::{AppConfig, BootstrapConfig, CorsConfig};
use models::user::Role;
use service::clock::DefaultClock;
use service::users::domain::NewUser;

use crate::routes::{self, ServerState};

/// CORS from the configured origins; an empty list is permissive.
pub fn build_cors(cfg: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }
    CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
}

/// Create the configured administrator when none exists.
pub async fn bootstrap_admin(state: &ServerState, cfg: &BootstrapConfig) -> anyhow::Result<()> {
    if !cfg.enabled {
        return Ok(());
    }
    let admin = NewUser {
        full_name: cfg.full_name.clone(),
        username: cfg.username.clone(),
        national_id: cfg.national_id.clone(),
        role: Role::Admin,
    };
    if let Some(user) = state.users.ensure_default_admin(admin).await? {
        warn!(username = %user.username, "default administrator created; change its credentials");
    }
    Ok(())
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_and_validate()?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("database migrated");

    let state = ServerState::with_db(db, Arc::new(DefaultClock));
    bootstrap_admin(&state, &cfg.bootstrap).await?;

    let app = routes::build_router(state, build_cors(&cfg.cors));

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting server crate");
    let listener = TcpListener::bind(addr).await?;
    serve(listener, app, shutdown_signal()).await
}

/// Serve `app` until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix. In-flight requests are drained
/// before `run` returns.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use service::leave_slips::repository::mock::MockLeaveSlipRepository;
    use service::users::repository::mock::MockUserRepository;

    use super::*;

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let state = ServerState::new(
            Arc::new(MockUserRepository::default()),
            Arc::new(MockLeaveSlipRepository::default()),
            Arc::new(DefaultClock),
        );
        let cfg = BootstrapConfig::default();
        bootstrap_admin(&state, &cfg).await.unwrap();
        bootstrap_admin(&state, &cfg).await.unwrap();
        let users = state.users.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Admin);
        assert_eq!(users[0].username, "admin");
    }

    #[tokio::test]
    async fn disabled_bootstrap_creates_nothing() {
        let state = ServerState::new(
            Arc::new(MockUserRepository::default()),
            Arc::new(MockLeaveSlipRepository::default()),
            Arc::new(DefaultClock),
        );
        let cfg = BootstrapConfig { enabled: false, ..BootstrapConfig::default() };
        bootstrap_admin(&state, &cfg).await.unwrap();
        assert!(state.users.list().await.unwrap().is_empty());
    }
}

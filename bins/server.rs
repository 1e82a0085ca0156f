use std::process::ExitCode;

use tracing::{error, info};
use uuid::Uuid;

fn worker_threads() -> Option<usize> {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg.server.worker_threads,
        Err(_) => std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse().ok()),
    }
}

fn main() -> ExitCode {
    // .env before the subscriber so RUST_LOG and LOG_FORMAT apply
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let instance = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |info| {
        error!(%instance, message = %info, "panic");
    }));

    let threads = worker_threads();
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = threads {
        builder.worker_threads(n);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "cannot build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(%instance, version = env!("CARGO_PKG_VERSION"), ?threads, "papeletas starting");
    // run() owns shutdown: it drains on Ctrl+C / SIGTERM and then returns
    match rt.block_on(server::run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(%instance, error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

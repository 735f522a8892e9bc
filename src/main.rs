//! `taskledger` server: task tracking over HTTP with an activity audit trail.
//!
//! # Usage
//!
//! ```bash
//! # In-memory storage on the default address 0.0.0.0:5000
//! taskledger
//!
//! # PostgreSQL storage on a custom address
//! taskledger --bind 127.0.0.1:8080 --database-url postgres://localhost/tasks
//! ```

use clap::Parser;
use mockable::DefaultClock;
use std::process::ExitCode;
use std::sync::Arc;
use taskledger::activity::ports::ActivityLogRepository;
use taskledger::activity::services::ActivityRecorder;
use taskledger::config::{ServerCliArgs, ServerConfig};
use taskledger::http;
use taskledger::storage::Storage;
use taskledger::task::ports::TaskRepository;
use taskledger::task::services::TaskStoreService;
use taskledger::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = ServerCliArgs::parse();
    let config = match ServerConfig::load(&cli) {
        Ok(config) => config,
        Err(err) => return report_startup_failure(&err),
    };
    if let Err(err) = telemetry::init(&config.log_level) {
        return report_startup_failure(&err);
    }

    let storage = match Storage::open(config.database.as_ref()).await {
        Ok(storage) => storage,
        Err(err) => {
            tracing::error!(error = %err, "failed to open storage");
            return ExitCode::FAILURE;
        }
    };

    match storage {
        Storage::InMemory { tasks, activity } => serve(&config, tasks, activity).await,
        Storage::Postgres { tasks, activity } => serve(&config, tasks, activity).await,
    }
}

async fn serve<R, L>(config: &ServerConfig, tasks: Arc<R>, activity: Arc<L>) -> ExitCode
where
    R: TaskRepository + 'static,
    L: ActivityLogRepository + 'static,
{
    let clock = Arc::new(DefaultClock);
    let recorder = ActivityRecorder::new(activity, Arc::clone(&clock));
    let store = Arc::new(TaskStoreService::new(tasks, recorder, clock));
    let app = http::router(store, &config.cors_allowed_origins);

    match http::start_server(&config.bind_addr, app, shutdown_signal()).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "taskledger listening");
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "http server task failed");
                return ExitCode::FAILURE;
            }
            tracing::info!("taskledger stopped");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to start http server");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is not installed yet when startup configuration fails"
)]
fn report_startup_failure(err: &dyn std::error::Error) -> ExitCode {
    eprintln!("taskledger: {err}");
    ExitCode::FAILURE
}

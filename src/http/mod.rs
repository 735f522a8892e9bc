//! HTTP adapter exposing the task store and activity history over JSON.
//!
//! Every response uses the [`envelope::Envelope`] shape. Validation
//! failures map to 400, unknown tasks and routes to 404, and storage
//! failures to 500 with a generic message.

pub mod envelope;
pub mod error;
pub mod handlers;

use crate::activity::ports::ActivityLogRepository;
use crate::task::ports::TaskRepository;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use handlers::SharedTaskStore;
use mockable::Clock;
use std::future::Future;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Errors raised while starting the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The bound address could not be read back.
    #[error("failed to read bound address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// Builds the application router.
///
/// `allowed_origins` enables CORS for the listed origins; an empty slice
/// leaves CORS disabled.
#[must_use]
pub fn router<R, L, C>(store: SharedTaskStore<R, L, C>, allowed_origins: &[String]) -> Router
where
    R: TaskRepository + 'static,
    L: ActivityLogRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/tasks",
            get(handlers::list_tasks::<R, L, C>).post(handlers::create_task::<R, L, C>),
        )
        .route(
            "/tasks/{id}",
            get(handlers::get_task::<R, L, C>)
                .put(handlers::update_task::<R, L, C>)
                .delete(handlers::delete_task::<R, L, C>),
        )
        .route("/tasks/{id}/logs", get(handlers::list_task_logs::<R, L, C>))
        .fallback(handlers::route_not_found)
        .with_state(store)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(allowed_origins) {
        app = app.layer(cors);
    }
    app
}

fn cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(%origin, error = %err, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }
    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

/// Binds `addr` and serves `app` on a background task until `shutdown`
/// resolves.
///
/// Returns the bound address, which differs from `addr` when port 0 was
/// requested.
///
/// # Errors
///
/// Returns [`ServerError`] when the listener cannot be bound.
pub async fn start_server<F>(
    addr: &str,
    app: Router,
    shutdown: F,
) -> Result<(SocketAddr, JoinHandle<()>), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_owned(),
            source,
        })?;
    let bound_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let handle = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            tracing::error!(error = %err, "http server error");
        }
    });

    Ok((bound_addr, handle))
}

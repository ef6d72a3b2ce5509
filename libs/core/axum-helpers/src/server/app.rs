use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::security::security_headers;
use axum::{Json, Router, middleware, routing::get};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Wrap the API routes with the cross-cutting pieces every app gets:
///
/// - API routes nested under `prefix` (e.g. `/console/api`)
/// - `GET /api-docs/openapi.json` generated from `T`
/// - JSON 404 fallback
/// - request tracing and security headers
///
/// Domain routers apply their own state before being passed in. Layers that
/// need to wrap the whole app (sessions) are added by the caller.
pub fn create_router<T>(prefix: &str, apis: Router) -> Router
where
    T: OpenApi + 'static,
{
    Router::new()
        .route("/api-docs/openapi.json", get(|| async { Json(T::openapi()) }))
        .nest(prefix, apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup` bounded by
/// `shutdown_timeout`.
///
/// Connections carry `ConnectInfo<SocketAddr>` so handlers can fall back to
/// the peer address when no proxy headers are present.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let signal_watcher = coordinator.clone();
    let mut cleanup_trigger = coordinator.subscribe();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    tokio::spawn(async move { signal_watcher.wait_for_signal().await });

    let cleanup_handle = tokio::spawn(async move {
        // Either a signal or the server exiting on its own ends the wait
        let _ = cleanup_trigger.recv().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let serve_coordinator = coordinator.clone();
    let serve_result = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { serve_coordinator.wait_for_shutdown().await })
    .await
    .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}

//! # Axum Helpers
//!
//! Cross-cutting pieces shared by the HTTP apps.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, health checks, graceful shutdown
//! - **[`http`]**: Response middleware (security headers)
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`audit`]**: Audit logging and client context extraction
//! - **[`session`]**: Cookie session layer used for console logins
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use axum_helpers::session::{SessionSettings, create_session_layer};
//! use core_config::{app_info, server::ServerConfig};
//!
//! let router = create_router::<ApiDoc>("/console/api", api_routes)
//!     .layer(create_session_layer(&SessionSettings::default()))
//!     .merge(health_router(app_info!()));
//!
//! create_production_app(router, &ServerConfig::default(), timeout, async {}).await?;
//! ```

pub mod audit;
pub mod errors;
pub mod http;
pub mod server;
pub mod session;

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

// Re-export HTTP middleware
pub use http::security_headers;

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse};

// Re-export audit types
pub use audit::{
    AuditEvent, AuditOutcome, ClientInfo, extract_ip_from_headers, extract_ip_from_socket,
    extract_user_agent,
};

// Re-export session types
pub use session::{SessionSettings, create_session_layer};

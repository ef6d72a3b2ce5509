//! Accounts Domain
//!
//! Console accounts and the external identities linked to them, plus the
//! single-sign-on flow that resolves an identity-provider callback into a
//! logged-in account.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │     Handlers     │  ← /oauth/login/{provider}, /oauth/authorize/{provider}
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐   ┌──────────────────┐
//! │ AccountLinking   │   │ ProviderRegistry │  ← provider key → OAuthProvider
//! │     Service      │   └──────────────────┘
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │    Repository    │  ← trait + in-memory / PostgreSQL implementations
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ Models / Entity  │
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use axum_helpers::{SessionSettings, create_session_layer};
//! use domain_accounts::{
//!     AccountLinkingService, AuthState, InMemoryAccountRepository, OAuthConfig,
//!     ProviderRegistry, handlers,
//! };
//!
//! let config = OAuthConfig::new("https://console.example.com");
//! let state = AuthState::new(
//!     AccountLinkingService::new(InMemoryAccountRepository::new()),
//!     ProviderRegistry::from_config(&config)?,
//!     config,
//!     SessionSettings::default(),
//! );
//!
//! let router = handlers::router(state).layer(create_session_layer(&SessionSettings::default()));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod language;
pub mod models;
pub mod oauth;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod session;

pub use error::{AccountError, AccountResult};
pub use handlers::AuthState;
pub use language::PreferredLanguage;
pub use models::{Account, AccountIntegrate, AccountStatus, CreateAccount, InterfaceLanguage};
pub use oauth::{OAuthConfig, OAuthProvider, OAuthUserInfo, ProviderRegistry};
pub use postgres::PgAccountRepository;
pub use repository::{AccountRepository, InMemoryAccountRepository};
pub use service::{AccountLinkingService, ResolutionSource, ResolvedAccount};
pub use session::{SESSION_ACCOUNT_KEY, SessionAccount};

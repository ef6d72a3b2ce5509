//! Database connectivity for the console services.
//!
//! # Features
//!
//! - `postgres` (default): pooled PostgreSQL connections through SeaORM,
//!   migration runner and readiness ping
//! - `config` (default): `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//!
//! let db = postgres::connect_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<migration::Migrator>(&db, "console_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};

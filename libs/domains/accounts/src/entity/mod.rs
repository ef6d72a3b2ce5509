//! SeaORM entities for the `accounts` and `account_integrates` tables

pub mod account;
pub mod account_integrate;

//! Core domain logic for filedrop: configuration, error taxonomy, and the
//! pure file-sharing primitives (storage naming, media classification,
//! byte-range planning).
//!
//! Everything in this crate is filesystem-free and side-effect-free except
//! `Config::from_env` (environment access) and `naming::encode` (clock
//! access); the rest is deterministic and unit-testable in isolation.

pub mod config;
pub mod error;
pub mod media_type;
pub mod models;
pub mod naming;
pub mod range;

pub use config::Config;
pub use error::{AppError, LogLevel};
pub use models::ListingEntry;

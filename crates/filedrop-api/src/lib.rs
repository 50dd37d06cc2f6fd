//! Filedrop API Library
//!
//! This crate provides the HTTP handlers, middleware, and application setup
//! for the filedrop file-sharing server.

// Module declarations
mod api_doc;
mod handlers;
mod middleware;
mod services;
mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::ErrorResponse;

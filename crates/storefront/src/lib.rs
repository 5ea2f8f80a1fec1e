//! Diamond Assess web application library.
//!
//! The binary in `main.rs` is a thin wrapper; everything needed to build the
//! router lives here so integration tests can drive it over HTTP.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::SiteConfig;
pub use routes::app;
pub use state::AppState;

//! Diamond Assess Core - Shared domain library.
//!
//! This crate provides the types used across all Diamond Assess components:
//! - `storefront` - Public marketing site with login and registration
//! - `integration-tests` - End-to-end HTTP tests
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and traits - no I/O, no
//! HTTP clients. Everything here can be unit tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Entities, type-safe IDs, money, emails and status lifecycles
//! - [`validation`] - Login and registration field validators
//! - [`form`] - Editable form state with clear-on-change error tracking
//! - [`personas`] - Demo credential fixtures for non-production deployments

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod form;
pub mod personas;
pub mod types;
pub mod validation;

pub use types::*;

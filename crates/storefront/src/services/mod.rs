//! Collaborators and the form handshakes that drive them.
//!
//! # Services
//!
//! - [`auth`] - Login service trait with demo and HTTP implementations
//! - [`registration`] - Account creation (simulated for now)
//! - [`notify`] - Toast notifications shown outside the form
//! - [`handshake`] - Validate-then-submit state machines for login and register

pub mod auth;
pub mod handshake;
pub mod notify;
pub mod registration;

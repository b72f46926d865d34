//! Jobsta web server.
//!
//! HTTP surface for the Jobsta campus job board: registration with
//! institutional email gating, token-based verification and magic-link
//! login, device-token sessions, password management, and a separately
//! guarded operator surface.

pub mod admin;
pub mod auth;
pub mod config;
pub mod db;
pub mod request_id;

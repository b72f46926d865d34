//! Credential store entities and token logic for the Jobsta platform.
//!
//! This crate provides:
//! - User management (`User`, `Role`)
//! - Single-use verification / magic-link tokens (`LoginToken`)
//! - Long-lived device session tokens (`DeviceToken`)
//! - Short-lived admin session tokens (`AdminToken`)
//! - The bcrypt hashing service (`PasswordHasher`)
//! - The flow-level error taxonomy (`AccessError`)
//!
//! # Token model
//!
//! Three distinct credentials exist, each with its own lifetime and
//! verification mechanism:
//! - A `LoginToken` is a single-use URL capability with a one-hour expiry,
//!   consumed exactly once at redemption.
//! - A `DeviceToken` row stores only the bcrypt hash of a high-entropy
//!   secret handed to the browser as a cookie; the plaintext is never
//!   persisted, so resolution scans active rows and verifies each hash.
//! - An `AdminToken` is stored as the plaintext capability itself and
//!   looked up directly by value; it expires after thirty minutes.
//!
//! The device-token and admin-token mechanisms are deliberately distinct
//! and are never mixed within one resolution path.

pub mod admin;
pub mod device;
pub mod error;
pub mod password;
pub mod role;
pub mod secret;
pub mod token;
pub mod user;

pub use admin::AdminToken;
pub use device::{DeviceToken, IssuedDeviceToken};
pub use error::AccessError;
pub use password::{HashError, PasswordHasher};
pub use role::Role;
pub use token::LoginToken;
pub use user::User;

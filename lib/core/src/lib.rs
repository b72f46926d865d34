//! Core domain types for the Jobsta access subsystem.
//!
//! This crate provides the strongly-typed identifiers shared by the
//! credential store, the flow logic, and the HTTP surface.

pub mod id;

pub use id::{DeviceTokenId, ParseIdError, UserId};

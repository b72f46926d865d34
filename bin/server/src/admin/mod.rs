//! Operator surface guarded by short-lived admin tokens.
//!
//! Admin sessions are deliberately simpler than user sessions: HTTP Basic
//! credentials from configuration are exchanged for a 48-byte capability
//! stored verbatim and looked up by primary key. The capability lives in its
//! own cookie and never interacts with the device-token scan.

pub mod middleware;
pub mod routes;

pub use middleware::RequireAdminToken;
pub use routes::{admin_login, admin_logout, admin_panel};

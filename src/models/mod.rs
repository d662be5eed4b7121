//! Data models for users, roles and authentication sessions.
//!
//! This module contains the core identity data structures used throughout
//! the application. Models are designed to be independent of UI and
//! business logic; they are created and owned by the external auth
//! provider and read-only everywhere else.

pub mod session;
pub mod user;

// Re-export all model types
pub use session::{AuthState, Session};
pub use user::{Role, User};

//! PrintDesk Shell Core Library
//!
//! This library provides the shell core of the PrintDesk point-of-sale
//! back office: session gating for authenticated views and reactive
//! mobile/desktop layout selection, both driven by explicitly injected
//! collaborators so they can be exercised without a real UI host.

// Module declarations
pub mod app;
pub mod auth;
pub mod config;
pub mod constants;
pub mod env;
pub mod events;
pub mod gate;
pub mod layout;
pub mod models;

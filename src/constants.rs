//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including routing targets and layout breakpoints.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "PrintDesk";

/// The binary name of the application (used in command examples, lowercase).
pub const APP_BINARY_NAME: &str = "printdesk";

/// Fixed route unauthenticated traffic is redirected to.
pub const LOGIN_ROUTE: &str = "/login";

/// Viewport width (logical pixels) below which the device heuristic
/// classifies the environment as mobile.
pub const MOBILE_BREAKPOINT: u16 = 768;

/// User-agent substrings that classify the environment as mobile hardware,
/// independent of viewport width. Matching is case-insensitive.
pub const MOBILE_UA_TOKENS: &[&str] = &["android", "iphone", "ipad", "mobile"];

/// Settings key under which the forced-mobile flag is persisted. Carried in
/// change notifications so listeners can ignore unrelated keys.
pub const FORCE_MOBILE_KEY: &str = "ui.force_mobile_layout";

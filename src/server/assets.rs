//! Static asset constants (CSS and JavaScript).

/// Stylesheet for the dashboard.
pub const CSS: &str = include_str!("styles.css");

/// Button handlers for the dashboard actions.
pub const JS: &str = include_str!("scripts.js");

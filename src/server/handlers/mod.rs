//! HTTP request handlers for the web server.

mod api;
mod dashboard;
mod static_files;

pub use api::{api_analyze, api_clean, api_load, api_products, api_view, health};
pub use dashboard::dashboard;
pub use static_files::{serve_css, serve_js};

//! reviewlens - LLM-assisted customer review annotation.
//!
//! Core library: load a reviews dataset, derive a per-row column (text
//! cleanup or LLM sentiment scoring), then aggregate per product.

// `from_str` helpers return Option, not the Result std::str::FromStr wants.
#![allow(clippy::should_implement_trait)]

pub mod config;
pub mod dataset;
pub mod llm;
pub mod server;
pub mod services;
pub mod session;
pub mod utils;

pub use config::Config;
pub use dataset::{Dataset, DatasetError, SampleSize, Value};
pub use session::{Notice, NoticeLevel, Session, SessionError};

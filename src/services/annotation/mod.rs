//! Annotation pipeline: trait-based abstraction for per-row transforms.
//!
//! Each transform (text cleanup, LLM sentiment scoring) implements the
//! `RowAnnotator` trait. The `AnnotationManager` provides a single batch loop
//! that works with any annotator.

mod annotator;
mod cache;
mod manager;
mod normalizer;
mod sentiment;
mod types;

pub use annotator::RowAnnotator;
pub use cache::{CacheStats, EvictionPolicy, MemoCache};
pub use manager::AnnotationManager;
pub use normalizer::{normalize_text, TextNormalizer};
pub use sentiment::{parse_score, SentimentConfig, SentimentScorer};
pub use types::{AnnotationError, AnnotationEvent, BatchAnnotationResult};

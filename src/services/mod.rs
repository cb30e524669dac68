//! Pipeline services: per-row annotation and aggregate views.

pub mod aggregate;
pub mod annotation;

pub use aggregate::{
    build_view, mean_by_product, product_options, score_column, AggregateError, AggregateView,
    CategoryMean, Histogram, HistogramBin, ProductFilter, ALL_PRODUCTS,
};
pub use annotation::{
    AnnotationError, AnnotationEvent, AnnotationManager, RowAnnotator, SentimentConfig,
    SentimentScorer, TextNormalizer,
};

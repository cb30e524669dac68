//! Aggregate views over an annotated dataset.
//!
//! A view is the filtered rows, the per-product mean of a numeric column,
//! and a fixed-bin histogram of that column.

mod histogram;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::dataset::{
    Dataset, DatasetError, PRODUCT_COLUMN, SENTIMENT_COLUMN, SENTIMENT_SCORE_COLUMN,
};

pub use histogram::{Histogram, HistogramBin, BIN_COUNT};

/// Label of the catch-all product filter option.
pub const ALL_PRODUCTS: &str = "All Products";

/// Errors from building a view.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// The column holds no number to average or bin, e.g. cleaned text.
    #[error("Column {0} has no numeric values to chart")]
    NotNumeric(String),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Which products a view covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductFilter {
    #[default]
    All,
    Product(String),
}

impl ProductFilter {
    /// Parse a select-box value; empty and "All Products" mean all.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some(ALL_PRODUCTS) => ProductFilter::All,
            Some(product) => ProductFilter::Product(product.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ProductFilter::All => ALL_PRODUCTS,
            ProductFilter::Product(p) => p,
        }
    }
}

impl fmt::Display for ProductFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mean of the numeric column for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMean {
    pub product: String,
    /// `None` when no row of this product has a numeric value.
    pub mean: Option<f64>,
    /// Rows that contributed to the mean.
    pub count: usize,
}

/// Everything the presentation layer draws for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateView {
    pub filter: String,
    pub column: String,
    pub records: Dataset,
    pub means: Vec<CategoryMean>,
    pub histogram: Histogram,
}

/// Numeric column the charts default to: the scored `SENTIMENT`, else a
/// shipped `SENTIMENT_SCORE`.
pub fn score_column(dataset: &Dataset) -> Option<&'static str> {
    [SENTIMENT_COLUMN, SENTIMENT_SCORE_COLUMN]
        .into_iter()
        .find(|c| dataset.has_column(c))
}

/// Select-box options: "All Products" followed by each product in
/// first-seen order.
pub fn product_options(dataset: &Dataset) -> Result<Vec<String>, DatasetError> {
    let mut options = vec![ALL_PRODUCTS.to_string()];
    options.extend(dataset.unique(PRODUCT_COLUMN)?);
    Ok(options)
}

/// Per-product means of `column`, ordered by product label.
pub fn mean_by_product(dataset: &Dataset, column: &str) -> Result<Vec<CategoryMean>, AggregateError> {
    if !dataset.has_column(column) {
        return Err(AggregateError::MissingColumn(column.to_string()));
    }
    let products = dataset.column(PRODUCT_COLUMN)?;
    let values = dataset.column_numbers(column)?;

    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (product, value) in products.into_iter().zip(values) {
        if product.is_missing() {
            continue;
        }
        let entry = groups.entry(product.to_string()).or_insert((0.0, 0));
        if let Some(v) = value {
            entry.0 += v;
            entry.1 += 1;
        }
    }

    Ok(groups
        .into_iter()
        .map(|(product, (sum, count))| CategoryMean {
            product,
            mean: (count > 0).then(|| sum / count as f64),
            count,
        })
        .collect())
}

/// Build the view of `column` for the selected products.
pub fn build_view(
    dataset: &Dataset,
    column: &str,
    filter: &ProductFilter,
) -> Result<AggregateView, AggregateError> {
    if !dataset.has_column(column) {
        return Err(AggregateError::MissingColumn(column.to_string()));
    }
    if dataset.column_numbers(column)?.iter().all(Option::is_none) {
        return Err(AggregateError::NotNumeric(column.to_string()));
    }

    let records = match filter {
        ProductFilter::All => dataset.clone(),
        ProductFilter::Product(product) => dataset.filter_eq(PRODUCT_COLUMN, product)?,
    };
    let means = mean_by_product(&records, column)?;
    let histogram = Histogram::from_values(records.column_numbers(column)?);

    Ok(AggregateView {
        filter: filter.label().to_string(),
        column: column.to_string(),
        records,
        means,
        histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    fn scored() -> Dataset {
        let rows = [
            ("Chair", "0.5"),
            ("Lamp", "-0.5"),
            ("Chair", "1.0"),
            ("Desk", ""),
            ("Lamp", "oops"),
            ("Lamp", "0.0"),
        ]
        .iter()
        .map(|(p, s)| {
            vec![
                Value::text(*p),
                if s.is_empty() { Value::Missing } else { Value::text(*s) },
            ]
        })
        .collect();
        Dataset::from_rows(vec!["PRODUCT", "SENTIMENT"], rows).unwrap()
    }

    #[test]
    fn filter_parse() {
        assert_eq!(ProductFilter::parse(None), ProductFilter::All);
        assert_eq!(ProductFilter::parse(Some("All Products")), ProductFilter::All);
        assert_eq!(ProductFilter::parse(Some(" ")), ProductFilter::All);
        assert_eq!(
            ProductFilter::parse(Some("Lamp")),
            ProductFilter::Product("Lamp".to_string())
        );
        assert_eq!(ProductFilter::Product("Lamp".into()).to_string(), "Lamp");
    }

    #[test]
    fn options_start_with_all_products() {
        assert_eq!(
            product_options(&scored()).unwrap(),
            vec!["All Products", "Chair", "Lamp", "Desk"]
        );
    }

    #[test]
    fn means_skip_non_numeric_and_sort_by_product() {
        let means = mean_by_product(&scored(), "SENTIMENT").unwrap();
        assert_eq!(
            means,
            vec![
                CategoryMean {
                    product: "Chair".into(),
                    mean: Some(0.75),
                    count: 2
                },
                CategoryMean {
                    product: "Desk".into(),
                    mean: None,
                    count: 0
                },
                CategoryMean {
                    product: "Lamp".into(),
                    mean: Some(-0.25),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn view_for_all_products() {
        let view = build_view(&scored(), "SENTIMENT", &ProductFilter::All).unwrap();
        assert_eq!(view.filter, "All Products");
        assert_eq!(view.records.len(), 6);
        assert_eq!(view.means.len(), 3);
        assert_eq!(view.histogram.bins().len(), 21);
        assert_eq!(view.histogram.total(), 4);
    }

    #[test]
    fn view_for_one_product_filters_everything() {
        let filter = ProductFilter::Product("Lamp".into());
        let view = build_view(&scored(), "SENTIMENT", &filter).unwrap();
        assert_eq!(view.records.len(), 3);
        assert_eq!(view.means.len(), 1);
        assert_eq!(view.means[0].product, "Lamp");
        assert_eq!(view.histogram.total(), 2);
    }

    #[test]
    fn unknown_product_gives_empty_view_not_error() {
        let filter = ProductFilter::Product("Sofa".into());
        let view = build_view(&scored(), "SENTIMENT", &filter).unwrap();
        assert!(view.records.is_empty());
        assert!(view.means.is_empty());
        assert_eq!(view.histogram.bins().len(), 21);
    }

    #[test]
    fn text_column_is_not_charted() {
        let rows = vec![
            vec![Value::text("Chair"), Value::text("sturdy comfy")],
            vec![Value::text("Lamp"), Value::Missing],
        ];
        let dataset = Dataset::from_rows(vec!["PRODUCT", "CLEANED_SUMMARY"], rows).unwrap();
        let err = build_view(&dataset, "CLEANED_SUMMARY", &ProductFilter::All).unwrap_err();
        assert!(matches!(err, AggregateError::NotNumeric(ref c) if c == "CLEANED_SUMMARY"));
    }

    #[test]
    fn score_column_prefers_scored_sentiment() {
        assert_eq!(score_column(&scored()), Some("SENTIMENT"));

        let shipped = Dataset::from_rows(
            vec!["PRODUCT", "SENTIMENT_SCORE"],
            vec![vec![Value::text("Chair"), Value::text("0.4")]],
        )
        .unwrap();
        assert_eq!(score_column(&shipped), Some("SENTIMENT_SCORE"));

        let plain = Dataset::from_rows(vec!["PRODUCT"], vec![vec![Value::text("Chair")]]).unwrap();
        assert_eq!(score_column(&plain), None);
    }

    #[test]
    fn missing_derived_column_is_an_error() {
        let err = build_view(&scored(), "CLEANED_SUMMARY", &ProductFilter::All).unwrap_err();
        assert!(matches!(err, AggregateError::MissingColumn(ref c) if c == "CLEANED_SUMMARY"));
    }
}

//! Terminal tables and bar charts.

use console::style;

use reviewlens::services::{CategoryMean, Histogram};
use reviewlens::utils::truncate_chars;
use reviewlens::{Dataset, Notice};

use super::icons;

/// Widest a table cell is allowed to get.
const MAX_CELL: usize = 48;
/// Width of the longest bar in a chart.
const BAR_WIDTH: usize = 40;

/// Print a notice with its level icon.
pub fn print_notice(notice: &Notice) {
    println!("{} {}", icons::for_level(notice.level), notice.message);
}

/// Print up to `limit` rows of `dataset` as an aligned table.
pub fn print_table(dataset: &Dataset, limit: usize) {
    let rows: Vec<Vec<String>> = dataset
        .records()
        .iter()
        .take(limit)
        .map(|r| {
            r.cells()
                .iter()
                .map(|c| truncate_chars(&c.to_string().replace('\n', " "), MAX_CELL))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = dataset
        .columns()
        .iter()
        .zip(&widths)
        .map(|(name, w)| format!("{:<w$}", name, w = *w))
        .collect();
    println!("{}", style(header.join("  ")).bold());
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
            .collect();
        println!("{}", line.join("  "));
    }

    if dataset.len() > limit {
        println!("{} {} more rows", icons::dim_arrow(), dataset.len() - limit);
    }
}

/// Horizontal bar for `value` scaled against `max`.
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.clamp(1, BAR_WIDTH))
}

/// Per-product mean sentiment as a bar chart. Negative means draw red.
pub fn print_means(title: &str, means: &[CategoryMean]) {
    println!("\n{}", style(title).bold());
    if means.is_empty() {
        println!("  No products in selection");
        return;
    }

    let label_width = means.iter().map(|m| m.product.chars().count()).max().unwrap_or(0);
    let max = means
        .iter()
        .filter_map(|m| m.mean)
        .map(f64::abs)
        .fold(0.0_f64, f64::max);

    for m in means {
        let label = format!("{:<w$}", m.product, w = label_width);
        match m.mean {
            Some(mean) => {
                let bar = bar(mean.abs(), max);
                let bar = if mean < 0.0 {
                    style(bar).red()
                } else {
                    style(bar).green()
                };
                println!("  {} {:>6.2} {}", label, mean, bar);
            }
            None => println!("  {} {:>6} {}", label, "n/a", style("no scores").dim()),
        }
    }
}

/// Histogram bins as a vertical list of bars, one per 0.1 step.
pub fn print_histogram(title: &str, histogram: &Histogram) {
    println!("\n{}", style(title).bold());
    let max = histogram.max_count() as f64;
    for bin in histogram.bins() {
        println!(
            "  {:>4} {:>3} {}",
            bin.label,
            bin.count,
            style(bar(bin.count as f64, max)).cyan()
        );
    }
}

//! HTML templates for the dashboard.

use crate::dataset::{Dataset, MAX_SAMPLE_SIZE, MIN_SAMPLE_SIZE};
use crate::services::{AggregateView, CategoryMean, Histogram};
use crate::session::{Notice, NoticeLevel};
use crate::utils::{html_escape, truncate_chars};

/// Longest review text shown in a table cell.
const CELL_CHARS: usize = 120;

/// Base HTML page.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - reviewlens</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header id="main-header">
        <nav><a href="/" class="logo">reviewlens</a></nav>
    </header>
    <main>
        <h1>{}</h1>
        <div id="notice"></div>
        {}
    </main>
    <script src="/static/dashboard.js"></script>
</body>
</html>"#,
        html_escape(title),
        html_escape(title),
        content
    )
}

/// Inline notice banner.
pub fn notice_banner(notice: Option<&Notice>) -> String {
    let Some(notice) = notice else {
        return String::new();
    };
    let class = match notice.level {
        NoticeLevel::Success => "success",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!(
        r#"<div class="notice {}">{}</div>"#,
        class,
        html_escape(&notice.message)
    )
}

/// Action buttons and the product filter form.
pub fn controls(
    phase: &str,
    options: &[String],
    selected: &str,
    column: &str,
    default_sample: usize,
) -> String {
    let option_tags: String = options
        .iter()
        .map(|o| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                html_escape(o),
                if o == selected { " selected" } else { "" },
                html_escape(o)
            )
        })
        .collect();

    format!(
        r#"<section class="controls">
    <div class="actions">
        <label>Sample size
            <input type="number" id="sample-size" min="{}" max="{}" value="{}">
        </label>
        <button class="btn-action" data-action="load">Ingest Dataset</button>
        <button class="btn-action" data-action="clean">Clean Text</button>
        <button class="btn-action" data-action="analyze">Analyze Sentiment</button>
        <span class="phase">state: {}</span>
    </div>
    <form method="get" action="/" class="filter">
        <input type="hidden" name="column" value="{}">
        <label>Product
            <select name="product" onchange="this.form.submit()">{}</select>
        </label>
    </form>
</section>"#,
        MIN_SAMPLE_SIZE,
        MAX_SAMPLE_SIZE,
        default_sample,
        html_escape(phase),
        html_escape(column),
        option_tags
    )
}

/// Table of dataset rows.
pub fn records_table(dataset: &Dataset) -> String {
    let header: String = dataset
        .columns()
        .iter()
        .map(|c| format!("<th>{}</th>", html_escape(c)))
        .collect();

    let rows: String = dataset
        .records()
        .iter()
        .map(|r| {
            let cells: String = r
                .cells()
                .iter()
                .map(|v| {
                    format!(
                        "<td>{}</td>",
                        html_escape(&truncate_chars(&v.to_string(), CELL_CHARS))
                    )
                })
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();

    format!(
        r#"<table class="records">
    <thead><tr>{}</tr></thead>
    <tbody>{}</tbody>
</table>"#,
        header, rows
    )
}

/// Horizontal bar chart of per-product means on a -1..1 axis.
pub fn mean_chart(means: &[CategoryMean]) -> String {
    if means.is_empty() {
        return r#"<p class="empty">No products in selection.</p>"#.to_string();
    }

    let bars: String = means
        .iter()
        .map(|m| match m.mean {
            Some(mean) => {
                let width = (mean.abs().min(1.0) * 50.0).max(0.5);
                let (class, offset) = if mean < 0.0 {
                    ("negative", 50.0 - width)
                } else {
                    ("positive", 50.0)
                };
                format!(
                    r#"<div class="bar-row">
    <span class="bar-label">{}</span>
    <div class="bar-track"><div class="bar {}" style="left:{:.1}%;width:{:.1}%"></div></div>
    <span class="bar-value">{:.2}</span>
</div>"#,
                    html_escape(&m.product),
                    class,
                    offset,
                    width,
                    mean
                )
            }
            None => format!(
                r#"<div class="bar-row">
    <span class="bar-label">{}</span>
    <div class="bar-track"></div>
    <span class="bar-value">n/a</span>
</div>"#,
                html_escape(&m.product)
            ),
        })
        .collect();

    format!(r#"<div class="chart means">{}</div>"#, bars)
}

/// Column chart of the 21 histogram bins.
pub fn histogram_chart(histogram: &Histogram) -> String {
    let max = histogram.max_count().max(1) as f64;
    let columns: String = histogram
        .bins()
        .iter()
        .map(|bin| {
            format!(
                r#"<div class="hist-col" title="{}: {}">
    <div class="hist-bar" style="height:{:.1}%"></div>
    <span class="hist-label">{}</span>
</div>"#,
                bin.label,
                bin.count,
                bin.count as f64 / max * 100.0,
                bin.label
            )
        })
        .collect();

    format!(r#"<div class="chart histogram">{}</div>"#, columns)
}

/// Sections for a computed view.
pub fn view_sections(view: &AggregateView) -> String {
    format!(
        r#"<section>
    <h2>Reviews ({})</h2>
    {}
</section>
<section>
    <h2>Average {} by product</h2>
    {}
</section>
<section>
    <h2>{} distribution</h2>
    {}
</section>"#,
        html_escape(&view.filter),
        records_table(&view.records),
        html_escape(&view.column),
        mean_chart(&view.means),
        html_escape(&view.column),
        histogram_chart(&view.histogram)
    )
}

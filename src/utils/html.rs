//! Text helpers for HTML and terminal rendering.

/// Escape HTML special characters for safe rendering in text and attributes.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Keep at most `max` characters, appending "..." when text was cut.
pub fn truncate_chars(s: &str, max: usize) -> String {
    let mut chars = s.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_review_text() {
        assert_eq!(html_escape("great chair"), "great chair");
        assert_eq!(
            html_escape("<b>5 stars</b> & \"comfy\" isn't it"),
            "&lt;b&gt;5 stars&lt;/b&gt; &amp; &quot;comfy&quot; isn&#39;t it"
        );
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exact", 5), "exact");
    }
}

//! Console output icons.

use console::{style, StyledObject};

use reviewlens::NoticeLevel;

/// Green ✓.
pub fn success() -> StyledObject<&'static str> {
    style("✓").green()
}

/// Cyan →.
pub fn info() -> StyledObject<&'static str> {
    style("→").cyan()
}

/// Yellow !.
pub fn warn() -> StyledObject<&'static str> {
    style("!").yellow()
}

/// Red ✗.
pub fn error() -> StyledObject<&'static str> {
    style("✗").red()
}

/// Dim arrow for secondary info.
pub fn dim_arrow() -> StyledObject<&'static str> {
    style("→").dim()
}

/// Icon for a session notice.
pub fn for_level(level: NoticeLevel) -> StyledObject<&'static str> {
    match level {
        NoticeLevel::Success => success(),
        NoticeLevel::Warning => warn(),
        NoticeLevel::Error => error(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_levels_map_to_distinct_icons() {
        let s = for_level(NoticeLevel::Success).force_styling(false).to_string();
        let w = for_level(NoticeLevel::Warning).force_styling(false).to_string();
        let e = for_level(NoticeLevel::Error).force_styling(false).to_string();
        assert_eq!(s, "✓");
        assert_eq!(w, "!");
        assert_eq!(e, "✗");
        assert_eq!(info().force_styling(false).to_string(), "→");
        assert_eq!(dim_arrow().force_styling(false).to_string(), "→");
    }
}

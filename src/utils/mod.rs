//! Utilities module for mdlive
//!
//! Shared helper functions:
//! - Line ending normalization
//! - Path utilities

use std::borrow::Cow;

/// Convert `\r\n` and lone `\r` line endings to `\n`
pub fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if s.contains('\r') {
        Cow::Owned(s.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Path utilities
pub mod path {
    use std::path::Path;

    /// Check if path has a markdown extension
    pub fn is_markdown(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("md" | "markdown" | "mdown" | "mkd")
        )
    }

    /// File name for display, falling back to the full path
    pub fn display_name(path: &Path) -> String {
        path.file_name()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
        assert!(matches!(normalize_newlines("plain\n"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_is_markdown() {
        assert!(path::is_markdown(Path::new("test.md")));
        assert!(path::is_markdown(Path::new("test.markdown")));
        assert!(!path::is_markdown(Path::new("test.txt")));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(path::display_name(Path::new("/docs/srs.md")), "srs.md");
    }
}

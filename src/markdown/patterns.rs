//! Compiled-once patterns for line and inline Markdown constructs
//!
//! All patterns run against a single line without its newline. The `regex`
//! crate matches in linear time, so scanning long lines full of delimiters
//! cannot blow up.

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening or closing fence: up to three spaces, then three backticks
pub static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}```").unwrap());

/// ATX heading; group 1 is the indent, group 2 the hashes plus optional space
pub static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^( {0,3})(#{1,6} ?)").unwrap());

/// Bullet list marker including indent and separating spaces
pub static UNORDERED_LIST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}[-*] +").unwrap());

/// Numbered list marker including indent and separating spaces
pub static ORDERED_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}[0-9]+[.)] +").unwrap());

/// Blockquote; group 2 is the `>` plus optional space
pub static BLOCKQUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^( {0,3})(> ?)").unwrap());

/// Strong emphasis; group 1 is the content, which must not start with `*`
pub static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*][^\n]*?)\*\*").unwrap());

/// Code span; group 1 is the content
pub static INLINE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").unwrap());

/// Whether a line opens or closes a fenced code block
pub fn is_fence(line: &str) -> bool {
    FENCE_RE.is_match(line)
}

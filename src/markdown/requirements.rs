//! Requirement identifier detection
//!
//! Requirement documents label themselves with identifiers such as
//! `Y10K-PROJ-AREA-HL-001`. These are highlighted inline and collected for
//! status display and commit messages. Matching is always case-sensitive.

use crate::error::{ConfigError, ConfigResult};
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;

/// A compiled requirement identifier pattern
#[derive(Debug, Clone)]
pub struct RequirementIdPattern {
    regex: Regex,
}

impl RequirementIdPattern {
    /// Compile a pattern, rejecting invalid or empty-matching expressions
    pub fn new(pattern: &str) -> ConfigResult<Self> {
        let regex = Regex::new(pattern).map_err(|err| ConfigError::InvalidValue {
            key: "annotator.requirement_id_pattern".to_string(),
            reason: err.to_string(),
        })?;
        if regex.is_match("") {
            return Err(ConfigError::InvalidValue {
                key: "annotator.requirement_id_pattern".to_string(),
                reason: "pattern must not match empty text".to_string(),
            });
        }
        Ok(Self { regex })
    }

    /// The pattern source
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// All identifiers in `text`, deduplicated, in order of first occurrence
    pub fn detect(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.regex
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|id| seen.insert(*id))
            .map(str::to_string)
            .collect()
    }

    /// Char ranges of every identifier in `text`
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut byte_pos = 0;
        let mut char_pos = 0;
        for m in self.regex.find_iter(text) {
            char_pos += text[byte_pos..m.start()].chars().count();
            let len = m.as_str().chars().count();
            spans.push(char_pos..char_pos + len);
            char_pos += len;
            byte_pos = m.end();
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REQUIREMENT_ID_PATTERN;

    fn default_pattern() -> RequirementIdPattern {
        RequirementIdPattern::new(DEFAULT_REQUIREMENT_ID_PATTERN).unwrap()
    }

    #[test]
    fn test_detect_unique_in_order() {
        let text = "See Y10K-CORE-AUTH-LL-002 and Y10K-CORE-AUTH-HL-001.\n\
                    Again Y10K-CORE-AUTH-LL-002.";
        assert_eq!(
            default_pattern().detect(text),
            vec!["Y10K-CORE-AUTH-LL-002", "Y10K-CORE-AUTH-HL-001"]
        );
    }

    #[test]
    fn test_detect_is_case_sensitive() {
        assert!(default_pattern().detect("y10k-core-auth-hl-001").is_empty());
    }

    #[test]
    fn test_detect_requires_known_kind() {
        assert!(default_pattern().detect("Y10K-CORE-AUTH-XX-001").is_empty());
        assert!(default_pattern().detect("Y10K-CORE-AUTH-HL-01").is_empty());
    }

    #[test]
    fn test_spans_count_chars() {
        let spans = default_pattern().spans("Å: Y10K-A-B-DB-123 ö Y10K-A-B-API-999");
        assert_eq!(spans, vec![3..18, 21..37]);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = RequirementIdPattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(RequirementIdPattern::new("a*").is_err());
    }
}

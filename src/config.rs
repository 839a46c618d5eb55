use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Every heuristic threshold the parser uses. None of these are business
/// rules; the defaults reproduce the documented behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Winning score below this switches to the fallback ladder.
    pub score_floor: i32,
    pub confidence_cap: f64,
    /// Fixed confidence of the file-upload override.
    pub file_confidence: f64,
    /// Lines before/after a question inspected for blank and instruction signals.
    pub context_window: usize,
    /// Lines after a question inspected for option and scale signals.
    pub lookahead_window: usize,
    /// Plain lines merged into a question as continuation.
    pub continuation_limit: usize,
    /// Lines scanned for an option block before giving up.
    pub option_scan_limit: usize,
    /// More option lines than this suggest a dropdown.
    pub select_option_threshold: usize,
    /// Lines around a rating question searched for a numeric range.
    pub scale_window: usize,
    /// Widest synthesized scale (max - min).
    pub max_scale_span: i64,
    /// Unnumbered `?` lines must be longer than this to count as questions.
    pub question_mark_min_len: usize,
    pub fallback_min_len: usize,
    pub fallback_max_len: usize,
    pub fallback_cap: usize,
    /// Fallback questions at least this long become `textarea`.
    pub fallback_textarea_len: usize,
    pub fallback_confidence: f64,
    /// Emphasized lines shorter than this count as section headings.
    pub section_markup_max_len: usize,
    /// Exactly two parenthesis options favor `radio`.
    pub two_option_radio: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            score_floor: 30,
            confidence_cap: 0.99,
            file_confidence: 0.95,
            context_window: 5,
            lookahead_window: 20,
            continuation_limit: 3,
            option_scan_limit: 20,
            select_option_threshold: 10,
            scale_window: 5,
            max_scale_span: 20,
            question_mark_min_len: 10,
            fallback_min_len: 15,
            fallback_max_len: 500,
            fallback_cap: 20,
            fallback_textarea_len: 200,
            fallback_confidence: 0.3,
            section_markup_max_len: 60,
            two_option_radio: true,
        }
    }
}

impl ParserConfig {
    /// Load a JSON config; keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let content = std::fs::read_to_string(path).map_err(|source| ParseError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ParseError::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `None` means defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ParseError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_expected_values() {
        let config = ParserConfig::default();
        assert_eq!(config.score_floor, 30);
        assert_eq!(config.lookahead_window, 20);
        assert_eq!(config.fallback_cap, 20);
        assert!(config.two_option_radio);
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("parser.json");
        fs::write(&path, r#"{ "score_floor": 45, "two_option_radio": false }"#).unwrap();

        let config = ParserConfig::load(&path).unwrap();
        assert_eq!(config.score_floor, 45);
        assert!(!config.two_option_radio);
        assert_eq!(config.lookahead_window, 20);
    }

    #[test]
    fn missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = ParserConfig::load(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ParseError::ConfigRead { .. }));
    }

    #[test]
    fn malformed_file_is_format_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "score_floor = 3").unwrap();
        let err = ParserConfig::load(&path).unwrap_err();
        assert!(matches!(err, ParseError::ConfigFormat { .. }));
    }

    #[test]
    fn none_path_returns_defaults() {
        assert_eq!(ParserConfig::load_or_default(None).unwrap(), ParserConfig::default());
    }
}

use regex::{NoExpand, Regex};
use std::borrow::Cow;

use crate::config::PhraseEntry;
use crate::error::{DpVietError, Result};

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Build a case-insensitive pattern for a phrase. Words may be separated by
/// any run of whitespace. A `\b` anchor is placed only on an edge that is a
/// word character, so phrases such as "I'm" or "ok!" still anchor correctly.
pub fn phrase_pattern(phrase: &str) -> Result<String> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let (Some(first), Some(last)) = (words.first(), words.last()) else {
        return Err(DpVietError::Config("Rule phrase must not be empty".to_string()));
    };

    let leading = if first.starts_with(is_word_char) { r"\b" } else { "" };
    let trailing = if last.ends_with(is_word_char) { r"\b" } else { "" };
    let body = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join(r"\s+");

    Ok(format!("(?i){}{}{}", leading, body, trailing))
}

const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Split trailing whitespace and the run of `.`, `!`, `?` off a line.
/// Returns the stem and the punctuation run.
pub fn split_terminal_punctuation(text: &str) -> (&str, &str) {
    let trimmed = text.trim_end();
    let stem = trimmed.trim_end_matches(TERMINAL_PUNCTUATION);
    (stem.trim_end(), &trimmed[stem.len()..])
}

/// A compiled whole-phrase substitution
#[derive(Debug, Clone)]
pub struct PhraseRule {
    source: String,
    pattern: Regex,
    replacement: String,
}

impl PhraseRule {
    pub fn new(source: &str, replacement: &str) -> Result<Self> {
        let pattern = Regex::new(&phrase_pattern(source)?)?;
        Ok(Self {
            source: source.to_string(),
            pattern,
            replacement: replacement.to_string(),
        })
    }

    pub fn from_entry(entry: &PhraseEntry) -> Result<Self> {
        Self::new(&entry.source, &entry.target)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match; replacement text is taken literally
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(text, NoExpand(&self.replacement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_anchors_word_edges_only() {
        assert_eq!(phrase_pattern("awesome").unwrap(), r"(?i)\bawesome\b");
        assert_eq!(phrase_pattern("Let's go").unwrap(), r"(?i)\bLet's\s+go\b");
        assert_eq!(phrase_pattern("wow!").unwrap(), r"(?i)\bwow!");
    }

    #[test]
    fn test_split_terminal_punctuation() {
        assert_eq!(split_terminal_punctuation("Let's go!"), ("Let's go", "!"));
        assert_eq!(split_terminal_punctuation("What?! "), ("What", "?!"));
        assert_eq!(split_terminal_punctuation("Well ..."), ("Well", "..."));
        assert_eq!(split_terminal_punctuation("Go for it"), ("Go for it", ""));
        assert_eq!(split_terminal_punctuation("!"), ("", "!"));
    }

    #[test]
    fn test_empty_phrase_is_rejected() {
        assert!(matches!(phrase_pattern("   "), Err(DpVietError::Config(_))));
    }

    #[test]
    fn test_whole_word_case_insensitive() {
        let rule = PhraseRule::new("ready", "sẵn sàng").unwrap();
        assert_eq!(rule.apply("READY already?"), "sẵn sàng already?");
    }

    #[test]
    fn test_contraction_not_matched_inside_longer_token() {
        let rule = PhraseRule::new("I'm", "Tui").unwrap();
        assert_eq!(rule.apply("I'mZZZ"), "I'mZZZ");
        assert_eq!(rule.apply("i'm here"), "Tui here");
    }

    #[test]
    fn test_multi_word_phrase_spans_whitespace_runs() {
        let rule = PhraseRule::new("Thank you", "Cảm ơn").unwrap();
        assert_eq!(rule.apply("thank  you so much"), "Cảm ơn so much");
        assert_eq!(rule.apply("thankyou"), "thankyou");
    }

    #[test]
    fn test_replacement_is_literal() {
        let rule = PhraseRule::new("cash", "$1 đô").unwrap();
        assert_eq!(rule.apply("cash"), "$1 đô");
    }
}

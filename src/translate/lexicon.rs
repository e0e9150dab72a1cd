use std::cmp::Reverse;
use tracing::debug;

use crate::config::{LexiconConfig, OverlapPolicy};
use crate::error::Result;
use super::phrase::PhraseRule;

/// Ordered phrase substitutions standing in for real translation
#[derive(Debug, Clone)]
pub struct Lexicon {
    rules: Vec<PhraseRule>,
}

impl Lexicon {
    pub fn from_config(config: &LexiconConfig) -> Result<Self> {
        let mut entries = config.entries.clone();
        if config.overlap == OverlapPolicy::LongestFirst {
            // stable, so equal lengths keep their declared order
            entries.sort_by_key(|entry| Reverse(entry.source.chars().count()));
        }

        let rules = entries
            .iter()
            .map(PhraseRule::from_entry)
            .collect::<Result<Vec<_>>>()?;

        debug!("Compiled lexicon with {} rules ({:?})", rules.len(), config.overlap);
        Ok(Self { rules })
    }

    /// Source phrases in the order they are applied
    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.source())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule once, each rule seeing the output of the previous one
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc).into_owned())
    }
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ToneConfig, TonePolicy};
use crate::error::{DpVietError, Result};
use super::phrase::{is_word_char, split_terminal_punctuation};

#[derive(Debug, Clone)]
struct Filler {
    text: String,
    /// filler without its own terminal punctuation, e.g. "luôn"
    core: String,
    /// the filler's terminal punctuation, e.g. "!"
    tail: String,
}

impl Filler {
    fn new(text: &str) -> Self {
        let text = text.trim();
        let (core, tail) = split_terminal_punctuation(text);
        Self {
            text: text.to_string(),
            core: core.to_string(),
            tail: tail.to_string(),
        }
    }
}

/// True if `text` ends with `phrase` and the phrase does not start mid-word
fn ends_with_phrase(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    match text.strip_suffix(phrase) {
        Some(rest) => rest.chars().next_back().is_none_or(|c| !is_word_char(c)),
        None => false,
    }
}

/// Chooses which filler closes a line. One selector lives for one document.
#[derive(Debug, Clone)]
pub enum FillerSelector {
    Fixed(usize),
    Random(StdRng),
}

impl FillerSelector {
    pub fn from_policy(policy: TonePolicy) -> Self {
        match policy {
            TonePolicy::Fixed { index } => FillerSelector::Fixed(index),
            TonePolicy::Seeded { seed } => FillerSelector::Random(StdRng::seed_from_u64(seed)),
            TonePolicy::Random => FillerSelector::Random(StdRng::from_os_rng()),
        }
    }

    pub fn with_rng(rng: StdRng) -> Self {
        FillerSelector::Random(rng)
    }

    fn pick(&mut self, count: usize) -> usize {
        match self {
            FillerSelector::Fixed(index) => (*index).min(count - 1),
            FillerSelector::Random(rng) => rng.random_range(0..count),
        }
    }
}

/// Sentence-final tone fillers
#[derive(Debug, Clone)]
pub struct ToneEndings {
    fillers: Vec<Filler>,
    policy: TonePolicy,
}

impl ToneEndings {
    pub fn from_config(config: &ToneConfig) -> Result<Self> {
        if config.fillers.is_empty() {
            return Err(DpVietError::Config("Tone filler table must not be empty".to_string()));
        }
        if config.fillers.iter().any(|f| f.trim().is_empty()) {
            return Err(DpVietError::Config("Tone fillers must not be blank".to_string()));
        }
        if let TonePolicy::Fixed { index } = config.policy {
            if index >= config.fillers.len() {
                return Err(DpVietError::Config(format!(
                    "Fixed filler index {} is out of range for {} fillers",
                    index,
                    config.fillers.len()
                )));
            }
        }

        Ok(Self {
            fillers: config.fillers.iter().map(|f| Filler::new(f)).collect(),
            policy: config.policy,
        })
    }

    pub fn policy(&self) -> TonePolicy {
        self.policy
    }

    /// A fresh selector for one document
    pub fn selector(&self) -> FillerSelector {
        FillerSelector::from_policy(self.policy)
    }

    /// Replace terminal `.`/`!`/`?` with a filler, or append one after a space.
    /// Text that already closes with a filler is left as is, so running this
    /// on its own output never doubles the filler. Leading whitespace is kept.
    pub fn apply(&self, text: &str, selector: &mut FillerSelector) -> String {
        let text = text.trim_end();
        if text.trim_start().is_empty() {
            return String::new();
        }
        if self.fillers.iter().any(|f| ends_with_phrase(text, &f.text)) {
            return text.to_string();
        }

        let (stem, _) = split_terminal_punctuation(text);
        let filler = &self.fillers[selector.pick(self.fillers.len())];
        // "luôn." with "luôn!" selected only needs its punctuation swapped
        if ends_with_phrase(stem, &filler.core) {
            return format!("{}{}", stem, filler.tail);
        }

        if stem.trim_start().is_empty() {
            filler.text.clone()
        } else {
            format!("{} {}", stem, filler.text)
        }
    }
}

use std::collections::HashMap;
use tracing::debug;

use crate::config::{ClosingConfig, RoleProfileConfig};
use crate::error::{DpVietError, Result};
use super::phrase::{split_terminal_punctuation, PhraseRule};

/// Phrase appended after a profile's rules ran
#[derive(Debug, Clone)]
pub struct Closing {
    text: String,
    core: String,
    requires: Vec<String>,
}

impl Closing {
    fn from_config(config: &ClosingConfig) -> Result<Self> {
        if config.text.trim().is_empty() {
            return Err(DpVietError::Config("Closing text must not be empty".to_string()));
        }
        let text = config.text.trim();
        let (core, _) = split_terminal_punctuation(text);
        Ok(Self {
            text: text.to_string(),
            core: core.to_string(),
            requires: config.requires.clone(),
        })
    }

    /// Skipped for empty lines and for lines that already carry the closing
    fn applies_to(&self, text: &str) -> bool {
        !text.trim().is_empty()
            && (self.core.is_empty() || !text.contains(self.core.as_str()))
            && self.requires.iter().all(|term| text.contains(term.as_str()))
    }

    /// The closing replaces the terminal punctuation of the line
    fn attach(&self, text: &str) -> String {
        let (stem, _) = split_terminal_punctuation(text);
        if stem.is_empty() {
            self.text.clone()
        } else {
            format!("{} {}", stem, self.text)
        }
    }
}

/// Declarative pronoun and salutation rewrite for one speaker role
#[derive(Debug, Clone)]
pub struct PronounProfile {
    name: String,
    rules: Vec<PhraseRule>,
    closing: Option<Closing>,
}

impl PronounProfile {
    /// Profile for unknown or absent speakers: rewrites nothing
    pub fn passthrough() -> Self {
        Self {
            name: "passthrough".to_string(),
            rules: Vec::new(),
            closing: None,
        }
    }

    fn from_config(config: &RoleProfileConfig) -> Result<Self> {
        let rules = config
            .rules
            .iter()
            .map(PhraseRule::from_entry)
            .collect::<Result<Vec<_>>>()?;
        let closing = config.closing.as_ref().map(Closing::from_config).transpose()?;

        Ok(Self {
            name: config.name.clone(),
            rules,
            closing,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_passthrough(&self) -> bool {
        self.rules.is_empty() && self.closing.is_none()
    }

    /// Rules run in declared order, so contractions ("you're") must be listed
    /// before the bare form ("you") whose boundary they contain.
    pub fn apply(&self, text: &str) -> String {
        let rewritten = self
            .rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc).into_owned());

        match &self.closing {
            Some(closing) if closing.applies_to(&rewritten) => closing.attach(&rewritten),
            _ => rewritten,
        }
    }
}

/// Maps speaker tags to pronoun profiles
#[derive(Debug, Clone)]
pub struct RoleTable {
    profiles: Vec<PronounProfile>,
    by_speaker: HashMap<String, usize>,
    passthrough: PronounProfile,
}

impl RoleTable {
    pub fn from_config(roles: &[RoleProfileConfig]) -> Result<Self> {
        let mut profiles = Vec::with_capacity(roles.len());
        let mut by_speaker = HashMap::new();

        for (idx, role) in roles.iter().enumerate() {
            profiles.push(PronounProfile::from_config(role)?);

            for speaker in &role.speakers {
                if let Some(previous) = by_speaker.insert(speaker.clone(), idx) {
                    return Err(DpVietError::Config(format!(
                        "Speaker '{}' is assigned to both '{}' and '{}'",
                        speaker, roles[previous].name, role.name
                    )));
                }
            }
        }

        debug!("Compiled role table: {} profiles, {} speakers", profiles.len(), by_speaker.len());
        Ok(Self {
            profiles,
            by_speaker,
            passthrough: PronounProfile::passthrough(),
        })
    }

    /// Speaker tags are matched case-sensitively
    pub fn profile_for(&self, speaker: Option<&str>) -> &PronounProfile {
        speaker
            .and_then(|s| self.by_speaker.get(s))
            .map(|&idx| &self.profiles[idx])
            .unwrap_or(&self.passthrough)
    }

    pub fn apply(&self, text: &str, speaker: Option<&str>) -> String {
        self.profile_for(speaker).apply(text)
    }
}

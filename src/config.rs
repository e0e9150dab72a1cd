use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, DpVietError};

fn default_output_prefix() -> String {
    "DP_VN_Sub_".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Prefix prepended to the original file name of every rewritten file
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,
    pub lexicon: LexiconConfig,
    pub roles: Vec<RoleProfileConfig>,
    pub tone: ToneConfig,
}

/// A single source phrase and its replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseEntry {
    pub source: String,
    pub target: String,
}

impl PhraseEntry {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// How entries whose phrases overlap are ordered
    #[serde(default)]
    pub overlap: OverlapPolicy,
    /// Substitutions, in declared order
    pub entries: Vec<PhraseEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Longer source phrases are tried first; ties keep declared order
    #[default]
    LongestFirst,
    /// Entries are applied exactly as declared
    Declared,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProfileConfig {
    /// Profile name, e.g. "first-person-female-to-spouse"
    pub name: String,
    /// Speaker tags (case-sensitive) that use this profile
    pub speakers: Vec<String>,
    /// Pronoun and salutation substitutions, in application order
    pub rules: Vec<PhraseEntry>,
    /// Phrase added at the end of the line after the rules ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing: Option<ClosingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingConfig {
    pub text: String,
    /// Terms that must all appear in the rewritten line; empty means always
    #[serde(default)]
    pub requires: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneConfig {
    /// Sentence-final filler phrases
    pub fillers: Vec<String>,
    #[serde(default)]
    pub policy: TonePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TonePolicy {
    /// Always use the filler at `index`
    Fixed { index: usize },
    /// Pick randomly from a generator seeded with `seed` at the start of every document
    Seeded { seed: u64 },
    /// Pick randomly from an OS-seeded generator
    Random,
}

impl Default for TonePolicy {
    fn default() -> Self {
        TonePolicy::Fixed { index: 0 }
    }
}

impl Default for Config {
    fn default() -> Self {
        let bro_speakers = ["Tyler", "Cody", "Cory", "Coby", "Garrett"];

        Self {
            output_prefix: default_output_prefix(),
            lexicon: LexiconConfig {
                overlap: OverlapPolicy::LongestFirst,
                entries: vec![
                    PhraseEntry::new("Let's go", "Chơi thôi"),
                    PhraseEntry::new("really good", "ngon lành"),
                    PhraseEntry::new("What the", "Cái gì vậy cha nội"),
                    PhraseEntry::new("I'm ready", "Tui sẵn sàng"),
                    PhraseEntry::new("You guys", "Mấy ông"),
                    PhraseEntry::new("Thank you", "Cảm ơn"),
                    PhraseEntry::new("awesome", "quá đã"),
                    PhraseEntry::new("insane", "điên quá xá"),
                    PhraseEntry::new("amazing", "tuyệt vời ông mặt trời"),
                ],
            },
            roles: vec![
                RoleProfileConfig {
                    name: "first-person-male-informal".to_string(),
                    speakers: bro_speakers.iter().map(|s| s.to_string()).collect(),
                    rules: vec![
                        PhraseEntry::new("I'm", "Tui"),
                        PhraseEntry::new("I", "Tui"),
                        PhraseEntry::new("you're", "ông"),
                        PhraseEntry::new("your", "của ông"),
                        PhraseEntry::new("you", "ông"),
                    ],
                    closing: Some(ClosingConfig {
                        text: "nha ông bạn!".to_string(),
                        requires: vec!["Tui".to_string(), "ông".to_string()],
                    }),
                },
                RoleProfileConfig {
                    name: "first-person-informal".to_string(),
                    speakers: vec!["Sparky".to_string()],
                    rules: vec![
                        PhraseEntry::new("I'm", "Tui"),
                        PhraseEntry::new("I", "Tui"),
                    ],
                    closing: Some(ClosingConfig {
                        text: "đó nha!".to_string(),
                        requires: Vec::new(),
                    }),
                },
                RoleProfileConfig {
                    name: "first-person-female-to-spouse".to_string(),
                    speakers: vec!["Wife".to_string()],
                    rules: vec![
                        PhraseEntry::new("I'm", "Em"),
                        PhraseEntry::new("I", "Em"),
                        PhraseEntry::new("me", "em"),
                        PhraseEntry::new("my", "của em"),
                        PhraseEntry::new("you're", "Anh"),
                        PhraseEntry::new("your", "của anh"),
                        PhraseEntry::new("you", "Anh"),
                    ],
                    closing: None,
                },
                RoleProfileConfig {
                    name: "first-person-male-to-spouse".to_string(),
                    speakers: vec!["Husband".to_string()],
                    rules: vec![
                        PhraseEntry::new("I'm", "Anh"),
                        PhraseEntry::new("I", "Anh"),
                        PhraseEntry::new("me", "anh"),
                        PhraseEntry::new("my", "của anh"),
                        PhraseEntry::new("you're", "Em"),
                        PhraseEntry::new("your", "của em"),
                        PhraseEntry::new("you", "Em"),
                    ],
                    closing: None,
                },
            ],
            tone: ToneConfig {
                fillers: vec![
                    "luôn!".to_string(),
                    "nha!".to_string(),
                    "đó!".to_string(),
                    "á!".to_string(),
                ],
                policy: TonePolicy::Fixed { index: 0 },
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DpVietError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| DpVietError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DpVietError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| DpVietError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_populated() {
        let config = Config::default();
        assert_eq!(config.output_prefix, "DP_VN_Sub_");
        assert_eq!(config.lexicon.entries[0], PhraseEntry::new("Let's go", "Chơi thôi"));
        assert_eq!(config.tone.fillers[0], "luôn!");
        assert_eq!(config.tone.policy, TonePolicy::Fixed { index: 0 });
        assert!(config.roles.iter().any(|r| r.speakers.contains(&"Wife".to_string())));
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_text = r#"
            [lexicon]
            overlap = "declared"

            [[lexicon.entries]]
            source = "hello"
            target = "chào"

            [[roles]]
            name = "casual"
            speakers = ["Ty"]
            rules = [{ source = "I", target = "Tui" }]
            closing = { text = "nha!" }

            [tone]
            fillers = ["á!", "nha!"]
            policy = { mode = "seeded", seed = 7 }
        "#;

        let config: Config = toml::from_str(toml_text).unwrap();
        assert_eq!(config.output_prefix, "DP_VN_Sub_");
        assert_eq!(config.lexicon.overlap, OverlapPolicy::Declared);
        assert_eq!(config.roles[0].rules[0], PhraseEntry::new("I", "Tui"));
        assert!(config.roles[0].closing.as_ref().unwrap().requires.is_empty());
        assert_eq!(config.tone.policy, TonePolicy::Seeded { seed: 7 });
    }

    #[test]
    fn test_random_policy_and_defaults() {
        let toml_text = r#"
            roles = []

            [lexicon]
            entries = []

            [tone]
            fillers = ["luôn!"]
            policy = { mode = "random" }
        "#;

        let config: Config = toml::from_str(toml_text).unwrap();
        assert_eq!(config.lexicon.overlap, OverlapPolicy::LongestFirst);
        assert_eq!(config.tone.policy, TonePolicy::Random);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let original = Config::default();
        original.save_to_file(&path).unwrap();
        let reloaded = Config::from_file(&path).unwrap();

        assert_eq!(reloaded.lexicon.entries, original.lexicon.entries);
        assert_eq!(reloaded.roles.len(), original.roles.len());
        assert_eq!(reloaded.tone.fillers, original.tone.fillers);
        assert_eq!(reloaded.tone.policy, original.tone.policy);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_file("/nonexistent/dpviet.toml").unwrap_err();
        assert!(matches!(err, DpVietError::Config(_)));
    }
}

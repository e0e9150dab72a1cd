// Rule-based dialogue rewriting
//
// Translation is simulated: dialogue is passed through a fixed sequence of
// substitution stages built from the configured tables:
// - Lexicon: phrase-to-phrase slang substitutions
// - Pronouns: speaker-conditioned pronoun and salutation rules
// - ToneEnding: sentence-final filler replacing terminal punctuation

pub mod phrase;
pub mod lexicon;
pub mod pronoun;
pub mod tone;
pub mod speaker;

use tracing::debug;

pub use lexicon::Lexicon;
pub use pronoun::{PronounProfile, RoleTable};
pub use speaker::{extract, DialogueLine};
pub use tone::{FillerSelector, ToneEndings};

use crate::config::Config;
use crate::error::Result;

/// One rewriting stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexicon,
    Pronouns,
    ToneEnding,
}

/// Stage order. Pronoun rules must see lexicon output so already-replaced
/// phrases are not re-matched, and the tone ending must see final punctuation.
pub const PIPELINE: [Stage; 3] = [Stage::Lexicon, Stage::Pronouns, Stage::ToneEnding];

/// Rewrites the body of a dialogue line
#[derive(Debug, Clone)]
pub struct DialogueRewriter {
    lexicon: Lexicon,
    roles: RoleTable,
    tone: ToneEndings,
}

impl DialogueRewriter {
    pub fn new(lexicon: Lexicon, roles: RoleTable, tone: ToneEndings) -> Self {
        Self { lexicon, roles, tone }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Lexicon::from_config(&config.lexicon)?,
            RoleTable::from_config(&config.roles)?,
            ToneEndings::from_config(&config.tone)?,
        ))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    pub fn tone(&self) -> &ToneEndings {
        &self.tone
    }

    /// Run `body` through every stage of [`PIPELINE`] in order
    pub fn rewrite_dialogue(
        &self,
        body: &str,
        speaker: Option<&str>,
        selector: &mut FillerSelector,
    ) -> String {
        PIPELINE.iter().fold(body.to_string(), |text, stage| {
            let next = self.run_stage(*stage, &text, speaker, selector);
            debug!("{:?}: {:?} -> {:?}", stage, text, next);
            next
        })
    }

    fn run_stage(
        &self,
        stage: Stage,
        text: &str,
        speaker: Option<&str>,
        selector: &mut FillerSelector,
    ) -> String {
        match stage {
            Stage::Lexicon => self.lexicon.apply(text),
            Stage::Pronouns => self.roles.apply(text, speaker),
            Stage::ToneEnding => self.tone.apply(text, selector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> DialogueRewriter {
        DialogueRewriter::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_lexicon_then_tone() {
        let rewriter = rewriter();
        let mut selector = rewriter.tone().selector();
        assert_eq!(
            rewriter.rewrite_dialogue("Let's go!", Some("Tyler"), &mut selector),
            "Chơi thôi luôn!"
        );
    }

    #[test]
    fn test_spouse_pronouns() {
        let rewriter = rewriter();
        let mut selector = rewriter.tone().selector();
        let out = rewriter.rewrite_dialogue("I think you are amazing", Some("Wife"), &mut selector);
        assert_eq!(out, "Em think Anh are tuyệt vời ông mặt trời luôn!");
    }

    #[test]
    fn test_lexicon_runs_before_pronouns() {
        let rewriter = rewriter();
        let mut selector = rewriter.tone().selector();
        // "Thank you" is consumed by the lexicon, so the "you" rule never sees it
        let out = rewriter.rewrite_dialogue("Thank you", Some("Wife"), &mut selector);
        assert_eq!(out, "Cảm ơn luôn!");
    }

    #[test]
    fn test_no_speaker_skips_pronouns() {
        let rewriter = rewriter();
        let mut selector = rewriter.tone().selector();
        assert_eq!(
            rewriter.rewrite_dialogue("I said go for it", None, &mut selector),
            "I said go for it luôn!"
        );
    }

    #[test]
    fn test_pipeline_order_is_fixed() {
        assert_eq!(PIPELINE, [Stage::Lexicon, Stage::Pronouns, Stage::ToneEnding]);
    }
}

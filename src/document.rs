use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::report::RewriteReport;
use crate::subtitle::{classify, split_line_ending};
use crate::translate::{extract, DialogueRewriter, FillerSelector};

/// Output of one document rewrite
#[derive(Debug, Clone)]
pub struct RewrittenDocument {
    pub text: String,
    pub report: RewriteReport,
}

/// Line-by-line document pipeline: classify, pass structural lines through,
/// rewrite dialogue, rejoin in the original order.
#[derive(Debug, Clone)]
pub struct DocumentRewriter {
    rewriter: DialogueRewriter,
}

impl DocumentRewriter {
    pub fn new(rewriter: DialogueRewriter) -> Self {
        Self { rewriter }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(DialogueRewriter::from_config(config)?))
    }

    pub fn rewriter(&self) -> &DialogueRewriter {
        &self.rewriter
    }

    /// Rewrite a document using a filler selector built from the tone policy
    pub fn rewrite_document(&self, raw_text: &str) -> String {
        self.rewrite(raw_text).text
    }

    pub fn rewrite(&self, raw_text: &str) -> RewrittenDocument {
        let mut selector = self.rewriter.tone().selector();
        self.rewrite_with(raw_text, &mut selector)
    }

    /// Rewrite with a caller-supplied selector. Every input line yields
    /// exactly one output line; a trailing `\r` is kept on its line.
    pub fn rewrite_with(&self, raw_text: &str, selector: &mut FillerSelector) -> RewrittenDocument {
        let mut report = RewriteReport::default();

        let lines: Vec<String> = raw_text
            .split('\n')
            .map(|line| {
                let (content, ending) = split_line_ending(line);
                let kind = classify(content);
                report.record(kind);

                if kind.is_structural() {
                    return line.to_string();
                }

                let dialogue = extract(content);
                let body = self.rewriter.rewrite_dialogue(dialogue.body, dialogue.speaker, selector);
                let rewritten = dialogue.reassemble(&body);
                report.record_dialogue(dialogue.speaker, rewritten != content);
                debug!("{} => {}", content, rewritten);

                format!("{}{}", rewritten, ending)
            })
            .collect();

        RewrittenDocument {
            text: lines.join("\n"),
            report,
        }
    }
}

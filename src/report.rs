use serde::Serialize;
use std::collections::BTreeMap;

use crate::subtitle::LineKind;

/// Per-document statistics collected while rewriting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    pub total_lines: usize,
    pub blank: usize,
    pub index: usize,
    pub timecode: usize,
    pub dialogue: usize,
    /// Dialogue lines whose text differs from the input
    pub changed: usize,
    /// Dialogue lines per speaker tag
    pub speakers: BTreeMap<String, usize>,
}

impl RewriteReport {
    pub fn record(&mut self, kind: LineKind) {
        self.total_lines += 1;
        match kind {
            LineKind::Blank => self.blank += 1,
            LineKind::Index => self.index += 1,
            LineKind::Timecode => self.timecode += 1,
            LineKind::Dialogue => self.dialogue += 1,
        }
    }

    pub fn record_dialogue(&mut self, speaker: Option<&str>, changed: bool) {
        if let Some(speaker) = speaker {
            *self.speakers.entry(speaker.to_string()).or_insert(0) += 1;
        }
        if changed {
            self.changed += 1;
        }
    }

    pub fn structural(&self) -> usize {
        self.blank + self.index + self.timecode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut report = RewriteReport::default();
        report.record(LineKind::Index);
        report.record(LineKind::Timecode);
        report.record(LineKind::Dialogue);
        report.record_dialogue(Some("Tyler"), true);
        report.record(LineKind::Dialogue);
        report.record_dialogue(Some("Tyler"), false);
        report.record(LineKind::Blank);

        assert_eq!(report.total_lines, 5);
        assert_eq!(report.structural(), 3);
        assert_eq!(report.dialogue, 2);
        assert_eq!(report.changed, 1);
        assert_eq!(report.speakers.get("Tyler"), Some(&2));
    }

    #[test]
    fn test_serializes_to_json() {
        let mut report = RewriteReport::default();
        report.record(LineKind::Dialogue);
        report.record_dialogue(Some("Wife"), true);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["dialogue"], 1);
        assert_eq!(json["speakers"]["Wife"], 1);
    }
}

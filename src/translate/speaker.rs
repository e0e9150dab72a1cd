use once_cell::sync::Lazy;
use regex::Regex;

static SPEAKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w+):\s*(.*)$").expect("speaker pattern is valid")
});

/// A dialogue line split into an optional `Speaker:` tag and its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueLine<'a> {
    pub speaker: Option<&'a str>,
    pub body: &'a str,
}

/// Split off a leading `Word:` speaker tag. Without one the whole line is the body.
pub fn extract(line: &str) -> DialogueLine<'_> {
    match SPEAKER_REGEX.captures(line) {
        Some(caps) => {
            let speaker = caps.get(1).map(|m| m.as_str());
            let body = caps.get(2).map_or("", |m| m.as_str().trim());
            DialogueLine { speaker, body }
        }
        None => DialogueLine { speaker: None, body: line },
    }
}

impl DialogueLine<'_> {
    /// Rebuild the line around a rewritten body
    pub fn reassemble(&self, rewritten_body: &str) -> String {
        match self.speaker {
            Some(speaker) => format!("{}: {}", speaker, rewritten_body),
            None => rewritten_body.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_speaker() {
        let line = extract("Tyler: Let's go!");
        assert_eq!(line.speaker, Some("Tyler"));
        assert_eq!(line.body, "Let's go!");

        let line = extract("Wife:I think you are amazing  ");
        assert_eq!(line.speaker, Some("Wife"));
        assert_eq!(line.body, "I think you are amazing");
    }

    #[test]
    fn test_no_speaker() {
        let line = extract("Go for it");
        assert_eq!(line.speaker, None);
        assert_eq!(line.body, "Go for it");

        // tag must start the line and be a single word
        assert_eq!(extract(" Tyler: hi").speaker, None);
        assert_eq!(extract("Mr Tyler: hi").speaker, None);
    }

    #[test]
    fn test_unicode_speaker_and_empty_body() {
        let line = extract("Đạt: Chào");
        assert_eq!(line.speaker, Some("Đạt"));

        let line = extract("Sparky:");
        assert_eq!(line.speaker, Some("Sparky"));
        assert_eq!(line.body, "");
        assert_eq!(line.reassemble(""), "Sparky: ");
    }

    #[test]
    fn test_reassemble() {
        assert_eq!(extract("Tyler:  hey").reassemble("chào"), "Tyler: chào");
        assert_eq!(extract("hey").reassemble("chào"), "chào");
    }
}

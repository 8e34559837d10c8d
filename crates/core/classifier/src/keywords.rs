use warden_models::v0::{Category, Evaluation, Severity, SpamSubtype};

use crate::AbstractClassifier;

/// Keyword matching stand-in used when the remote classifier is unavailable
///
/// Deliberately coarse: it only looks for category and spam type names
/// and for the word "serious" in the text itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn evaluate(text: &str) -> Evaluation {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();

        let has = |keyword: &str| words.iter().any(|word| *word == keyword);
        let has_hate_speech = words.windows(2).any(|pair| pair == ["hate", "speech"]);

        let category = if has("spam") {
            Category::Spam
        } else if has("violent") {
            Category::Violent
        } else if has("harassment") {
            Category::Harassment
        } else if has("nsfw") {
            Category::Nsfw
        } else if has_hate_speech {
            Category::HateSpeech
        } else if has("other") {
            Category::Other
        } else {
            return Evaluation::Unidentified;
        };

        let subtype = if category == Category::Spam {
            SpamSubtype::REPORTABLE
                .into_iter()
                .find(|subtype| has(subtype.token()))
        } else {
            None
        };

        let severity = if has("serious") {
            Severity::Serious
        } else {
            Severity::Minor
        };

        Evaluation::violation(category, subtype, severity)
    }
}

#[async_trait]
impl AbstractClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Evaluation {
        KeywordClassifier::evaluate(text)
    }
}

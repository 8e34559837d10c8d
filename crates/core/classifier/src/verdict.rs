use warden_models::v0::{Category, Evaluation, Severity, SpamSubtype};

/// Read the leading verdict token of a classifier response
///
/// Anything that is not flagged, or that has fewer than two `_`-delimited
/// segments, is read as no violation.
pub fn parse_verdict(response: &str) -> Evaluation {
    let token = response
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .to_lowercase();

    if token.starts_with("not") {
        return Evaluation::Unidentified;
    }

    let (category, rest) = match token.strip_prefix("hate_speech") {
        Some(rest) => (Some(Category::HateSpeech), rest.trim_start_matches('_')),
        None => match token.split_once('_') {
            Some((category, rest)) => (Category::from_input(category), rest),
            None => return Evaluation::Unidentified,
        },
    };

    let Some(category) = category else {
        return Evaluation::Unidentified;
    };

    let segments: Vec<&str> = rest.split('_').filter(|s| !s.is_empty()).collect();
    let (subtype, severity) = match (category, segments.as_slice()) {
        (Category::Spam, [subtype, severity]) => (SpamSubtype::from_input(subtype), *severity),
        (_, [severity]) => (None, *severity),
        _ => return Evaluation::Unidentified,
    };

    match Severity::from_input(severity) {
        Some(severity) => Evaluation::violation(category, subtype, severity),
        None => Evaluation::Unidentified,
    }
}

#[cfg(test)]
mod tests {
    use warden_models::v0::{Category, Evaluation, Severity, SpamSubtype};

    use super::parse_verdict;

    #[test]
    fn reads_category_and_severity() {
        assert_eq!(
            parse_verdict("harassment_minor"),
            Evaluation::violation(Category::Harassment, None, Severity::Minor)
        );
        assert_eq!(
            parse_verdict("hate_speech_serious\nbecause it targets a group"),
            Evaluation::violation(Category::HateSpeech, None, Severity::Serious)
        );
    }

    #[test]
    fn reads_spam_subtype() {
        assert_eq!(
            parse_verdict("`spam_invites_serious`"),
            Evaluation::violation(Category::Spam, Some(SpamSubtype::Invites), Severity::Serious)
        );
        assert_eq!(
            parse_verdict("spam_minor"),
            Evaluation::violation(Category::Spam, None, Severity::Minor)
        );
    }

    #[test]
    fn not_flagged_and_malformed_are_unidentified() {
        for response in ["not_flagged", "not flagged", "", "spam", "harassment_", "weird_minor", "spam_links_huge"] {
            assert_eq!(parse_verdict(response), Evaluation::Unidentified, "{response:?}");
        }
    }
}

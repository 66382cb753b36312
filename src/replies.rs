//! Canned keyword responses for free-form text messages.
//!
//! Each rule is checked independently: a rule matches when any of its
//! keywords appears as a substring of the lowercased input, and the first
//! matching rule wins.

/// Ordered rule table: (keywords, response).
const RULES: &[(&[&str], &str)] = &[
    (&["hello", "hi"], "Hi there!"),
    (&["how are you"], "I am fine, what about you?"),
    (&["i love you"], "Aww... I love you too!"),
];

/// Response for text no rule matches.
const FALLBACK: &str = "I don't understand what you said.";

/// Pick the canned response for a free-form text message.
pub fn reply_to(text: &str) -> &'static str {
    let normalized = text.to_lowercase();

    for (keywords, response) in RULES {
        if keywords.iter().any(|keyword| normalized.contains(keyword)) {
            return response;
        }
    }

    FALLBACK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greets_on_any_greeting_keyword() {
        assert_eq!(reply_to("hello over there"), "Hi there!");
        assert_eq!(reply_to("oh hi!"), "Hi there!");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(reply_to("HOW ARE YOU?"), "I am fine, what about you?");
    }

    #[test]
    fn rules_match_independently_of_the_first_rule() {
        assert_eq!(reply_to("how are you"), "I am fine, what about you?");
        assert_eq!(reply_to("i love you"), "Aww... I love you too!");
    }

    #[test]
    fn keywords_match_as_substrings() {
        // "this" contains "hi"; substring containment is the contract.
        assert_eq!(reply_to("this is fine"), "Hi there!");
    }

    #[test]
    fn unmatched_text_gets_the_fallback() {
        assert_eq!(reply_to("what time do you open"), FALLBACK);
        assert_eq!(reply_to(""), FALLBACK);
    }
}

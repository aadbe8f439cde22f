//! Search filtering for the history list.

use super::model::Conversation;

/// Returns true when `conversation` matches the search `query`.
///
/// Matching is a case-insensitive substring test against the title and the
/// content of every message. A blank query matches everything.
pub fn matches(conversation: &Conversation, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    conversation.title.to_lowercase().contains(&needle)
        || conversation
            .messages
            .iter()
            .any(|m| m.content.to_lowercase().contains(&needle))
}

/// Filters `conversations` down to those matching `query`, preserving order.
pub fn filter<'a>(conversations: &'a [Conversation], query: &str) -> Vec<&'a Conversation> {
    conversations.iter().filter(|c| matches(c, query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Message;

    fn sample() -> Vec<Conversation> {
        vec![
            Conversation::new("1", "Rust lifetimes", vec![Message::user("what is 'a?")]),
            Conversation::new("2", "Dinner plans", vec![Message::assistant("Try RUST-colored pasta")]),
            Conversation::new("3", "Travel", vec![Message::user("Tokyo in May")]),
        ]
    }

    #[test]
    fn test_blank_query_matches_all() {
        let list = sample();
        assert_eq!(filter(&list, "   ").len(), 3);
    }

    #[test]
    fn test_matches_title_and_content_case_insensitive() {
        let list = sample();
        let ids: Vec<&str> = filter(&list, "rust").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_no_match() {
        let list = sample();
        assert!(filter(&list, "kyoto").is_empty());
    }
}

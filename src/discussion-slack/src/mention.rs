//! GitHub login to Slack member mapping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Maps GitHub logins to Slack member IDs.
///
/// Decoded from a flat JSON object such as `{"octocat": "U024BE7LH"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MentionMap(HashMap<String, String>);

impl MentionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, login: impl Into<String>, member_id: impl Into<String>) {
        self.0.insert(login.into(), member_id.into());
    }

    pub fn get(&self, login: &str) -> Option<&str> {
        self.0.get(login).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries ordered longest login first, then lexicographically.
    fn rewrite_order(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .0
            .iter()
            .map(|(login, id)| (login.as_str(), id.as_str()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        entries
    }
}

impl<K, V> FromIterator<(K, V)> for MentionMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Replace every `@login` in `text` with Slack's `<@MEMBER_ID>` token.
///
/// Longer logins are rewritten first so that `@alice` wins over `@al`.
/// Logins missing from the map are left untouched.
pub fn rewrite_mentions(text: &str, mentions: &MentionMap) -> String {
    let mut text = text.to_string();
    for (login, member_id) in mentions.rewrite_order() {
        text = text.replace(&format!("@{}", login), &format!("<@{}>", member_id));
    }
    text
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_rewrite_single_mention() {
        let map = MentionMap::from_iter([("alice", "U123")]);
        assert_eq!(rewrite_mentions("Thanks @alice", &map), "Thanks <@U123>");
    }

    #[test]
    fn test_rewrite_every_occurrence() {
        let map = MentionMap::from_iter([("alice", "U1"), ("bob", "U2")]);
        assert_eq!(
            rewrite_mentions("@alice and @bob, then @alice again", &map),
            "<@U1> and <@U2>, then <@U1> again"
        );
    }

    #[test]
    fn test_rewrite_with_inserted_entries() {
        let mut map = MentionMap::new();
        map.insert("alice", "U1");
        map.insert("carol", "U3");
        assert_eq!(
            rewrite_mentions("@bob thanks @alice and @carol", &map),
            "@bob thanks <@U1> and <@U3>"
        );
    }

    #[test]
    fn test_unmapped_login_kept() {
        let map = MentionMap::from_iter([("alice", "U1")]);
        assert_eq!(rewrite_mentions("cc @carol", &map), "cc @carol");
    }

    #[test]
    fn test_empty_map_is_identity() {
        let map = MentionMap::new();
        for text in ["", "plain", "@alice <@U1> @@", "multi\nline @x"] {
            assert_eq!(rewrite_mentions(text, &map), text);
        }
    }

    #[test]
    fn test_longest_login_wins() {
        let map = MentionMap::from_iter([("al", "U_AL"), ("alice", "U_ALICE")]);
        assert_eq!(
            rewrite_mentions("@alice meets @al", &map),
            "<@U_ALICE> meets <@U_AL>"
        );
    }

    #[test]
    fn test_rewrite_is_idempotent_when_tokens_hold_no_logins() {
        let map = MentionMap::from_iter([("alice", "U1"), ("bob", "U2")]);
        let once = rewrite_mentions("@alice pinged @bob", &map);
        assert_eq!(rewrite_mentions(&once, &map), once);
    }

    #[test]
    fn test_rewrite_not_idempotent_when_token_holds_login() {
        // "<@U_LONGER>" contains "@U_LONGER", which is itself a login here.
        let map = MentionMap::from_iter([("al", "U_LONGER"), ("U_LONGER", "U9")]);
        let once = rewrite_mentions("@al", &map);
        assert_eq!(once, "<@U_LONGER>");
        assert_eq!(rewrite_mentions(&once, &map), "<<@U9>>");
    }

    #[test]
    fn test_mention_map_from_json() {
        let map: MentionMap =
            serde_json::from_str(r#"{"alice": "U1", "bob": "U2"}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("alice"), Some("U1"));
        assert_eq!(map.get("carol"), None);

        assert!(serde_json::from_str::<MentionMap>(r#"{"alice": 1}"#).is_err());
        assert!(serde_json::from_str::<MentionMap>(r#"["alice"]"#).is_err());
    }
}

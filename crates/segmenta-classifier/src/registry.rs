//! In-memory keyword set with normalization and uniqueness enforcement.
//!
//! Backs the mock backend and any caller that needs the keyword invariants
//! locally: text is stored normalized, no duplicate text under one
//! persona, and one owner persona per text under the default policy.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use segmenta_core::normalize::normalize_title;
use segmenta_core::{defaults, BulkAddOutcome, Error, Keyword, Result};

/// What happens when a keyword is added that another persona already owns.
///
/// The backend contract here is not observable from the console alone, so
/// the policy stays configurable: `Move` reassigns the keyword to the new
/// persona (counted as `replaced`), `Reject` refuses the add.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplacePolicy {
    #[default]
    Move,
    Reject,
}

/// Result of a single keyword insertion.
#[derive(Debug, Clone)]
pub struct InsertOutcome {
    pub keyword: Keyword,
    /// True when the keyword was moved from another persona.
    pub replaced: bool,
}

/// Keyword collection enforcing the normalization and uniqueness
/// invariants of the persona classifier.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    policy: ReplacePolicy,
    by_id: HashMap<Uuid, Keyword>,
}

impl KeywordSet {
    /// Create an empty set with the default (`Move`) replace policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with an explicit replace policy.
    pub fn with_policy(policy: ReplacePolicy) -> Self {
        Self {
            policy,
            by_id: HashMap::new(),
        }
    }

    /// Seed from existing keywords (normalizing each one).
    pub fn from_keywords(keywords: Vec<Keyword>, policy: ReplacePolicy) -> Self {
        let mut set = Self::with_policy(policy);
        for kw in keywords {
            // Seeding tolerates duplicates; last write wins.
            let _ = set.insert(&kw.text, kw.persona_id);
        }
        set
    }

    /// Number of keywords in the set.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True when no keywords are present.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// All keywords, sorted by text for stable listings.
    pub fn keywords(&self) -> Vec<Keyword> {
        let mut all: Vec<Keyword> = self.by_id.values().cloned().collect();
        all.sort_by(|a, b| a.text.cmp(&b.text).then(a.id.cmp(&b.id)));
        all
    }

    /// Keywords assigned to one persona, sorted by text.
    pub fn keywords_for(&self, persona_id: Uuid) -> Vec<Keyword> {
        let mut subset: Vec<Keyword> = self
            .by_id
            .values()
            .filter(|k| k.persona_id == persona_id)
            .cloned()
            .collect();
        subset.sort_by(|a, b| a.text.cmp(&b.text));
        subset
    }

    /// Look up a keyword by id.
    pub fn get(&self, keyword_id: Uuid) -> Option<&Keyword> {
        self.by_id.get(&keyword_id)
    }

    /// Current owner of a normalized text, if any.
    pub fn owner_of(&self, normalized_text: &str) -> Option<&Keyword> {
        self.by_id.values().find(|k| k.text == normalized_text)
    }

    /// Insert one keyword for a persona.
    ///
    /// The text is normalized first. An empty result is a `Validation`
    /// error; an identical text under the same persona is a `Duplicate`;
    /// a text owned by another persona follows the replace policy.
    pub fn insert(&mut self, raw_text: &str, persona_id: Uuid) -> Result<InsertOutcome> {
        let text = normalize_title(raw_text);
        if text.is_empty() {
            return Err(Error::Validation("keyword is empty".to_string()));
        }

        if let Some((existing_id, existing_persona)) =
            self.owner_of(&text).map(|k| (k.id, k.persona_id))
        {
            if existing_persona == persona_id {
                return Err(Error::Duplicate(format!(
                    "keyword {text:?} already exists for this persona"
                )));
            }
            match self.policy {
                ReplacePolicy::Move => {
                    let moved = Keyword {
                        id: existing_id,
                        text: text.clone(),
                        persona_id,
                    };
                    self.by_id.insert(existing_id, moved.clone());
                    debug!(keyword = %text, "Keyword moved to new persona");
                    return Ok(InsertOutcome {
                        keyword: moved,
                        replaced: true,
                    });
                }
                ReplacePolicy::Reject => {
                    return Err(Error::Duplicate(format!(
                        "keyword {text:?} is already assigned to another persona"
                    )));
                }
            }
        }

        let keyword = Keyword {
            id: Uuid::new_v4(),
            text,
            persona_id,
        };
        self.by_id.insert(keyword.id, keyword.clone());
        Ok(InsertOutcome {
            keyword,
            replaced: false,
        })
    }

    /// Split a raw blob on comma/semicolon/newline, normalize each piece,
    /// and insert the batch. Duplicates (within the target persona or the
    /// batch itself) are skipped, moves count as replaced, and empty
    /// fragments are dropped silently.
    pub fn insert_bulk(&mut self, raw: &str, persona_id: Uuid) -> BulkAddOutcome {
        let mut outcome = BulkAddOutcome::default();

        for piece in raw.split(&defaults::BULK_KEYWORD_SEPARATORS[..]) {
            let text = normalize_title(piece);
            if text.is_empty() {
                continue;
            }
            match self.insert(&text, persona_id) {
                Ok(inserted) if inserted.replaced => outcome.replaced += 1,
                Ok(_) => outcome.created += 1,
                Err(Error::Duplicate(_)) => outcome.skipped += 1,
                // Normalized-empty was filtered above; anything else here
                // is unreachable for in-memory inserts.
                Err(_) => outcome.skipped += 1,
            }
        }

        debug!(
            created = outcome.created,
            skipped = outcome.skipped,
            replaced = outcome.replaced,
            "Bulk keyword add"
        );
        outcome
    }

    /// Remove a keyword by id. Removing an unknown id succeeds; the
    /// already-gone state is the desired one.
    pub fn remove(&mut self, keyword_id: Uuid) -> bool {
        self.by_id.remove(&keyword_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_normalizes_text() {
        let mut set = KeywordSet::new();
        let persona = Uuid::new_v4();
        let outcome = set.insert("  Director DE Marketing!  ", persona).unwrap();
        assert_eq!(outcome.keyword.text, "director de marketing");
        assert!(!outcome.replaced);
    }

    #[test]
    fn test_insert_rejects_empty_keyword() {
        let mut set = KeywordSet::new();
        let err = set.insert("   ", Uuid::new_v4());
        assert!(matches!(err, Err(Error::Validation(_))));
        let err = set.insert("?!.", Uuid::new_v4());
        assert!(matches!(err, Err(Error::Validation(_))));
    }

    #[test]
    fn test_insert_duplicate_same_persona_rejected() {
        let mut set = KeywordSet::new();
        let persona = Uuid::new_v4();
        set.insert("cmo", persona).unwrap();
        let err = set.insert("CMO", persona);
        assert!(matches!(err, Err(Error::Duplicate(_))));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insert_move_policy_reassigns_owner() {
        let mut set = KeywordSet::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let original = set.insert("cmo", first).unwrap();

        let moved = set.insert("cmo", second).unwrap();
        assert!(moved.replaced);
        assert_eq!(moved.keyword.id, original.keyword.id);
        assert_eq!(moved.keyword.persona_id, second);
        assert_eq!(set.len(), 1);
        assert!(set.keywords_for(first).is_empty());
    }

    #[test]
    fn test_insert_reject_policy_refuses_cross_persona_add() {
        let mut set = KeywordSet::with_policy(ReplacePolicy::Reject);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        set.insert("cmo", first).unwrap();

        let err = set.insert("cmo", second);
        assert!(matches!(err, Err(Error::Duplicate(_))));
        assert_eq!(set.owner_of("cmo").unwrap().persona_id, first);
    }

    #[test]
    fn test_no_duplicate_normalized_text_under_one_persona() {
        let mut set = KeywordSet::new();
        let persona = Uuid::new_v4();
        set.insert("Head of Marketing", persona).unwrap();
        let _ = set.insert("head of marketing!", persona);
        let _ = set.insert("HEAD OF MARKETING", persona);

        let texts: Vec<String> = set
            .keywords_for(persona)
            .into_iter()
            .map(|k| k.text)
            .collect();
        assert_eq!(texts, vec!["head of marketing".to_string()]);
    }

    #[test]
    fn test_bulk_add_counts_duplicates() {
        let mut set = KeywordSet::new();
        let persona = Uuid::new_v4();

        let outcome = set.insert_bulk("CMO; CMO; Head of Marketing", persona);
        assert_eq!(outcome.created, 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.replaced, 0);
    }

    #[test]
    fn test_bulk_add_splits_on_all_separators() {
        let mut set = KeywordSet::new();
        let persona = Uuid::new_v4();

        let outcome = set.insert_bulk("cmo, cfo; cto\nceo", persona);
        assert_eq!(outcome.created, 4);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_bulk_add_drops_empty_fragments() {
        let mut set = KeywordSet::new();
        let persona = Uuid::new_v4();

        let outcome = set.insert_bulk("cmo;; ,\n cfo", persona);
        assert_eq!(outcome.created, 2);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_bulk_add_counts_moves_as_replaced() {
        let mut set = KeywordSet::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        set.insert("cmo", first).unwrap();

        let outcome = set.insert_bulk("cmo, vp marketing", second);
        assert_eq!(outcome.created, 1);
        assert_eq!(outcome.replaced, 1);
        assert_eq!(set.owner_of("cmo").unwrap().persona_id, second);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut set = KeywordSet::new();
        let persona = Uuid::new_v4();
        let outcome = set.insert("cmo", persona).unwrap();

        assert!(set.remove(outcome.keyword.id));
        assert!(!set.remove(outcome.keyword.id));
        assert!(!set.remove(Uuid::new_v4()));
        assert!(set.is_empty());
    }

    #[test]
    fn test_keywords_sorted_for_stable_listing() {
        let mut set = KeywordSet::new();
        let persona = Uuid::new_v4();
        set.insert("zeta", persona).unwrap();
        set.insert("alfa", persona).unwrap();
        set.insert("mango", persona).unwrap();

        let texts: Vec<String> = set.keywords().into_iter().map(|k| k.text).collect();
        assert_eq!(texts, vec!["alfa", "mango", "zeta"]);
    }
}

//! Priority-ordered keyword matching engine.
//!
//! The engine holds a validated persona set and a normalized keyword list
//! and classifies job titles against them: every keyword whose normalized
//! text is a substring of the normalized input matches, and the persona
//! with the numerically lowest priority among the matches wins. An input
//! matching no keyword falls through to the catch-all persona.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use segmenta_core::normalize::{contains_keyword, normalize_title};
use segmenta_core::{ClassificationResult, Error, Keyword, KeywordMatch, Persona, Result};

/// Immutable classification engine over one persona/keyword snapshot.
///
/// Construction validates the persona set invariants; classification is a
/// pure function of the snapshot, so repeated calls with the same input
/// always produce the same result.
pub struct ClassifierEngine {
    personas: HashMap<Uuid, Persona>,
    keywords: Vec<Keyword>,
    catch_all_id: Uuid,
}

impl ClassifierEngine {
    /// Build an engine from a persona set and keyword list.
    ///
    /// Validates that exactly one persona is the catch-all and that
    /// priorities are unique among non-catch-all personas. Keyword text is
    /// normalized on ingestion; keywords referencing unknown personas are
    /// rejected.
    pub fn new(personas: Vec<Persona>, keywords: Vec<Keyword>) -> Result<Self> {
        let catch_alls: Vec<&Persona> = personas.iter().filter(|p| p.is_catch_all).collect();
        let catch_all_id = match catch_alls.as_slice() {
            [single] => single.id,
            [] => {
                return Err(Error::Validation(
                    "persona set has no catch-all persona".to_string(),
                ))
            }
            _ => {
                return Err(Error::Validation(format!(
                    "persona set has {} catch-all personas, expected exactly one",
                    catch_alls.len()
                )))
            }
        };

        let mut seen_priorities: HashMap<i32, Uuid> = HashMap::new();
        for persona in personas.iter().filter(|p| !p.is_catch_all) {
            if let Some(existing) = seen_priorities.insert(persona.priority, persona.id) {
                return Err(Error::Validation(format!(
                    "personas {} and {} share priority {}",
                    existing, persona.id, persona.priority
                )));
            }
        }

        let persona_index: HashMap<Uuid, Persona> =
            personas.into_iter().map(|p| (p.id, p)).collect();

        let mut normalized = Vec::with_capacity(keywords.len());
        for mut keyword in keywords {
            if !persona_index.contains_key(&keyword.persona_id) {
                return Err(Error::Validation(format!(
                    "keyword {:?} references unknown persona {}",
                    keyword.text, keyword.persona_id
                )));
            }
            keyword.text = normalize_title(&keyword.text);
            normalized.push(keyword);
        }

        Ok(Self {
            personas: persona_index,
            keywords: normalized,
            catch_all_id,
        })
    }

    /// The catch-all persona id.
    pub fn catch_all_id(&self) -> Uuid {
        self.catch_all_id
    }

    /// Number of keywords in the snapshot.
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    /// Classify one raw job title.
    ///
    /// Returns the normalized input, every matching keyword annotated with
    /// its persona's priority, and the winning persona. When nothing
    /// matches, the catch-all wins and `is_default` is set.
    pub fn classify(&self, raw: &str) -> ClassificationResult {
        let normalized_input = normalize_title(raw);

        let mut matches: Vec<KeywordMatch> = self
            .keywords
            .iter()
            .filter(|k| contains_keyword(&normalized_input, &k.text))
            .map(|k| {
                let persona = &self.personas[&k.persona_id];
                KeywordMatch {
                    keyword: k.text.clone(),
                    persona_id: k.persona_id,
                    priority: persona.priority,
                }
            })
            .collect();

        // Display order: best priority first, catch-all keywords after
        // real ones, then alphabetical for a stable listing.
        matches.sort_by(|a, b| {
            self.effective(a.persona_id, a.priority)
                .cmp(&self.effective(b.persona_id, b.priority))
                .then_with(|| a.persona_id.cmp(&b.persona_id))
                .then_with(|| a.keyword.cmp(&b.keyword))
        });

        let winner = matches
            .iter()
            .min_by_key(|m| (self.effective(m.persona_id, m.priority), m.persona_id));

        let (winning_persona_id, is_default) = match winner {
            Some(best) => {
                let tied = matches.iter().any(|m| {
                    m.persona_id != best.persona_id
                        && self.effective(m.persona_id, m.priority)
                            == self.effective(best.persona_id, best.priority)
                });
                if tied {
                    warn!(
                        priority = best.priority,
                        "multiple personas tied on priority; winner chosen by persona id"
                    );
                }
                (best.persona_id, false)
            }
            None => (self.catch_all_id, true),
        };

        debug!(
            keyword_count = self.keywords.len(),
            match_count = matches.len(),
            is_default,
            "Classified input"
        );

        ClassificationResult {
            normalized_input,
            matches,
            winning_persona_id,
            is_default,
        }
    }

    fn effective(&self, persona_id: Uuid, priority: i32) -> i64 {
        if self.personas[&persona_id].is_catch_all {
            i64::MAX
        } else {
            priority as i64
        }
    }
}

//! Keyword registry service.
//!
//! Console-side operations over keyword→persona assignments: listing
//! grouped by persona in priority order, single and bulk adds with
//! validation before any network call, idempotent deletion, and the
//! synchronous scoped reclassification passes.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use segmenta_core::normalize::normalize_title;
use segmenta_core::{
    sort_personas, AddKeywordRequest, BulkAddKeywordsRequest, BulkAddOutcome, ClassifierApi,
    Error, Keyword, Persona, Result, ScopedReclassifyOutcome,
};

/// One persona's keywords, for the grouped listing.
#[derive(Debug, Clone)]
pub struct PersonaKeywords {
    pub persona: Persona,
    pub keywords: Vec<Keyword>,
}

/// Console-side keyword registry over a backend.
pub struct KeywordRegistry {
    api: Arc<dyn ClassifierApi>,
}

impl KeywordRegistry {
    pub fn new(api: Arc<dyn ClassifierApi>) -> Self {
        Self { api }
    }

    /// Fetch keywords grouped by persona, personas in priority order with
    /// the catch-all last. Personas without keywords are included so the
    /// view can offer them as add targets.
    pub async fn list_grouped(&self) -> Result<Vec<PersonaKeywords>> {
        let mut personas = self.api.list_personas().await?;
        let keywords = self.api.list_keywords().await?;
        sort_personas(&mut personas);

        let groups = personas
            .into_iter()
            .map(|persona| {
                let mut owned: Vec<Keyword> = keywords
                    .iter()
                    .filter(|k| k.persona_id == persona.id)
                    .cloned()
                    .collect();
                owned.sort_by(|a, b| a.text.cmp(&b.text));
                PersonaKeywords {
                    persona,
                    keywords: owned,
                }
            })
            .collect();
        Ok(groups)
    }

    /// Add one keyword to a persona.
    ///
    /// Normalizes before submission; an input that normalizes to nothing
    /// is rejected with `Validation` before any network call. A backend
    /// 409 arrives as `Duplicate` with its specific message.
    pub async fn add_keyword(&self, raw_text: &str, persona: &Persona) -> Result<Keyword> {
        let text = normalize_title(raw_text);
        if text.is_empty() {
            return Err(Error::Validation("keyword is empty".to_string()));
        }

        let keyword = self
            .api
            .add_keyword(AddKeywordRequest {
                keyword: text,
                persona_id: persona.id,
                persona_name: persona.display_name.clone(),
            })
            .await?;
        info!(keyword_id = %keyword.id, persona_id = %persona.id, "Keyword added");
        Ok(keyword)
    }

    /// Preview how a bulk blob will split, without submitting anything.
    /// Mirrors the backend's separators so the count shown before
    /// submission matches what the batch will contain.
    pub fn preview_bulk(raw: &str) -> Vec<String> {
        raw.split(&segmenta_core::defaults::BULK_KEYWORD_SEPARATORS[..])
            .map(normalize_title)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Submit a bulk keyword blob as one batch request.
    pub async fn bulk_add(&self, raw: &str, persona: &Persona) -> Result<BulkAddOutcome> {
        if Self::preview_bulk(raw).is_empty() {
            return Err(Error::Validation(
                "no keywords found in input".to_string(),
            ));
        }

        let outcome = self
            .api
            .bulk_add_keywords(BulkAddKeywordsRequest {
                keywords: raw.to_string(),
                persona_id: persona.id,
                persona_name: persona.display_name.clone(),
            })
            .await?;
        info!(
            created = outcome.created,
            skipped = outcome.skipped,
            replaced = outcome.replaced,
            persona_id = %persona.id,
            "Bulk keyword add complete"
        );
        Ok(outcome)
    }

    /// Delete a keyword. The already-gone state is acceptable, so an
    /// unknown id is not an error.
    pub async fn delete_keyword(&self, keyword_id: Uuid) -> Result<()> {
        match self.api.delete_keyword(keyword_id).await {
            Ok(()) => Ok(()),
            Err(Error::NotFound(_)) => {
                debug!(keyword_id = %keyword_id, "Keyword already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Synchronous reclassification pass scoped to one keyword.
    pub async fn reclassify_by_keyword(&self, keyword_id: Uuid) -> Result<ScopedReclassifyOutcome> {
        let outcome = self.api.reclassify_by_keyword(keyword_id).await?;
        info!(
            keyword_id = %keyword_id,
            matched = outcome.matched,
            updated = outcome.updated,
            "Keyword-scoped reclassification complete"
        );
        Ok(outcome)
    }

    /// Synchronous reclassification pass scoped to one persona.
    pub async fn reclassify_by_persona(&self, persona_id: Uuid) -> Result<ScopedReclassifyOutcome> {
        let outcome = self.api.reclassify_by_persona(persona_id).await?;
        info!(
            persona_id = %persona_id,
            matched = outcome.matched,
            updated = outcome.updated,
            "Persona-scoped reclassification complete"
        );
        Ok(outcome)
    }
}

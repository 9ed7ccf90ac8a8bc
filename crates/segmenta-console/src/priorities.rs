//! Priority board: optimistic persona reordering with rollback.
//!
//! Reordering is a two-phase operation: the tentative order is applied
//! locally, the full list goes to the backend in one atomic PUT, and the
//! local state commits on acknowledgment or rolls back to the last
//! known-good order on failure. Saves are serialized — a second reorder
//! while one is in flight is rejected so ranks are never computed against
//! a stale base.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use uuid::Uuid;

use segmenta_classifier::PersonaOrder;
use segmenta_core::{ClassifierApi, Error, PriorityEntry, Result};

/// Console-side persona priority board.
pub struct PriorityBoard {
    api: Arc<dyn ClassifierApi>,
    order: Mutex<PersonaOrder>,
    saving: AtomicBool,
}

impl PriorityBoard {
    /// Load the current persona set and build the board.
    pub async fn load(api: Arc<dyn ClassifierApi>) -> Result<Self> {
        let personas = api.list_personas().await?;
        let order = PersonaOrder::from_personas(&personas);
        Ok(Self {
            api,
            order: Mutex::new(order),
            saving: AtomicBool::new(false),
        })
    }

    /// Current order snapshot.
    pub fn order(&self) -> PersonaOrder {
        self.order.lock().unwrap().clone()
    }

    /// Current priority payload.
    pub fn entries(&self) -> Vec<PriorityEntry> {
        self.order.lock().unwrap().entries()
    }

    /// True while a save is in flight (the control should be disabled).
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// Move a persona to a 1-based rank and persist the full list.
    ///
    /// Local validation (range, catch-all, unknown persona) fails before
    /// any network call. On backend failure the previous order is
    /// restored and the error is returned for notice conversion.
    pub async fn reorder(&self, persona_id: Uuid, rank: usize) -> Result<()> {
        if self.saving.swap(true, Ordering::SeqCst) {
            return Err(Error::Validation(
                "a priority save is already in flight".to_string(),
            ));
        }
        // Everything below must clear the flag on its way out.
        let result = self.reorder_inner(persona_id, rank).await;
        self.saving.store(false, Ordering::SeqCst);
        result
    }

    async fn reorder_inner(&self, persona_id: Uuid, rank: usize) -> Result<()> {
        // Phase one: tentative local apply.
        let (prior, entries) = {
            let mut order = self.order.lock().unwrap();
            let prior = order.clone();
            order.set_rank(persona_id, rank)?;
            (prior, order.entries())
        };

        // Phase two: atomic save, then commit or roll back.
        match self.api.put_priorities(&entries).await {
            Ok(()) => {
                info!(persona_id = %persona_id, rank, "Persona priorities saved");
                Ok(())
            }
            Err(e) => {
                warn!(persona_id = %persona_id, error = %e, "Priority save failed; restoring previous order");
                *self.order.lock().unwrap() = prior;
                Err(e)
            }
        }
    }
}

//! Persona priority ordering.
//!
//! Drag-and-drop reordering in the console reduces to the pure function
//! [`reorder`] plus rank bookkeeping in [`PersonaOrder`]. The catch-all
//! persona is pinned after the reorderable set and never accepts a rank;
//! priorities are renumbered 1..n on every mutation so ties are
//! unrepresentable.

use uuid::Uuid;

use segmenta_core::{Error, Persona, PriorityEntry, Result};

/// Move one element of a list from `from_index` to `to_index`.
///
/// Out-of-range `from_index` leaves the list unchanged; `to_index` is
/// clamped to the end. Pure, so it is testable independently of any
/// pointer-event plumbing.
pub fn reorder<T>(mut list: Vec<T>, from_index: usize, to_index: usize) -> Vec<T> {
    if from_index >= list.len() {
        return list;
    }
    let item = list.remove(from_index);
    let target = to_index.min(list.len());
    list.insert(target, item);
    list
}

/// Ordered view of a persona set: the non-catch-all personas in rank
/// order, with the catch-all pinned last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaOrder {
    ordered: Vec<Uuid>,
    catch_all: Option<Uuid>,
}

impl PersonaOrder {
    /// Build from a persona list, sorting by stored priority. The
    /// catch-all is extracted regardless of its stored priority value.
    pub fn from_personas(personas: &[Persona]) -> Self {
        let catch_all = personas.iter().find(|p| p.is_catch_all).map(|p| p.id);
        let mut regular: Vec<&Persona> = personas.iter().filter(|p| !p.is_catch_all).collect();
        regular.sort_by_key(|p| (p.priority, p.id));
        Self {
            ordered: regular.into_iter().map(|p| p.id).collect(),
            catch_all,
        }
    }

    /// Ranked persona ids, catch-all excluded.
    pub fn ranked(&self) -> &[Uuid] {
        &self.ordered
    }

    /// The catch-all persona id, if the set has one.
    pub fn catch_all(&self) -> Option<Uuid> {
        self.catch_all
    }

    /// Number of reorderable (non-catch-all) personas.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// True when no reorderable personas exist.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Current 1-based rank of a persona, if it is reorderable.
    pub fn rank_of(&self, persona_id: Uuid) -> Option<usize> {
        self.ordered.iter().position(|id| *id == persona_id).map(|i| i + 1)
    }

    /// Move a persona to a 1-based rank, shifting intervening personas.
    ///
    /// Rejects rank < 1 or > count of non-catch-all personas, unknown
    /// personas, and any attempt to rank the catch-all. Idempotent:
    /// repeating the same target rank yields the same order.
    pub fn set_rank(&mut self, persona_id: Uuid, rank: usize) -> Result<()> {
        if Some(persona_id) == self.catch_all {
            return Err(Error::Validation(
                "the catch-all persona cannot be reordered".to_string(),
            ));
        }
        if rank < 1 || rank > self.ordered.len() {
            return Err(Error::Validation(format!(
                "rank {rank} out of range 1..={}",
                self.ordered.len()
            )));
        }
        let from = self
            .ordered
            .iter()
            .position(|id| *id == persona_id)
            .ok_or_else(|| Error::NotFound(format!("persona {persona_id}")))?;

        self.ordered = reorder(std::mem::take(&mut self.ordered), from, rank - 1);
        Ok(())
    }

    /// Full priority payload for the atomic save: reorderable personas
    /// renumbered 1..n, catch-all appended after them.
    pub fn entries(&self) -> Vec<PriorityEntry> {
        let mut entries: Vec<PriorityEntry> = self
            .ordered
            .iter()
            .enumerate()
            .map(|(index, id)| PriorityEntry {
                persona_id: *id,
                priority: (index + 1) as i32,
            })
            .collect();
        if let Some(catch_all) = self.catch_all {
            entries.push(PriorityEntry {
                persona_id: catch_all,
                priority: (self.ordered.len() + 1) as i32,
            });
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona(name: &str, priority: i32, is_catch_all: bool) -> Persona {
        Persona {
            id: Uuid::new_v4(),
            display_name: name.to_string(),
            priority,
            is_catch_all,
        }
    }

    fn fixture() -> (Vec<Persona>, PersonaOrder) {
        let personas = vec![
            persona("Marketing", 1, false),
            persona("Sales", 2, false),
            persona("Ops", 3, false),
            persona("Mateo", 99, true),
        ];
        let order = PersonaOrder::from_personas(&personas);
        (personas, order)
    }

    #[test]
    fn test_reorder_moves_forward() {
        assert_eq!(reorder(vec![1, 2, 3, 4], 0, 2), vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_reorder_moves_backward() {
        assert_eq!(reorder(vec![1, 2, 3, 4], 3, 0), vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_reorder_same_position_is_noop() {
        assert_eq!(reorder(vec![1, 2, 3], 1, 1), vec![1, 2, 3]);
    }

    #[test]
    fn test_reorder_out_of_range_from_is_noop() {
        assert_eq!(reorder(vec![1, 2, 3], 7, 0), vec![1, 2, 3]);
    }

    #[test]
    fn test_reorder_clamps_to_index() {
        assert_eq!(reorder(vec![1, 2, 3], 0, 99), vec![2, 3, 1]);
    }

    #[test]
    fn test_from_personas_sorts_by_priority() {
        let a = persona("A", 3, false);
        let b = persona("B", 1, false);
        let c = persona("C", 2, false);
        let order = PersonaOrder::from_personas(&[a.clone(), b.clone(), c.clone()]);
        assert_eq!(order.ranked(), &[b.id, c.id, a.id]);
        assert_eq!(order.catch_all(), None);
    }

    #[test]
    fn test_catch_all_excluded_from_ranked_set() {
        let (personas, order) = fixture();
        assert_eq!(order.len(), 3);
        assert_eq!(order.catch_all(), Some(personas[3].id));
        assert!(order.rank_of(personas[3].id).is_none());
    }

    #[test]
    fn test_catch_all_last_even_with_best_stored_priority() {
        let catch_all = persona("Mateo", 0, true);
        let mkt = persona("Marketing", 5, false);
        let order = PersonaOrder::from_personas(&[catch_all.clone(), mkt.clone()]);

        let entries = order.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].persona_id, mkt.id);
        assert_eq!(entries[1].persona_id, catch_all.id);
        assert!(entries[1].priority > entries[0].priority);
    }

    #[test]
    fn test_set_rank_shifts_intervening() {
        let (personas, mut order) = fixture();
        order.set_rank(personas[2].id, 1).unwrap();
        assert_eq!(order.ranked(), &[personas[2].id, personas[0].id, personas[1].id]);
    }

    #[test]
    fn test_set_rank_is_idempotent() {
        let (personas, mut order) = fixture();
        order.set_rank(personas[0].id, 3).unwrap();
        let after_first = order.clone();
        order.set_rank(personas[0].id, 3).unwrap();
        assert_eq!(order, after_first);
    }

    #[test]
    fn test_set_rank_rejects_zero() {
        let (personas, mut order) = fixture();
        let err = order.set_rank(personas[0].id, 0);
        assert!(matches!(err, Err(Error::Validation(_))));
    }

    #[test]
    fn test_set_rank_rejects_above_count() {
        let (personas, mut order) = fixture();
        let err = order.set_rank(personas[0].id, 4);
        assert!(matches!(err, Err(Error::Validation(_))));
    }

    #[test]
    fn test_set_rank_rejects_catch_all() {
        let (personas, mut order) = fixture();
        let err = order.set_rank(personas[3].id, 1);
        assert!(matches!(err, Err(Error::Validation(_))));
        // Order untouched by the rejected call
        assert_eq!(order.ranked(), &[personas[0].id, personas[1].id, personas[2].id]);
    }

    #[test]
    fn test_set_rank_unknown_persona() {
        let (_, mut order) = fixture();
        let err = order.set_rank(Uuid::new_v4(), 1);
        assert!(matches!(err, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_entries_renumber_from_one() {
        let (personas, mut order) = fixture();
        order.set_rank(personas[1].id, 1).unwrap();

        let entries = order.entries();
        let priorities: Vec<i32> = entries.iter().map(|e| e.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3, 4]);
        assert_eq!(entries[0].persona_id, personas[1].id);
        assert_eq!(entries[3].persona_id, personas[3].id);
    }

    #[test]
    fn test_entries_priorities_unique() {
        let (_, order) = fixture();
        let entries = order.entries();
        let mut priorities: Vec<i32> = entries.iter().map(|e| e.priority).collect();
        priorities.dedup();
        assert_eq!(priorities.len(), entries.len());
    }
}

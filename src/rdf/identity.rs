//! Graph id allocation for one translation call
//!
//! A quoted graph goes `Unvisited → Allocated(id) → Flattened(id)`. Ids are
//! handed out in order of first reference, starting after the asserted graph.

use super::types::GraphId;
use std::collections::HashMap;

/// Monotonic id source, fresh per translation
#[derive(Debug)]
pub struct GraphIdAllocator {
    next: u64,
}

impl GraphIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> GraphId {
        let id = GraphId(self.next);
        self.next += 1;
        id
    }
}

impl Default for GraphIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress of one source graph through flattening
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphState {
    /// Id assigned, triples not yet emitted
    Allocated(GraphId),
    /// All triples emitted
    Flattened(GraphId),
}

impl GraphState {
    pub fn id(&self) -> GraphId {
        match self {
            GraphState::Allocated(id) | GraphState::Flattened(id) => *id,
        }
    }
}

/// Source id → emitted id bookkeeping
#[derive(Debug)]
pub struct GraphIdentities {
    allocator: GraphIdAllocator,
    states: HashMap<GraphId, GraphState>,
    order: Vec<GraphId>,
}

impl GraphIdentities {
    /// Start with the asserted graph allocated as itself
    pub fn new() -> Self {
        let mut states = HashMap::new();
        states.insert(GraphId::TOP, GraphState::Allocated(GraphId::TOP));
        Self {
            allocator: GraphIdAllocator::new(),
            states,
            order: vec![GraphId::TOP],
        }
    }

    /// Get the emitted id for a source graph, allocating on first sight
    ///
    /// The flag is true when the id was allocated by this call.
    pub fn resolve(&mut self, source: GraphId) -> (GraphId, bool) {
        if let Some(state) = self.states.get(&source) {
            return (state.id(), false);
        }
        let id = self.allocator.allocate();
        self.states.insert(source, GraphState::Allocated(id));
        self.order.push(source);
        (id, true)
    }

    pub fn state(&self, source: GraphId) -> Option<GraphState> {
        self.states.get(&source).copied()
    }

    pub fn mark_flattened(&mut self, source: GraphId) {
        if let Some(state) = self.states.get_mut(&source) {
            *state = GraphState::Flattened(state.id());
        }
    }

    /// Source graphs in allocation order, paired with their emitted ids
    pub fn assignments(&self) -> impl Iterator<Item = (GraphId, GraphId)> + '_ {
        self.order
            .iter()
            .filter_map(|source| self.states.get(source).map(|state| (*source, state.id())))
    }
}

impl Default for GraphIdentities {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_monotonic() {
        let mut alloc = GraphIdAllocator::new();
        assert_eq!(alloc.allocate(), GraphId(1));
        assert_eq!(alloc.allocate(), GraphId(2));
    }

    #[test]
    fn test_resolve_allocates_once() {
        let mut ids = GraphIdentities::new();
        assert_eq!(ids.resolve(GraphId(42)), (GraphId(1), true));
        assert_eq!(ids.resolve(GraphId(7)), (GraphId(2), true));
        assert_eq!(ids.resolve(GraphId(42)), (GraphId(1), false));
        assert_eq!(ids.resolve(GraphId::TOP), (GraphId::TOP, false));
    }

    #[test]
    fn test_state_transitions() {
        let mut ids = GraphIdentities::new();
        assert_eq!(ids.state(GraphId(9)), None);
        ids.resolve(GraphId(9));
        assert_eq!(ids.state(GraphId(9)), Some(GraphState::Allocated(GraphId(1))));
        ids.mark_flattened(GraphId(9));
        assert_eq!(ids.state(GraphId(9)), Some(GraphState::Flattened(GraphId(1))));
    }

    #[test]
    fn test_assignments_follow_allocation_order() {
        let mut ids = GraphIdentities::new();
        ids.resolve(GraphId(30));
        ids.resolve(GraphId(10));
        let pairs: Vec<_> = ids.assignments().collect();
        assert_eq!(
            pairs,
            vec![
                (GraphId::TOP, GraphId::TOP),
                (GraphId(30), GraphId(1)),
                (GraphId(10), GraphId(2)),
            ]
        );
    }
}

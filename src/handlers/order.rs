//! Handler ordering resolution.
//!
//! Handlers declare a *partial* order (before/after references to names and
//! groups); dispatch needs a *total* order that never changes for the life
//! of a game. For each event kind this module builds a constraint graph over
//! the interested handlers and topologically sorts it, breaking every tie by
//! registration order, so the result is independent of hash-map iteration
//! order, compiler version, and anything else non-semantic.
//!
//! Resolution runs once, at game construction. A constraint cycle is
//! reported as [`GameError::OrderingCycle`] from `Game::new` and can never
//! surface mid-game.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use crate::core::{GameError, Result};

use super::{EventHandler, EventKind, HandlerRef};

/// The frozen handler set: every registered handler plus one resolved total
/// order per event kind.
pub struct HandlerSet {
    handlers: Vec<Arc<dyn EventHandler>>,
    order: FxHashMap<EventKind, Vec<usize>>,
}

impl HandlerSet {
    /// Resolve all event kinds up front. Fails on the first ordering cycle.
    pub(crate) fn resolve(handlers: Vec<Arc<dyn EventHandler>>) -> Result<Self> {
        let mut order = FxHashMap::default();
        for kind in EventKind::ALL {
            order.insert(kind, resolve_order(&handlers, kind)?);
        }
        Ok(Self { handlers, order })
    }

    /// Handler indices for `kind`, in dispatch order.
    #[must_use]
    pub fn order_for(&self, kind: EventKind) -> &[usize] {
        self.order.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Look up a handler by index.
    #[must_use]
    pub fn handler(&self, index: usize) -> &Arc<dyn EventHandler> {
        &self.handlers[index]
    }

    /// Iterate the handlers interested in `kind`, in dispatch order.
    pub fn iter_for(&self, kind: EventKind) -> impl Iterator<Item = &Arc<dyn EventHandler>> {
        self.order_for(kind).iter().map(move |&i| &self.handlers[i])
    }

    /// Dispatch-order handler names for `kind`. Handy in logs and tests.
    #[must_use]
    pub fn ordered_names(&self, kind: EventKind) -> Vec<&'static str> {
        self.iter_for(kind).map(|h| h.name()).collect()
    }

    /// Total number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSet")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Resolve one event kind to a total order of handler indices.
fn resolve_order(handlers: &[Arc<dyn EventHandler>], kind: EventKind) -> Result<Vec<usize>> {
    // Members in registration order; `pos` below always refers to a
    // member's position in this list.
    let members: Vec<usize> = handlers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.interests().contains(&kind))
        .map(|(i, _)| i)
        .collect();

    if members.len() <= 1 {
        return Ok(members);
    }

    let mut by_name: FxHashMap<&str, usize> = FxHashMap::default();
    let mut by_group: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
    for (pos, &idx) in members.iter().enumerate() {
        let prev = by_name.insert(handlers[idx].name(), pos);
        debug_assert!(prev.is_none(), "duplicate handler name {}", handlers[idx].name());
        if let Some(group) = handlers[idx].ordering().group {
            by_group.entry(group).or_default().push(pos);
        }
    }

    // Edge a -> b means "a runs before b".
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(members.len(), 0);
    let nodes: Vec<NodeIndex> = (0..members.len()).map(|pos| graph.add_node(pos)).collect();

    let expand = |r: HandlerRef, out: &mut Vec<usize>| match r {
        HandlerRef::Handler(name) => {
            if let Some(&pos) = by_name.get(name) {
                out.push(pos);
            }
        }
        HandlerRef::Group(name) => {
            if let Some(positions) = by_group.get(name) {
                out.extend_from_slice(positions);
            }
        }
    };

    let mut targets = Vec::new();
    for (pos, &idx) in members.iter().enumerate() {
        let decl = handlers[idx].ordering();

        targets.clear();
        for &r in decl.before {
            expand(r, &mut targets);
        }
        for &t in &targets {
            // A group constraint never orders a handler against itself.
            if t != pos {
                graph.update_edge(nodes[pos], nodes[t], ());
            }
        }

        targets.clear();
        for &r in decl.after {
            expand(r, &mut targets);
        }
        for &t in &targets {
            if t != pos {
                graph.update_edge(nodes[t], nodes[pos], ());
            }
        }
    }

    // Kahn's algorithm with a min-heap on member position: among the
    // currently unconstrained handlers, the earliest registered runs first.
    let mut indegree = vec![0usize; members.len()];
    for edge in graph.edge_references() {
        indegree[graph[edge.target()]] += 1;
    }

    let mut ready: BinaryHeap<Reverse<usize>> = indegree
        .iter()
        .enumerate()
        .filter(|(_, &d)| d == 0)
        .map(|(pos, _)| Reverse(pos))
        .collect();

    let mut emitted = vec![false; members.len()];
    let mut sorted = Vec::with_capacity(members.len());
    while let Some(Reverse(pos)) = ready.pop() {
        emitted[pos] = true;
        sorted.push(members[pos]);
        for nb in graph.neighbors(nodes[pos]) {
            let t = graph[nb];
            indegree[t] -= 1;
            if indegree[t] == 0 {
                ready.push(Reverse(t));
            }
        }
    }

    if sorted.len() != members.len() {
        let names = members
            .iter()
            .enumerate()
            .filter(|(pos, _)| !emitted[*pos])
            .map(|(_, &idx)| handlers[idx].name().to_owned())
            .collect();
        return Err(GameError::OrderingCycle { event: kind, names });
    }

    Ok(sorted)
}

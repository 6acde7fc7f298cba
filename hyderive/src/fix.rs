//! Single-pass fixed-point evaluation over cyclic expression graphs.
//!
//! A [`FixFunction`] is a recursive function over nodes whose recursion may
//! come back to a node still being evaluated. Such a re-entrant call returns
//! the function's declared cycle value instead of recursing, so every call
//! terminates after one pass over the reachable graph.
//!
//! Cache scoping
//! - A result that never observed a cycle value is settled: it is kept for the
//!   lifetime of the arena.
//! - A result that did observe the cycle value of a node still on the call
//!   stack is provisional. It is reused while that node is being evaluated,
//!   so one pass sees one value per node, and is dropped once that node
//!   finishes. A later query recomputes it with its own node as the head.
//!
//! [`Memo`] is the plain memo table used where recursion is not expected to
//! come back (derivatives); a re-entrant lookup is reported to the caller.
use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;
use std::hash::Hash;

use log::trace;

use crate::arena::{Caches, Grammar};
use crate::error::GrammarResult;
use crate::expr::{NodeId, Symbol};

/// Recursive node function evaluated with [`Grammar::fix_eval`].
pub(crate) trait FixFunction<S: Symbol> {
    type Value: Clone;

    /// Name used in trace output.
    const NAME: &'static str;

    fn table(caches: &mut Caches<S>) -> &mut FixTable<Self::Value>;

    /// Value returned for a node re-entered while it is being evaluated.
    fn on_cycle(grammar: &Grammar<S>, node: NodeId) -> Self::Value;

    /// One evaluation of the function on a resolved node.
    fn step(grammar: &mut Grammar<S>, node: NodeId) -> GrammarResult<Self::Value>;
}

impl<S: Symbol> Grammar<S> {
    pub(crate) fn fix_eval<F: FixFunction<S>>(&mut self, node: NodeId) -> GrammarResult<F::Value> {
        let node = self.resolve(node)?;
        let on_cycle = F::on_cycle(self, node);
        let depth = match F::table(&mut self.caches).enter(node, F::NAME, on_cycle) {
            Lookup::Known(value) => return Ok(value),
            Lookup::Fresh(depth) => depth,
        };

        match F::step(self, node) {
            Ok(value) => {
                F::table(&mut self.caches).leave(depth, value.clone());
                Ok(value)
            }
            Err(err) => {
                F::table(&mut self.caches).abandon(depth);
                Err(err)
            }
        }
    }
}

pub(crate) enum Lookup<V> {
    Known(V),
    /// Not known yet: evaluate, then `leave` (or `abandon`) at this depth.
    Fresh(usize),
}

#[derive(Debug)]
struct Frame {
    node: NodeId,
    /// Lowest stack depth whose cycle value this evaluation relied on.
    low: usize,
}

#[derive(Debug)]
pub(crate) struct FixTable<V> {
    settled: HashMap<NodeId, V>,
    provisional: HashMap<NodeId, (V, usize)>,
    stack: Vec<Frame>,
    active: HashMap<NodeId, usize>,
    /// Provisional nodes grouped by the depth they depend on.
    by_low: Vec<Vec<NodeId>>,
}

impl<V> Default for FixTable<V> {
    fn default() -> Self {
        Self {
            settled: HashMap::new(),
            provisional: HashMap::new(),
            stack: Vec::new(),
            active: HashMap::new(),
            by_low: Vec::new(),
        }
    }
}

impl<V: Clone> FixTable<V> {
    pub(crate) fn enter(&mut self, node: NodeId, name: &str, on_cycle: V) -> Lookup<V> {
        if let Some(value) = self.settled.get(&node) {
            return Lookup::Known(value.clone());
        }
        if let Some((value, low)) = self.provisional.get(&node) {
            let (value, low) = (value.clone(), *low);
            self.depend_on(low);
            return Lookup::Known(value);
        }
        if let Some(&depth) = self.active.get(&node) {
            trace!("{name}: cycle through {node} at depth {depth}");
            self.depend_on(depth);
            return Lookup::Known(on_cycle);
        }

        let depth = self.stack.len();
        self.stack.push(Frame { node, low: depth });
        self.active.insert(node, depth);
        Lookup::Fresh(depth)
    }

    pub(crate) fn leave(&mut self, depth: usize, value: V) {
        debug_assert_eq!(self.stack.len(), depth + 1, "unbalanced fixed-point frames");
        let Some(frame) = self.stack.pop() else {
            return;
        };
        self.active.remove(&frame.node);

        if frame.low >= depth {
            self.drop_provisional_from(depth);
            self.settled.insert(frame.node, value);
            return;
        }

        let low = frame.low;
        if let Some(dependents) = self.by_low.get_mut(depth).map(std::mem::take) {
            for node in &dependents {
                if let Some(entry) = self.provisional.get_mut(node) {
                    entry.1 = low;
                }
            }
            self.bucket(low).extend(dependents);
        }
        self.provisional.insert(frame.node, (value, low));
        self.bucket(low).push(frame.node);
        self.depend_on(low);
    }

    /// Unwind after a failed step at `depth`.
    pub(crate) fn abandon(&mut self, depth: usize) {
        for frame in self.stack.drain(depth..) {
            self.active.remove(&frame.node);
        }
        self.drop_provisional_from(depth);
        if self.stack.is_empty() {
            self.provisional.clear();
            self.by_low.clear();
            self.active.clear();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_settled(&self, node: NodeId) -> bool {
        self.settled.contains_key(&node)
    }

    fn depend_on(&mut self, depth: usize) {
        if let Some(top) = self.stack.last_mut() {
            top.low = top.low.min(depth);
        }
    }

    fn bucket(&mut self, low: usize) -> &mut Vec<NodeId> {
        if self.by_low.len() <= low {
            self.by_low.resize_with(low + 1, Vec::new);
        }
        &mut self.by_low[low]
    }

    fn drop_provisional_from(&mut self, depth: usize) {
        if depth >= self.by_low.len() {
            return;
        }
        for bucket in self.by_low.drain(depth..) {
            for node in bucket {
                self.provisional.remove(&node);
            }
        }
    }
}

enum MemoState<V> {
    Pending,
    Done(V),
}

pub(crate) enum MemoLookup<V> {
    Hit(V),
    /// The entry is being computed further up the call chain.
    Pending,
    /// The caller now owns the entry and must `finish` or `cancel` it.
    Miss,
}

/// Plain memo table without cycle handling.
pub(crate) struct Memo<K, V> {
    entries: HashMap<K, MemoState<V>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq, V: Clone> Memo<K, V> {
    pub(crate) fn begin(&mut self, key: K) -> MemoLookup<V> {
        match self.entries.entry(key) {
            MapEntry::Occupied(entry) => match entry.get() {
                MemoState::Done(value) => MemoLookup::Hit(value.clone()),
                MemoState::Pending => MemoLookup::Pending,
            },
            MapEntry::Vacant(entry) => {
                entry.insert(MemoState::Pending);
                MemoLookup::Miss
            }
        }
    }

    pub(crate) fn finish(&mut self, key: K, value: V) {
        self.entries.insert(key, MemoState::Done(value));
    }

    pub(crate) fn cancel(&mut self, key: &K) {
        self.entries.remove(key);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

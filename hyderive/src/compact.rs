//! Structural compaction of residual expressions.
//!
//! Each derivative step wraps the previous residual in fresh `Alt`/`Cat`
//! nodes, most of which describe the empty language or only the empty string.
//! Compaction rewrites a residual into an equivalent, smaller expression:
//! dead branches disappear, nodes that can only match the empty string become
//! `ε` carrying their witnesses, and a consumed concatenation prefix is folded
//! into a `Reduction` so the witnesses it attested are kept without keeping
//! the prefix itself.
//!
//! The rewrite is memoized by node and evaluated through the fixed-point
//! machinery: a node reached again while it is being compacted stands for
//! itself.
use log::trace;

use crate::arena::{Caches, Grammar};
use crate::error::{GrammarError, GrammarResult, Violation};
use crate::expr::view::ExprView;
use crate::expr::{Child, ExprType, Node, NodeId, Symbol};
use crate::fix::{FixFunction, FixTable};
use crate::witness::Reducer;

/// Recognizes expressions whose language is certainly empty.
pub(crate) struct EmptyLike;

impl<S: Symbol> FixFunction<S> for EmptyLike {
    type Value = bool;

    const NAME: &'static str = "empty_like";

    fn table(caches: &mut Caches<S>) -> &mut FixTable<bool> {
        &mut caches.empty_like
    }

    fn on_cycle(_: &Grammar<S>, _: NodeId) -> bool {
        false
    }

    fn step(grammar: &mut Grammar<S>, node: NodeId) -> GrammarResult<bool> {
        Ok(match grammar.view(node)? {
            ExprView::Empty => true,
            ExprView::Eps(_) | ExprView::Char(_) | ExprView::Rep(_) => false,
            ExprView::Alt(first, second) => {
                grammar.empty_like(first)? && grammar.empty_like(second)?
            }
            ExprView::Cat(first, second) => {
                grammar.empty_like(first)? || grammar.empty_like(second)?
            }
            ExprView::Delta(inner) => !grammar.nullable(inner)?,
            ExprView::Reduction(inner, _) => grammar.empty_like(inner)?,
        })
    }
}

/// Recognizes expressions that can only match the empty string.
pub(crate) struct EpsLike;

impl<S: Symbol> FixFunction<S> for EpsLike {
    type Value = bool;

    const NAME: &'static str = "eps_like";

    fn table(caches: &mut Caches<S>) -> &mut FixTable<bool> {
        &mut caches.eps_like
    }

    fn on_cycle(_: &Grammar<S>, _: NodeId) -> bool {
        true
    }

    fn step(grammar: &mut Grammar<S>, node: NodeId) -> GrammarResult<bool> {
        Ok(match grammar.view(node)? {
            ExprView::Empty | ExprView::Char(_) => false,
            ExprView::Eps(_) => true,
            ExprView::Rep(inner) => grammar.empty_like(inner)? || grammar.eps_like(inner)?,
            ExprView::Alt(first, second) | ExprView::Cat(first, second) => {
                grammar.eps_like(first)? && grammar.eps_like(second)?
            }
            ExprView::Delta(inner) => grammar.nullable(inner)?,
            ExprView::Reduction(inner, _) => grammar.eps_like(inner)?,
        })
    }
}

pub(crate) struct Compact;

impl<S: Symbol> FixFunction<S> for Compact {
    type Value = NodeId;

    const NAME: &'static str = "compact";

    fn table(caches: &mut Caches<S>) -> &mut FixTable<NodeId> {
        &mut caches.compact
    }

    fn on_cycle(_: &Grammar<S>, node: NodeId) -> NodeId {
        node
    }

    fn step(grammar: &mut Grammar<S>, node: NodeId) -> GrammarResult<NodeId> {
        let allocated = grammar.node_count();
        let compacted = compact_step(grammar, node)?;
        if compacted.index() >= allocated {
            grammar.caches.compacted.insert(compacted);
        }
        Ok(compacted)
    }
}

fn compact_step<S: Symbol>(grammar: &mut Grammar<S>, node: NodeId) -> GrammarResult<NodeId> {
    match grammar.expr_type(node)? {
        ExprType::Empty | ExprType::Eps | ExprType::Char => return Ok(node),
        ExprType::Placeholder => {
            return Err(GrammarError::violation(node, Violation::UnpatchedPlaceholder));
        }
        _ => {}
    }

    if grammar.empty_like(node)? {
        return Ok(grammar.empty());
    }
    if grammar.eps_like(node)? {
        let forest = grammar.forest_rc(node)?;
        return Ok(grammar.eps_shared(forest));
    }

    Ok(match grammar.view(node)? {
        ExprView::Alt(first, second) => {
            if grammar.empty_like(first)? {
                grammar.compact(second)?
            } else if grammar.empty_like(second)? {
                grammar.compact(first)?
            } else {
                grammar.alt(compact_later(first), compact_later(second))
            }
        }
        ExprView::Cat(first, second) => {
            let prefix = grammar.compact(first)?;
            let (prefix, record) = grammar.node(prefix)?;
            let attested = match record {
                Node::Empty => return Ok(grammar.empty()),
                Node::Eps(forest) => forest.single().cloned(),
                _ => None,
            };
            match attested {
                Some(witness) if witness.is_nil() => grammar.compact(second)?,
                Some(witness) => {
                    let rest = grammar.compact(second)?;
                    grammar.reduction_with(rest, Reducer::prefixed(witness))
                }
                None => grammar.cat(prefix, compact_later(second)),
            }
        }
        ExprView::Rep(inner) => grammar.rep(compact_later(inner)),
        ExprView::Delta(inner) => grammar.delta(compact_later(inner)),
        ExprView::Reduction(inner, reducer) => {
            let inner = grammar.compact(inner)?;
            grammar.reduction_with(inner, reducer)
        }
        ExprView::Empty | ExprView::Eps(_) | ExprView::Char(_) => node,
    })
}

/// Deferred compaction of `node`; reads racing the computation see `node`.
fn compact_later<S: Symbol>(node: NodeId) -> Child<S> {
    Child::deferred_as(node, move |g: &mut Grammar<S>| g.compact(node))
}

impl<S: Symbol> Grammar<S> {
    /// Equivalent, structurally smaller form of `node`.
    ///
    /// Compacting the result again returns it unchanged.
    pub fn compact(&mut self, node: NodeId) -> GrammarResult<NodeId> {
        let node = self.resolve(node)?;
        if self.caches.compacted.contains(&node) {
            return Ok(node);
        }
        let compacted = self.fix_eval::<Compact>(node)?;
        if compacted != node {
            trace!("compact {node} -> {compacted}");
        }
        Ok(compacted)
    }

    /// Whether `node` certainly denotes the empty language.
    pub fn empty_like(&mut self, node: NodeId) -> GrammarResult<bool> {
        self.fix_eval::<EmptyLike>(node)
    }

    /// Whether `node` can match nothing but the empty string.
    pub fn eps_like(&mut self, node: NodeId) -> GrammarResult<bool> {
        self.fix_eval::<EpsLike>(node)
    }
}

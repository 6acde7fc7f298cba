use log::trace;

use crate::arena::Grammar;
use crate::error::{GrammarError, GrammarResult, Violation};
use crate::expr::{Child, ExprType, Node, NodeId, Symbol};
use crate::fix::MemoLookup;
use crate::witness::{ParseForest, Witness};

impl<S: Symbol> Grammar<S> {
    /// Derivative of `node` with respect to `symbol`: the residual language of
    /// the strings of `node` starting with `symbol`, with `symbol` removed.
    ///
    /// Results are memoized per (node, symbol) for the lifetime of the arena.
    /// Sub-derivatives are deferred children, so differentiating a recursive
    /// expression only allocates the nodes of the outer step; the rest is built
    /// when something reads it.
    pub fn derive(&mut self, symbol: &S, node: NodeId) -> GrammarResult<NodeId> {
        let node = self.resolve(node)?;
        let key = (node, symbol.clone());
        match self.caches.derive.begin(key.clone()) {
            MemoLookup::Hit(residual) => return Ok(residual),
            MemoLookup::Pending => {
                return Err(GrammarError::violation(node, Violation::ReentrantDerivative));
            }
            MemoLookup::Miss => {}
        }

        match self.derive_step(symbol, node) {
            Ok(residual) => {
                trace!("derive {symbol:?} {node} -> {residual}");
                self.caches.derive.finish(key, residual);
                Ok(residual)
            }
            Err(err) => {
                self.caches.derive.cancel(&key);
                Err(err)
            }
        }
    }

    /// Child `index` of `node`: the id itself when already computed, otherwise
    /// a deferred read of the slot.
    fn operand(&self, node: NodeId, index: usize) -> Child<S> {
        match self.ready_child(node, index) {
            Some(id) => id.into(),
            None => Child::deferred(move |g: &mut Grammar<S>| g.child(node, index)),
        }
    }

    fn derived_operand(&self, symbol: &S, node: NodeId, index: usize) -> Child<S> {
        let symbol = symbol.clone();
        Child::deferred(move |g: &mut Grammar<S>| {
            let operand = g.child(node, index)?;
            g.derive(&symbol, operand)
        })
    }

    fn derive_step(&mut self, symbol: &S, node: NodeId) -> GrammarResult<NodeId> {
        let (node, record) = self.node(node)?;
        let matched = match record {
            Node::Char(c) => Some(c == symbol),
            _ => None,
        };
        let reducer = match record {
            Node::Reduction(_, reducer) => Some(reducer.clone()),
            _ => None,
        };

        Ok(match self.expr_type(node)? {
            ExprType::Empty | ExprType::Eps | ExprType::Delta => self.empty(),
            ExprType::Char => match matched {
                Some(true) => self.eps_with(ParseForest::singleton(Witness::leaf(symbol.clone()))),
                _ => self.empty(),
            },
            ExprType::Alt => {
                let first = self.derived_operand(symbol, node, 0);
                let second = self.derived_operand(symbol, node, 1);
                self.alt(first, second)
            }
            ExprType::Cat => {
                // D(ab) = δ(a)·D(b) | D(a)·b
                let first = self.operand(node, 0);
                let nullable_prefix = self.delta(first);
                let derived_second = self.derived_operand(symbol, node, 1);
                let skip = self.cat(nullable_prefix, derived_second);

                let derived_first = self.derived_operand(symbol, node, 0);
                let second = self.operand(node, 1);
                let step = self.cat(derived_first, second);
                self.alt(skip, step)
            }
            ExprType::Rep => {
                let derived_inner = self.derived_operand(symbol, node, 0);
                self.cat(derived_inner, node)
            }
            ExprType::Reduction => {
                let reducer =
                    reducer.ok_or(GrammarError::violation(node, Violation::NoSuchChild))?;
                let derived_inner = self.derived_operand(symbol, node, 0);
                self.reduction_with(derived_inner, reducer)
            }
            ExprType::Placeholder => {
                return Err(GrammarError::violation(node, Violation::UnpatchedPlaceholder));
            }
        })
    }
}

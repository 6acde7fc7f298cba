use std::rc::Rc;

use crate::expr::{ExprType, NodeId, Symbol};
use crate::witness::{ParseForest, Reducer};

/// Owned, one-level view of an expression.
///
/// Children are reported as node ids; inspecting a child means asking the
/// grammar for its view in turn. Obtained through
/// [`Grammar::view`](crate::arena::Grammar::view), which forces every deferred
/// child of the node first.
#[derive(Debug, Clone)]
pub enum ExprView<S: Symbol> {
    Empty,
    Eps(Rc<ParseForest<S>>),
    Char(S),
    Cat(NodeId, NodeId),
    Alt(NodeId, NodeId),
    Rep(NodeId),
    Delta(NodeId),
    Reduction(NodeId, Reducer<S>),
}

impl<S: Symbol> ExprView<S> {
    pub fn r#type(&self) -> ExprType {
        match self {
            ExprView::Empty => ExprType::Empty,
            ExprView::Eps(_) => ExprType::Eps,
            ExprView::Char(_) => ExprType::Char,
            ExprView::Cat(..) => ExprType::Cat,
            ExprView::Alt(..) => ExprType::Alt,
            ExprView::Rep(_) => ExprType::Rep,
            ExprView::Delta(_) => ExprType::Delta,
            ExprView::Reduction(..) => ExprType::Reduction,
        }
    }

    /// Child ids in slot order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> {
        let (first, second) = match self {
            ExprView::Cat(a, b) | ExprView::Alt(a, b) => (Some(*a), Some(*b)),
            ExprView::Rep(e) | ExprView::Delta(e) | ExprView::Reduction(e, _) => (Some(*e), None),
            _ => (None, None),
        };
        first.into_iter().chain(second)
    }

    /// Witness set of an `Eps` view.
    pub fn forest(&self) -> Option<&ParseForest<S>> {
        match self {
            ExprView::Eps(forest) => Some(forest),
            _ => None,
        }
    }
}

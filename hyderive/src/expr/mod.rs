//! Grammar expressions: node identifiers, kinds, records and child slots.
//!
//! Role
//! - Every expression lives in a [`Grammar`](crate::arena::Grammar) arena and is
//!   addressed by a [`NodeId`]. Compound nodes store the ids of their children,
//!   so cyclic (self-referential) grammars are plain index cycles.
//! - A child may be *deferred*: a zero-argument computation run at most once,
//!   the first time the child is read. This is what lets the derivative of a
//!   recursive expression be described without building it eagerly.
//! - Builders (smart constructors and `letrec`) live in [`builder`]; the owned
//!   inspection type is [`view::ExprView`].
//!
//! Identity
//! - Node identity is the key of every memo table. Structural comparison of
//!   graphs is available through
//!   [`Grammar::structurally_equal`](crate::arena::Grammar::structurally_equal).
pub mod builder;
pub mod view;

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use strum::{Display, EnumIs, EnumIter};

use crate::arena::Grammar;
use crate::error::{GrammarError, GrammarResult};
use crate::utils::lazy::LazySlot;
use crate::witness::{ParseForest, Reducer};

/// Values usable as grammar symbols.
///
/// Symbols are compared structurally and hashed by the derivative memo table.
pub trait Symbol: Clone + Eq + Hash + fmt::Debug + 'static {}

impl<T: Clone + Eq + Hash + fmt::Debug + 'static> Symbol for T {}

/// Index of a node inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outer constructor of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs, EnumIter)]
pub enum ExprType {
    Empty,
    Eps,
    Char,
    Cat,
    Alt,
    Rep,
    Delta,
    Reduction,
    /// A `letrec` placeholder that has not been written yet.
    Placeholder,
}

impl ExprType {
    /// Atomic expressions cannot carry a productive self-reference.
    pub fn is_atomic(self) -> bool {
        matches!(
            self,
            ExprType::Empty | ExprType::Eps | ExprType::Char | ExprType::Placeholder
        )
    }

    /// Number of child slots.
    pub fn arity(self) -> usize {
        match self {
            ExprType::Cat | ExprType::Alt => 2,
            ExprType::Rep | ExprType::Delta | ExprType::Reduction => 1,
            _ => 0,
        }
    }
}

/// A child slot of a compound node.
pub(crate) type Slot<S> = LazySlot<Grammar<S>, NodeId, GrammarError>;

/// Stored node record.
pub(crate) enum Node<S: Symbol> {
    Placeholder,
    /// Record moved into a `letrec` placeholder; reads continue there.
    Forward(NodeId),
    Empty,
    Eps(Rc<ParseForest<S>>),
    Char(S),
    Cat(Slot<S>, Slot<S>),
    Alt(Slot<S>, Slot<S>),
    Rep(Slot<S>),
    Delta(Slot<S>),
    Reduction(Slot<S>, Reducer<S>),
}

impl<S: Symbol> Node<S> {
    /// Kind of a written record; `None` for forwards.
    pub(crate) fn expr_type(&self) -> Option<ExprType> {
        Some(match self {
            Node::Placeholder => ExprType::Placeholder,
            Node::Forward(_) => return None,
            Node::Empty => ExprType::Empty,
            Node::Eps(_) => ExprType::Eps,
            Node::Char(_) => ExprType::Char,
            Node::Cat(..) => ExprType::Cat,
            Node::Alt(..) => ExprType::Alt,
            Node::Rep(_) => ExprType::Rep,
            Node::Delta(_) => ExprType::Delta,
            Node::Reduction(..) => ExprType::Reduction,
        })
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Slot<S>> {
        match (self, index) {
            (Node::Cat(first, _) | Node::Alt(first, _), 0) => Some(first),
            (Node::Cat(_, second) | Node::Alt(_, second), 1) => Some(second),
            (Node::Rep(inner) | Node::Delta(inner) | Node::Reduction(inner, _), 0) => {
                Some(inner)
            }
            _ => None,
        }
    }

    pub(crate) fn slot(&self, index: usize) -> Option<&Slot<S>> {
        match (self, index) {
            (Node::Cat(first, _) | Node::Alt(first, _), 0) => Some(first),
            (Node::Cat(_, second) | Node::Alt(_, second), 1) => Some(second),
            (Node::Rep(inner) | Node::Delta(inner) | Node::Reduction(inner, _), 0) => {
                Some(inner)
            }
            _ => None,
        }
    }
}

/// Child argument accepted by the smart constructors.
///
/// Either an existing node or a computation producing one on first read.
///
/// ```
/// use hyderive::prelude::*;
///
/// let mut g: Grammar<char> = Grammar::new();
/// let x = g.char('x');
/// // The second operand is only built once something inspects it.
/// let xy = g.cat(x, Child::deferred(|g: &mut Grammar<char>| Ok(g.char('y'))));
/// assert!(g.recognize("xy".chars(), xy).unwrap());
/// ```
pub enum Child<S: Symbol> {
    Node(NodeId),
    Deferred {
        thunk: Box<dyn FnOnce(&mut Grammar<S>) -> GrammarResult<NodeId>>,
        /// Equivalent node handed to reads made while `thunk` runs.
        stand_in: Option<NodeId>,
    },
}

impl<S: Symbol> Child<S> {
    pub fn deferred(thunk: impl FnOnce(&mut Grammar<S>) -> GrammarResult<NodeId> + 'static) -> Self {
        Child::Deferred {
            thunk: Box::new(thunk),
            stand_in: None,
        }
    }

    /// Deferred child whose value is known to denote the same language as
    /// `stand_in`. A read that needs this child while it is being computed
    /// gets `stand_in` instead of failing.
    pub fn deferred_as(
        stand_in: NodeId,
        thunk: impl FnOnce(&mut Grammar<S>) -> GrammarResult<NodeId> + 'static,
    ) -> Self {
        Child::Deferred {
            thunk: Box::new(thunk),
            stand_in: Some(stand_in),
        }
    }

    /// Node id if this child is not deferred.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Child::Node(id) => Some(*id),
            Child::Deferred { .. } => None,
        }
    }

    pub(crate) fn into_slot(self) -> Slot<S> {
        match self {
            Child::Node(id) => LazySlot::ready(id),
            Child::Deferred { thunk, stand_in } => LazySlot::Deferred(thunk, stand_in),
        }
    }
}

impl<S: Symbol> From<NodeId> for Child<S> {
    fn from(id: NodeId) -> Self {
        Child::Node(id)
    }
}

impl<S: Symbol> fmt::Debug for Child<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Child::Node(id) => write!(f, "Node({id})"),
            Child::Deferred { stand_in, .. } => write!(f, "Deferred(stand_in: {stand_in:?})"),
        }
    }
}

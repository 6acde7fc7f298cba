use std::collections::HashSet;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::config::GrammarConfig;
use crate::error::{GrammarError, GrammarResult, Violation};
use crate::expr::view::ExprView;
use crate::expr::{ExprType, Node, NodeId, Slot, Symbol};
use crate::fix::{FixTable, Memo};
use crate::utils::lazy::Begin;
use crate::witness::ParseForest;

/// Arena owning every expression of a grammar, together with the caches of the
/// queries run against it.
///
/// Role
/// - Nodes are allocated through the smart constructors (see
///   [`builder`](crate::expr::builder)) and addressed by [`NodeId`]. Nothing is
///   freed before the arena is dropped.
/// - Memo tables (derivatives, nullability, forests, compaction) are owned by
///   the arena: two grammars never share cached state.
/// - The canonical empty-language and empty-string nodes are allocated up front
///   and returned by [`Grammar::empty`] / [`Grammar::eps`].
///
/// Threading
/// - A grammar holds reference-counted closures and is neither `Send` nor
///   `Sync`; use one arena per thread.
///
/// Example
/// ```
/// use hyderive::prelude::*;
///
/// let mut g: Grammar<char> = Grammar::new();
/// let a = g.char('a');
/// let b = g.char('b');
/// let ab = g.cat(a, b);
/// let many = g.rep(ab);
///
/// assert!(g.recognize("abab".chars(), many).unwrap());
/// assert!(!g.recognize("aba".chars(), many).unwrap());
/// ```
pub struct Grammar<S: Symbol> {
    pub(crate) nodes: Vec<Node<S>>,
    pub(crate) caches: Caches<S>,
    pub(crate) config: GrammarConfig,
    empty: NodeId,
    eps: NodeId,
}

/// Query caches scoped to one arena.
pub(crate) struct Caches<S: Symbol> {
    pub(crate) derive: Memo<(NodeId, S), NodeId>,
    pub(crate) nullable: FixTable<bool>,
    pub(crate) forest: FixTable<Rc<ParseForest<S>>>,
    pub(crate) empty_like: FixTable<bool>,
    pub(crate) eps_like: FixTable<bool>,
    pub(crate) compact: FixTable<NodeId>,
    /// Nodes produced by compaction; compacting them again is a no-op.
    pub(crate) compacted: HashSet<NodeId>,
}

impl<S: Symbol> Default for Caches<S> {
    fn default() -> Self {
        Self {
            derive: Memo::default(),
            nullable: FixTable::default(),
            forest: FixTable::default(),
            empty_like: FixTable::default(),
            eps_like: FixTable::default(),
            compact: FixTable::default(),
            compacted: HashSet::new(),
        }
    }
}

impl<S: Symbol> Default for Grammar<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> Grammar<S> {
    /// Create an empty arena with the default configuration.
    pub fn new() -> Self {
        Self::with_config(GrammarConfig::default())
    }

    pub fn with_config(config: GrammarConfig) -> Self {
        let mut grammar = Self {
            nodes: Vec::with_capacity(64),
            caches: Caches::default(),
            config,
            empty: NodeId(0),
            eps: NodeId(0),
        };
        grammar.empty = grammar.alloc(Node::Empty);
        grammar.eps = grammar.alloc(Node::Eps(Rc::new(ParseForest::trivial())));
        grammar
    }

    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut GrammarConfig {
        &mut self.config
    }

    /// The canonical empty-language node.
    #[inline]
    pub fn empty(&self) -> NodeId {
        self.empty
    }

    /// The canonical empty-string node, carrying the single trivial witness.
    #[inline]
    pub fn eps(&self) -> NodeId {
        self.eps
    }

    /// Number of records ever allocated (including forwards and unreachable
    /// nodes).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn alloc(&mut self, node: Node<S>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Follow `letrec` forwards to the node actually holding the record.
    pub fn resolve(&self, mut id: NodeId) -> GrammarResult<NodeId> {
        loop {
            match self.nodes.get(id.index()) {
                None => return Err(GrammarError::violation(id, Violation::ForeignNode)),
                Some(Node::Forward(next)) => id = *next,
                Some(_) => return Ok(id),
            }
        }
    }

    /// Resolved record of `id`.
    pub(crate) fn node(&self, id: NodeId) -> GrammarResult<(NodeId, &Node<S>)> {
        let id = self.resolve(id)?;
        Ok((id, &self.nodes[id.index()]))
    }

    /// Kind of the expression at `id`, without forcing any child.
    pub fn expr_type(&self, id: NodeId) -> GrammarResult<ExprType> {
        let (id, node) = self.node(id)?;
        node.expr_type()
            .ok_or(GrammarError::violation(id, Violation::ForeignNode))
    }

    /// Child `index` of `id` if it has already been computed.
    pub(crate) fn ready_child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        let (_, node) = self.node(id).ok()?;
        let child = node.slot(index)?.get()?;
        self.resolve(child).ok()
    }

    fn slot_mut(&mut self, id: NodeId, index: usize) -> GrammarResult<&mut Slot<S>> {
        self.nodes[id.index()]
            .slot_mut(index)
            .ok_or(GrammarError::violation(id, Violation::NoSuchChild))
    }

    /// Child `index` of `id`, running its deferred computation on first read.
    ///
    /// A computation that fails leaves the slot in the forcing state; later
    /// reads of that slot report a re-entrant force.
    pub fn child(&mut self, id: NodeId, index: usize) -> GrammarResult<NodeId> {
        let id = self.resolve(id)?;
        let begin = self.slot_mut(id, index)?.begin();
        match begin {
            Begin::Ready(child) => self.resolve(child),
            Begin::Busy => Err(GrammarError::violation(id, Violation::ReentrantForce)),
            Begin::Run(thunk) => {
                let child = thunk(self)?;
                let child = self.resolve(child)?;
                self.slot_mut(id, index)?.fill(child);
                Ok(child)
            }
        }
    }

    /// One-level owned view of `id`, forcing all of its children.
    pub fn view(&mut self, id: NodeId) -> GrammarResult<ExprView<S>> {
        let id = self.resolve(id)?;
        let kind = self.expr_type(id)?;
        if kind.is_placeholder() {
            return Err(GrammarError::violation(id, Violation::UnpatchedPlaceholder));
        }

        let mut children: SmallVec<[NodeId; 2]> = SmallVec::new();
        for index in 0..kind.arity() {
            children.push(self.child(id, index)?);
        }

        Ok(match &self.nodes[id.index()] {
            Node::Empty => ExprView::Empty,
            Node::Eps(forest) => ExprView::Eps(Rc::clone(forest)),
            Node::Char(symbol) => ExprView::Char(symbol.clone()),
            Node::Cat(..) => ExprView::Cat(children[0], children[1]),
            Node::Alt(..) => ExprView::Alt(children[0], children[1]),
            Node::Rep(_) => ExprView::Rep(children[0]),
            Node::Delta(_) => ExprView::Delta(children[0]),
            Node::Reduction(_, reducer) => ExprView::Reduction(children[0], reducer.clone()),
            Node::Placeholder | Node::Forward(_) => {
                return Err(GrammarError::violation(id, Violation::UnpatchedPlaceholder));
            }
        })
    }
}

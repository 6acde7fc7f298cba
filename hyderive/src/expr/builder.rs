//! Smart constructors and self-reference.
//!
//! Constructors simplify their result when a child is an already-written node
//! whose shape makes the simplification exact (`Cat(Empty, _) = Empty`,
//! `Alt(Empty, x) = x`, `Rep(Rep(x)) = Rep(x)`, ...). Deferred children and
//! unpatched `letrec` placeholders are never inspected, so building a
//! recursive rule can never collapse through its own back-reference.
use std::rc::Rc;

use log::debug;

use crate::arena::Grammar;
use crate::error::{GrammarError, GrammarResult};
use crate::expr::{Child, Node, NodeId, Symbol};
use crate::witness::{ParseForest, Reducer, Witness};

/// What a constructor may learn about a child without forcing anything.
enum Shape<S: Symbol> {
    Empty,
    /// `Eps` carrying the single `Nil` witness.
    TrivialEps,
    Eps,
    Char,
    Rep,
    Delta,
    /// `Reduction` together with its inner child when already computed.
    Reduction(Option<NodeId>, Reducer<S>),
    /// Compound node or placeholder: nothing to simplify.
    Opaque,
}

impl<S: Symbol> Shape<S> {
    fn is_empty(&self) -> bool {
        matches!(self, Shape::Empty)
    }

    fn is_eps(&self) -> bool {
        matches!(self, Shape::TrivialEps | Shape::Eps)
    }
}

impl<S: Symbol> Grammar<S> {
    fn shape(&self, child: &Child<S>) -> Option<(NodeId, Shape<S>)> {
        let id = child.node()?;
        let (id, node) = self.node(id).ok()?;
        let shape = match node {
            Node::Empty => Shape::Empty,
            Node::Eps(forest) if forest.is_trivial() => Shape::TrivialEps,
            Node::Eps(_) => Shape::Eps,
            Node::Char(_) => Shape::Char,
            Node::Rep(_) => Shape::Rep,
            Node::Delta(_) => Shape::Delta,
            Node::Reduction(inner, reducer) => Shape::Reduction(
                inner.get().and_then(|inner| self.resolve(inner).ok()),
                reducer.clone(),
            ),
            _ => Shape::Opaque,
        };
        Some((id, shape))
    }

    /// `ε` carrying the given witnesses; `Empty` when there are none.
    pub fn eps_with(&mut self, forest: ParseForest<S>) -> NodeId {
        self.eps_shared(Rc::new(forest))
    }

    pub(crate) fn eps_shared(&mut self, forest: Rc<ParseForest<S>>) -> NodeId {
        if forest.is_empty() {
            self.empty()
        } else if forest.is_trivial() {
            self.eps()
        } else {
            self.alloc(Node::Eps(forest))
        }
    }

    /// `ε` attesting a single witness.
    pub fn eps_witness(&mut self, witness: Witness<S>) -> NodeId {
        self.eps_with(ParseForest::singleton(witness))
    }

    pub fn char(&mut self, symbol: S) -> NodeId {
        self.alloc(Node::Char(symbol))
    }

    pub fn cat(&mut self, first: impl Into<Child<S>>, second: impl Into<Child<S>>) -> NodeId {
        let (first, second) = (first.into(), second.into());
        let lhs = self.shape(&first);
        let rhs = self.shape(&second);

        if lhs.as_ref().is_some_and(|(_, s)| s.is_empty())
            || rhs.as_ref().is_some_and(|(_, s)| s.is_empty())
        {
            return self.empty();
        }
        if let (Some((_, Shape::TrivialEps)), Some((rhs, _))) = (&lhs, &rhs) {
            return *rhs;
        }
        if let (Some((lhs, _)), Some((_, Shape::TrivialEps))) = (&lhs, &rhs) {
            return *lhs;
        }

        self.alloc(Node::Cat(first.into_slot(), second.into_slot()))
    }

    pub fn alt(&mut self, first: impl Into<Child<S>>, second: impl Into<Child<S>>) -> NodeId {
        let (first, second) = (first.into(), second.into());
        let lhs = self.shape(&first);
        let rhs = self.shape(&second);

        match (&lhs, &rhs) {
            (Some((_, l)), Some((rhs, _))) if l.is_empty() => return *rhs,
            (Some((lhs, _)), Some((_, r))) if r.is_empty() => return *lhs,
            _ => {}
        }

        self.alloc(Node::Alt(first.into_slot(), second.into_slot()))
    }

    pub fn rep(&mut self, inner: impl Into<Child<S>>) -> NodeId {
        let inner = inner.into();
        match self.shape(&inner) {
            Some((_, shape)) if shape.is_empty() || shape.is_eps() => self.eps(),
            Some((id, Shape::Rep)) => id,
            _ => self.alloc(Node::Rep(inner.into_slot())),
        }
    }

    /// The nullable part of `inner`: `ε` (with its witnesses) if `inner`
    /// accepts the empty string, the empty language otherwise.
    pub fn delta(&mut self, inner: impl Into<Child<S>>) -> NodeId {
        let inner = inner.into();
        match self.shape(&inner) {
            Some((_, Shape::Empty | Shape::Char)) => self.empty(),
            Some((id, Shape::TrivialEps | Shape::Eps | Shape::Delta)) => id,
            Some((_, Shape::Rep)) => self.eps(),
            _ => self.alloc(Node::Delta(inner.into_slot())),
        }
    }

    /// Apply `func` to every witness extracted from `inner`.
    pub fn reduction(
        &mut self,
        inner: impl Into<Child<S>>,
        func: impl Fn(&Witness<S>) -> Witness<S> + 'static,
    ) -> NodeId {
        self.reduction_with(inner, Reducer::new(func))
    }

    pub fn reduction_with(&mut self, inner: impl Into<Child<S>>, reducer: Reducer<S>) -> NodeId {
        let inner = inner.into();
        match self.shape(&inner) {
            Some((_, Shape::Empty)) => self.empty(),
            Some((id, Shape::TrivialEps | Shape::Eps)) => {
                let forest = match &self.nodes[id.index()] {
                    Node::Eps(forest) => forest.map(&reducer),
                    _ => ParseForest::trivial().map(&reducer),
                };
                self.eps_with(forest)
            }
            Some((outer, Shape::Reduction(nested, inner_reducer))) => {
                let nested: Child<S> = match nested {
                    Some(nested) => nested.into(),
                    None => Child::deferred(move |g: &mut Grammar<S>| g.child(outer, 0)),
                };
                let fused = reducer.after(&inner_reducer);
                self.alloc(Node::Reduction(nested.into_slot(), fused))
            }
            _ => self.alloc(Node::Reduction(inner.into_slot(), reducer)),
        }
    }

    /// Left fold of [`cat`](Self::cat); `ε` for no operands.
    pub fn cat_seq<C: Into<Child<S>>>(&mut self, children: impl IntoIterator<Item = C>) -> NodeId {
        let mut children = children.into_iter();
        let Some(first) = children.next() else {
            return self.eps();
        };
        let mut acc = match first.into() {
            Child::Node(id) => id,
            deferred => self.cat(deferred, self.eps()),
        };
        for child in children {
            acc = self.cat(acc, child);
        }
        acc
    }

    /// Left fold of [`alt`](Self::alt); the empty language for no operands.
    pub fn alt_seq<C: Into<Child<S>>>(&mut self, children: impl IntoIterator<Item = C>) -> NodeId {
        let mut children = children.into_iter();
        let Some(first) = children.next() else {
            return self.empty();
        };
        let mut acc = match first.into() {
            Child::Node(id) => id,
            deferred => self.alt(deferred, self.empty()),
        };
        for child in children {
            acc = self.alt(acc, child);
        }
        acc
    }

    /// Build a self-referential expression.
    ///
    /// `builder` receives a reference to the expression being defined and
    /// returns its body, which must be a compound expression (`Cat`, `Alt`,
    /// `Rep`, `Delta` or `Reduction`). The body is then moved into the
    /// reference, so the returned id and the back-reference are the same node.
    ///
    /// ```
    /// use hyderive::prelude::*;
    ///
    /// let mut g: Grammar<char> = Grammar::new();
    /// // list = 'x' list | ε
    /// let list = g
    ///     .letrec(|g, list| {
    ///         let x = g.char('x');
    ///         let more = g.cat(x, list);
    ///         let done = g.eps();
    ///         g.alt(more, done)
    ///     })
    ///     .unwrap();
    /// assert!(g.recognize("xxx".chars(), list).unwrap());
    /// ```
    pub fn letrec(
        &mut self,
        builder: impl FnOnce(&mut Grammar<S>, NodeId) -> NodeId,
    ) -> GrammarResult<NodeId> {
        let placeholder = self.alloc(Node::Placeholder);
        let body = builder(self, placeholder);
        let (body, found) = {
            let body = self.resolve(body)?;
            (body, self.expr_type(body)?)
        };

        if found.is_atomic() {
            return Err(GrammarError::MalformedGrammar {
                node: placeholder,
                found,
            });
        }

        let record = std::mem::replace(&mut self.nodes[body.index()], Node::Forward(placeholder));
        self.nodes[placeholder.index()] = record;
        debug!("letrec: patched {placeholder} with {found} body {body}");
        Ok(placeholder)
    }
}

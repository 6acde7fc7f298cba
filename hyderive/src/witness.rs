//! Parse witnesses and the ordered sets they are collected in.
//!
//! Role
//! - [`Witness`] is one derivation attested by an expression for the empty
//!   string: nothing consumed ([`Witness::Nil`]), one matched symbol, or the
//!   pair built by a concatenation.
//! - [`ParseForest`] is an insertion-ordered, duplicate-free set of witnesses.
//!   Order matters: concatenation pairs forests position by position.
//! - [`Reducer`] is the pure transform carried by `Reduction` nodes.
//!
//! Equality
//! - Witnesses compare and hash structurally; two parses producing the same
//!   tree collapse into one forest entry.
use std::fmt;
use std::hash::Hash;
use std::mem;
use std::rc::Rc;

use indexmap::IndexSet;

/// One derivation witness.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Witness<S> {
    /// Canonical "nothing consumed" marker.
    Nil,
    /// A single matched symbol.
    Leaf(S),
    /// Two sub-witnesses joined by a concatenation.
    Pair(Rc<Witness<S>>, Rc<Witness<S>>),
}

impl<S> Witness<S> {
    pub fn leaf(symbol: S) -> Self {
        Witness::Leaf(symbol)
    }

    pub fn pair(first: Witness<S>, second: Witness<S>) -> Self {
        Witness::Pair(Rc::new(first), Rc::new(second))
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Witness::Nil)
    }

    /// Join two witnesses, dropping `Nil` operands.
    ///
    /// `cons(Nil, b) = b`, `cons(a, Nil) = a`, otherwise `Pair(a, b)`. This keeps
    /// base cases (repetitions that stopped, skipped optional parts) from
    /// piling up empty placeholders inside the tree.
    pub fn cons(first: Witness<S>, second: Witness<S>) -> Self {
        match (first, second) {
            (Witness::Nil, second) => second,
            (first, Witness::Nil) => first,
            (first, second) => Witness::pair(first, second),
        }
    }

    /// Matched symbols, left to right.
    pub fn leaves(&self) -> Vec<&S> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(w) = stack.pop() {
            match w {
                Witness::Nil => {}
                Witness::Leaf(s) => out.push(s),
                Witness::Pair(a, b) => {
                    stack.push(b);
                    stack.push(a);
                }
            }
        }
        out
    }
}

// Witness chains grow with the input, so dropping one must not recurse.
impl<S> Drop for Witness<S> {
    fn drop(&mut self) {
        let Witness::Pair(first, second) = self else {
            return;
        };
        if !(owns_pair(first) || owns_pair(second)) {
            return;
        }

        let nil = Rc::new(Witness::Nil);
        let mut stack = vec![
            mem::replace(first, Rc::clone(&nil)),
            mem::replace(second, Rc::clone(&nil)),
        ];
        while let Some(node) = stack.pop() {
            if let Ok(mut node) = Rc::try_unwrap(node) {
                if let Witness::Pair(first, second) = &mut node {
                    stack.push(mem::replace(first, Rc::clone(&nil)));
                    stack.push(mem::replace(second, Rc::clone(&nil)));
                }
            }
        }
    }
}

/// Whether dropping `witness` would free a nested pair.
fn owns_pair<S>(witness: &Rc<Witness<S>>) -> bool {
    Rc::strong_count(witness) == 1 && matches!(**witness, Witness::Pair(..))
}

impl<S: fmt::Display> fmt::Display for Witness<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Witness::Nil => f.write_str("[]"),
            Witness::Leaf(s) => write!(f, "{s}"),
            Witness::Pair(a, b) => write!(f, "[{a}, {b}]"),
        }
    }
}

/// Ordered set of witnesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseForest<S: Hash + Eq> {
    trees: IndexSet<Witness<S>>,
}

impl<S: Hash + Eq> Default for ParseForest<S> {
    fn default() -> Self {
        Self {
            trees: IndexSet::new(),
        }
    }
}

impl<S: Clone + Hash + Eq> ParseForest<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(witness: Witness<S>) -> Self {
        let mut trees = IndexSet::with_capacity(1);
        trees.insert(witness);
        Self { trees }
    }

    /// `{Nil}`: the forest of an expression that matched without consuming.
    pub fn trivial() -> Self {
        Self::singleton(Witness::Nil)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn is_trivial(&self) -> bool {
        self.trees.len() == 1 && self.trees[0].is_nil()
    }

    pub fn contains(&self, witness: &Witness<S>) -> bool {
        self.trees.contains(witness)
    }

    /// The only witness, if there is exactly one.
    pub fn single(&self) -> Option<&Witness<S>> {
        match self.trees.len() {
            1 => self.trees.first(),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Witness<S>> {
        self.trees.iter()
    }

    /// Returns `true` if the witness was not already present.
    pub fn insert(&mut self, witness: Witness<S>) -> bool {
        self.trees.insert(witness)
    }

    /// Ordered union: every witness of `self`, then the new ones of `other`.
    pub fn union(&self, other: &Self) -> Self {
        let mut trees = self.trees.clone();
        trees.extend(other.trees.iter().cloned());
        Self { trees }
    }

    /// Position-wise pairing used by concatenation.
    ///
    /// The i-th witness of `self` is consed with the i-th witness of `other`;
    /// the result is as long as the shorter operand (before deduplication).
    pub fn combine(&self, other: &Self) -> Self {
        self.trees
            .iter()
            .zip(other.trees.iter())
            .map(|(a, b)| Witness::cons(a.clone(), b.clone()))
            .collect()
    }

    pub fn map(&self, reducer: &Reducer<S>) -> Self {
        self.trees.iter().map(|w| reducer.apply(w)).collect()
    }
}

impl<S: Clone + Hash + Eq> FromIterator<Witness<S>> for ParseForest<S> {
    fn from_iter<I: IntoIterator<Item = Witness<S>>>(iter: I) -> Self {
        Self {
            trees: iter.into_iter().collect(),
        }
    }
}

impl<S: Hash + Eq> IntoIterator for ParseForest<S> {
    type Item = Witness<S>;
    type IntoIter = indexmap::set::IntoIter<Witness<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.into_iter()
    }
}

impl<'a, S: Hash + Eq> IntoIterator for &'a ParseForest<S> {
    type Item = &'a Witness<S>;
    type IntoIter = indexmap::set::Iter<'a, Witness<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.iter()
    }
}

/// Pure witness transform attached to a `Reduction` node.
///
/// Reducers are compared by identity: two reducers are the same only when they
/// share the same underlying closure.
pub struct Reducer<S> {
    func: Rc<dyn Fn(&Witness<S>) -> Witness<S>>,
}

impl<S> Clone for Reducer<S> {
    fn clone(&self) -> Self {
        Self {
            func: Rc::clone(&self.func),
        }
    }
}

impl<S> fmt::Debug for Reducer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reducer({:p})", Rc::as_ptr(&self.func))
    }
}

impl<S> Reducer<S> {
    #[inline]
    pub fn apply(&self, witness: &Witness<S>) -> Witness<S> {
        (self.func)(witness)
    }

    pub fn ptr_eq(&self, other: &Reducer<S>) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl<S: 'static> Reducer<S> {
    pub fn new(func: impl Fn(&Witness<S>) -> Witness<S> + 'static) -> Self {
        Self {
            func: Rc::new(func),
        }
    }

    /// `self ∘ inner`: apply `inner` first, then `self`.
    pub fn after(&self, inner: &Reducer<S>) -> Reducer<S> {
        let (outer, inner) = (self.clone(), inner.clone());
        Reducer::new(move |w| outer.apply(&inner.apply(w)))
    }

    /// `w ↦ cons(prefix, w)`.
    pub fn prefixed(prefix: Witness<S>) -> Reducer<S>
    where
        S: Clone,
    {
        Reducer::new(move |w| Witness::cons(prefix.clone(), w.clone()))
    }
}

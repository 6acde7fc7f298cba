//! Folding derivatives over an input.
//!
//! [`Grammar::recognize`] and [`Grammar::parse`] consume a whole input at once;
//! [`Session`] is the same fold driven one symbol at a time, which is how an
//! embedder feeds a token stream as it arrives.
use log::{debug, trace};

use crate::arena::Grammar;
use crate::error::{GrammarError, GrammarResult};
use crate::expr::{NodeId, Symbol};
use crate::witness::ParseForest;

/// Incremental derivative parse.
///
/// The session owns a residual expression: after feeding `w`, the residual
/// accepts exactly the suffixes `v` such that `w v` is accepted by the root.
/// Once the residual is the empty language no later symbol can help, and
/// further symbols are not differentiated.
///
/// ```
/// use hyderive::prelude::*;
///
/// let mut g: Grammar<char> = Grammar::new();
/// let a = g.char('a');
/// let b = g.char('b');
/// let ab = g.cat(a, b);
///
/// let mut session = g.session(ab);
/// session.feed('a').unwrap();
/// assert!(!session.accepts().unwrap());
/// session.feed('b').unwrap();
/// assert!(session.accepts().unwrap());
/// assert_eq!(session.consumed(), 2);
/// ```
pub struct Session<'g, S: Symbol> {
    grammar: &'g mut Grammar<S>,
    residual: NodeId,
    consumed: usize,
    compact: bool,
}

impl<'g, S: Symbol> Session<'g, S> {
    fn new(grammar: &'g mut Grammar<S>, root: NodeId, compact: bool) -> Self {
        Self {
            grammar,
            residual: root,
            consumed: 0,
            compact,
        }
    }

    /// Consume one symbol.
    pub fn feed(&mut self, symbol: S) -> GrammarResult<()> {
        match self.grammar.config.input_budget {
            Some(budget) if self.consumed >= budget => {
                return Err(GrammarError::InputBudgetExceeded { budget });
            }
            _ => {}
        }
        self.consumed += 1;

        if self.is_dead() {
            trace!("step {}: residual already empty, skipping {symbol:?}", self.consumed);
            return Ok(());
        }

        let derived = self.grammar.derive(&symbol, self.residual)?;
        self.residual = if self.compact {
            self.grammar.compact(derived)?
        } else {
            derived
        };
        trace!(
            "step {}: {symbol:?} -> residual {} ({} nodes allocated)",
            self.consumed,
            self.residual,
            self.grammar.node_count()
        );
        Ok(())
    }

    /// Consume symbols until the input ends or the residual dies.
    pub fn feed_all(&mut self, input: impl IntoIterator<Item = S>) -> GrammarResult<()> {
        for symbol in input {
            if self.is_dead() {
                break;
            }
            self.feed(symbol)?;
        }
        Ok(())
    }

    /// Whether the symbols fed so far form an accepted input.
    pub fn accepts(&mut self) -> GrammarResult<bool> {
        self.grammar.nullable(self.residual)
    }

    /// Parse trees of the symbols fed so far.
    ///
    /// Without compaction an ambiguous consumed prefix contributes only its
    /// first witness; [`Grammar::parse`] always compacts.
    pub fn forest(&mut self) -> GrammarResult<ParseForest<S>> {
        self.grammar.parse_forest(self.residual)
    }

    /// Whether no continuation of the input can be accepted any more.
    pub fn is_dead(&self) -> bool {
        self.grammar
            .resolve(self.residual)
            .is_ok_and(|residual| residual == self.grammar.empty())
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn residual(&self) -> NodeId {
        self.residual
    }

    pub fn grammar(&mut self) -> &mut Grammar<S> {
        self.grammar
    }
}

impl<S: Symbol> Grammar<S> {
    /// Start an incremental parse of `root`, compacting after every symbol when
    /// the configuration asks for it.
    pub fn session(&mut self, root: NodeId) -> Session<'_, S> {
        let compact = self.config.compact;
        Session::new(self, root, compact)
    }

    /// Whether `input` belongs to the language of `root`.
    ///
    /// Residuals are compacted between symbols unless the configuration turns
    /// compaction off; compaction never changes the language.
    pub fn recognize(
        &mut self,
        input: impl IntoIterator<Item = S>,
        root: NodeId,
    ) -> GrammarResult<bool> {
        let mut session = self.session(root);
        session.feed_all(input)?;
        let accepted = session.accepts()?;
        debug!(
            "recognize {root}: consumed {} symbols, accepted: {accepted}",
            session.consumed()
        );
        Ok(accepted)
    }

    /// Every parse tree of `input` against `root`; empty when `input` is
    /// rejected.
    ///
    /// Residuals are always compacted here, whatever the configuration says:
    /// the forest of a compacted residual keeps every witness of a consumed
    /// prefix, while the position-wise pairing of an uncompacted one keeps
    /// only the first.
    pub fn parse(
        &mut self,
        input: impl IntoIterator<Item = S>,
        root: NodeId,
    ) -> GrammarResult<ParseForest<S>> {
        let mut session = Session::new(self, root, true);
        session.feed_all(input)?;
        let forest = session.forest()?;
        debug!(
            "parse {root}: consumed {} symbols, {} trees",
            session.consumed(),
            forest.len()
        );
        Ok(forest)
    }
}

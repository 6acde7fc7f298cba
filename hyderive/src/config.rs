#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Knobs controlling how queries run against a [`Grammar`](crate::arena::Grammar).
///
/// - `input_budget`: hard cap on the number of symbols a single query (or
///   [`Session`](crate::Session)) may consume; `None` disables the cap.
///   Deep residual graphs recurse proportionally, so embedders facing untrusted
///   input should set it.
/// - `compact`: compact the residual after each step of
///   [`Grammar::recognize`](crate::arena::Grammar::recognize) and of sessions.
///   Turning it off keeps every intermediate node alive and is only useful to
///   observe the growth that compaction prevents. It never changes which inputs
///   are accepted, but an uncompacted session may report fewer parse trees.
///   [`Grammar::parse`](crate::arena::Grammar::parse) compacts regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GrammarConfig {
    pub input_budget: Option<usize>,
    pub compact: bool,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            input_budget: None,
            compact: true,
        }
    }
}

impl GrammarConfig {
    /// Same configuration with the given input budget.
    pub fn with_input_budget(mut self, budget: usize) -> Self {
        self.input_budget = Some(budget);
        self
    }

    /// Same configuration with compaction switched on or off.
    pub fn with_compaction(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }
}

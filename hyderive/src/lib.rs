//! Hyderive: recognition and parsing with derivatives of grammar expressions.
//!
//! A grammar is an expression built from a handful of operators: the empty
//! language, the empty string, single symbols, concatenation, union and
//! repetition. Differentiating an expression with respect to a symbol yields
//! the expression of what may follow that symbol; folding this over an input
//! and asking whether the final residual accepts the empty string decides
//! membership, and the witnesses of that empty-string derivation are the parse
//! trees.
//!
//! Self-reference
//!  - Rules may refer to themselves ([`Grammar::letrec`](arena::Grammar::letrec)),
//!    so expressions form cyclic graphs stored in an arena and addressed by
//!    [`NodeId`](expr::NodeId).
//!  - Derivatives are built with deferred children and memoized per node, and
//!    nullability, parse-forest extraction and compaction run as single-pass
//!    fixed points with a declared value for re-entered nodes. All of them
//!    terminate on cyclic graphs.
//!
//! Growth
//!  - Each derivative wraps the previous residual in new nodes. Residuals are
//!    compacted after every symbol (see [`config::GrammarConfig`]), which keeps
//!    their reachable size bounded for the usual grammars.
//!
//! Example
//! ```
//! use hyderive::prelude::*;
//!
//! let mut g: Grammar<char> = Grammar::new();
//! // sum = sum '+' '1' | '1'
//! let sum = g
//!     .letrec(|g, sum| {
//!         let plus = g.char('+');
//!         let one = g.char('1');
//!         let more = g.cat_seq([sum, plus, one]);
//!         let base = g.char('1');
//!         g.alt(more, base)
//!     })
//!     .unwrap();
//!
//! assert!(g.recognize("1+1+1".chars(), sum).unwrap());
//! assert!(!g.recognize("1+".chars(), sum).unwrap());
//!
//! let forest = g.parse("1+1".chars(), sum).unwrap();
//! assert_eq!(forest.len(), 1);
//! ```

/// Evaluation knobs.
pub mod config;
/// Error type shared by every query.
pub mod error;
/// Expression model: ids, kinds, child slots, constructors and views.
pub mod expr;
/// Arena owning the nodes and caches of one grammar.
pub mod arena;
/// Parse witnesses, parse forests and reducers.
pub mod witness;
/// Small support types.
pub mod utils;

mod compact;
mod derivative;
mod driver;
mod fix;
mod forest;
mod nullable;
mod walker;

pub use driver::Session;

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - The arena and its configuration
    //! - Node ids, child arguments and views
    //! - Witnesses, forests and reducers
    //! - Errors
    pub use crate::arena::Grammar;
    pub use crate::config::GrammarConfig;
    pub use crate::driver::Session;
    pub use crate::error::{GrammarError, GrammarResult, Violation};
    pub use crate::expr::{Child, ExprType, NodeId, Symbol, view::ExprView};
    pub use crate::witness::{ParseForest, Reducer, Witness};
}

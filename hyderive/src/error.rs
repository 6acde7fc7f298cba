use strum::{Display, EnumIs};
use thiserror::Error;

use crate::expr::{ExprType, NodeId};

/// Broken internal assumption detected while evaluating a grammar.
///
/// None of these can happen for expressions built through the public
/// constructors of a single [`Grammar`](crate::arena::Grammar); they abort the
/// query that observed them instead of producing a wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Violation {
    /// A `letrec` placeholder was read before it was back-patched.
    #[strum(to_string = "unpatched letrec placeholder")]
    UnpatchedPlaceholder,

    /// A deferred child slot was read while its own computation was running.
    #[strum(to_string = "deferred child read while it is being forced")]
    ReentrantForce,

    /// A derivative was requested for a key whose derivative is being built.
    #[strum(to_string = "re-entrant derivative computation")]
    ReentrantDerivative,

    /// The identifier does not address a node of this arena.
    #[strum(to_string = "node does not belong to this grammar")]
    ForeignNode,

    /// A child index outside of the node's arity was requested.
    #[strum(to_string = "child index out of range")]
    NoSuchChild,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, Error)]
pub enum GrammarError {
    /// The builder given to `letrec` returned an atomic expression.
    #[error(
        "The self-referential expression `{node}` must be defined through a compound operator, but the builder returned an atomic `{found}` expression."
    )]
    MalformedGrammar { node: NodeId, found: ExprType },

    /// Evaluation reached a state well-formed construction cannot produce.
    #[error("Internal invariant violated at node `{node}`: {violation}.")]
    InternalInvariantViolation { node: NodeId, violation: Violation },

    /// More symbols were fed than the configured input budget allows.
    #[error("The input exceeds the configured budget of {budget} symbols.")]
    InputBudgetExceeded { budget: usize },
}

impl GrammarError {
    pub(crate) fn violation(node: NodeId, violation: Violation) -> Self {
        GrammarError::InternalInvariantViolation { node, violation }
    }
}

pub type GrammarResult<T> = Result<T, GrammarError>;

use crate::arena::{Caches, Grammar};
use crate::error::GrammarResult;
use crate::expr::view::ExprView;
use crate::expr::{NodeId, Symbol};
use crate::fix::{FixFunction, FixTable};

pub(crate) struct Nullable;

impl<S: Symbol> FixFunction<S> for Nullable {
    type Value = bool;

    const NAME: &'static str = "nullable";

    fn table(caches: &mut Caches<S>) -> &mut FixTable<bool> {
        &mut caches.nullable
    }

    fn on_cycle(_: &Grammar<S>, _: NodeId) -> bool {
        false
    }

    fn step(grammar: &mut Grammar<S>, node: NodeId) -> GrammarResult<bool> {
        Ok(match grammar.view(node)? {
            ExprView::Empty | ExprView::Char(_) => false,
            ExprView::Eps(_) | ExprView::Rep(_) => true,
            ExprView::Delta(inner) | ExprView::Reduction(inner, _) => grammar.nullable(inner)?,
            ExprView::Alt(first, second) => grammar.nullable(first)? || grammar.nullable(second)?,
            ExprView::Cat(first, second) => grammar.nullable(first)? && grammar.nullable(second)?,
        })
    }
}

impl<S: Symbol> Grammar<S> {
    /// Whether `node` accepts the empty string.
    ///
    /// A node reached again while its own nullability is being decided counts
    /// as not nullable for that pass.
    pub fn nullable(&mut self, node: NodeId) -> GrammarResult<bool> {
        self.fix_eval::<Nullable>(node)
    }
}

use std::rc::Rc;

use crate::arena::{Caches, Grammar};
use crate::error::GrammarResult;
use crate::expr::view::ExprView;
use crate::expr::{NodeId, Symbol};
use crate::fix::{FixFunction, FixTable};
use crate::witness::ParseForest;

pub(crate) struct Forest;

impl<S: Symbol> FixFunction<S> for Forest {
    type Value = Rc<ParseForest<S>>;

    const NAME: &'static str = "parse_forest";

    fn table(caches: &mut Caches<S>) -> &mut FixTable<Self::Value> {
        &mut caches.forest
    }

    fn on_cycle(_: &Grammar<S>, _: NodeId) -> Self::Value {
        Rc::new(ParseForest::new())
    }

    fn step(grammar: &mut Grammar<S>, node: NodeId) -> GrammarResult<Self::Value> {
        Ok(match grammar.view(node)? {
            ExprView::Empty | ExprView::Char(_) => Rc::new(ParseForest::new()),
            ExprView::Eps(forest) => forest,
            ExprView::Rep(_) => Rc::new(ParseForest::trivial()),
            ExprView::Delta(inner) => grammar.forest_rc(inner)?,
            ExprView::Alt(first, second) => {
                let first = grammar.forest_rc(first)?;
                let second = grammar.forest_rc(second)?;
                match (first.is_empty(), second.is_empty()) {
                    (_, true) => first,
                    (true, false) => second,
                    (false, false) => Rc::new(first.union(&second)),
                }
            }
            ExprView::Cat(first, second) => {
                let first = grammar.forest_rc(first)?;
                let second = grammar.forest_rc(second)?;
                Rc::new(first.combine(&second))
            }
            ExprView::Reduction(inner, reducer) => {
                Rc::new(grammar.forest_rc(inner)?.map(&reducer))
            }
        })
    }
}

impl<S: Symbol> Grammar<S> {
    /// Witnesses of every way `node` derives the empty string, in discovery
    /// order without duplicates.
    ///
    /// Concatenation pairs the witnesses of its operands position by position,
    /// so an ambiguous prefix followed by an ambiguous suffix yields as many
    /// trees as the shorter side has.
    pub fn parse_forest(&mut self, node: NodeId) -> GrammarResult<ParseForest<S>> {
        Ok(ParseForest::clone(&*self.forest_rc(node)?))
    }

    pub(crate) fn forest_rc(&mut self, node: NodeId) -> GrammarResult<Rc<ParseForest<S>>> {
        self.fix_eval::<Forest>(node)
    }
}

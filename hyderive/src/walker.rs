//! Traversal and comparison of expression graphs.
//!
//! Graphs may be cyclic, so every traversal keeps a visited set and uses an
//! explicit stack instead of recursion. Reading a node forces its deferred
//! children: walking a residual materializes the part of it that is reachable.
//!
//! Example: counting the characters a grammar mentions
//! ```
//! use hyderive::prelude::*;
//!
//! let mut g: Grammar<char> = Grammar::new();
//! let list = g
//!     .letrec(|g, list| {
//!         let x = g.char('x');
//!         let more = g.cat(x, list);
//!         let done = g.eps();
//!         g.alt(more, done)
//!     })
//!     .unwrap();
//!
//! let mut chars = 0;
//! g.walk(list, |_, view| {
//!     if matches!(view, ExprView::Char(_)) {
//!         chars += 1;
//!     }
//! })
//! .unwrap();
//! assert_eq!(chars, 1);
//! ```
use std::collections::HashSet;

use smallvec::SmallVec;

use crate::arena::Grammar;
use crate::error::GrammarResult;
use crate::expr::view::ExprView;
use crate::expr::{NodeId, Symbol};

impl<S: Symbol> Grammar<S> {
    /// Visit every node reachable from `root` once, parents before children.
    pub fn walk(
        &mut self,
        root: NodeId,
        mut visit: impl FnMut(NodeId, &ExprView<S>),
    ) -> GrammarResult<()> {
        let root = self.resolve(root)?;
        let mut seen = HashSet::from([root]);
        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        stack.push(root);

        while let Some(id) = stack.pop() {
            let view = self.view(id)?;
            visit(id, &view);
            let children: SmallVec<[NodeId; 2]> = view.children().collect();
            for child in children.into_iter().rev() {
                if seen.insert(child) {
                    stack.push(child);
                }
            }
        }
        Ok(())
    }

    /// Number of distinct nodes reachable from `root`, `root` included.
    pub fn reachable_count(&mut self, root: NodeId) -> GrammarResult<usize> {
        let mut count = 0;
        self.walk(root, |_, _| count += 1)?;
        Ok(count)
    }

    /// Whether two (possibly cyclic) expressions have the same structure.
    ///
    /// Nodes match when they have the same kind, equal symbols or witness sets,
    /// the same reduction closure, and matching children. A pair already under
    /// comparison is assumed to match, so unrolling a cycle compares equal to
    /// the cycle itself.
    pub fn structurally_equal(&mut self, a: NodeId, b: NodeId) -> GrammarResult<bool> {
        let mut assumed: HashSet<(NodeId, NodeId)> = HashSet::new();
        let mut stack: SmallVec<[(NodeId, NodeId); 32]> = SmallVec::new();
        stack.push((self.resolve(a)?, self.resolve(b)?));

        while let Some((a, b)) = stack.pop() {
            if a == b || !assumed.insert((a, b)) {
                continue;
            }

            let same = match (self.view(a)?, self.view(b)?) {
                (ExprView::Empty, ExprView::Empty) => true,
                (ExprView::Eps(wa), ExprView::Eps(wb)) => wa == wb,
                (ExprView::Char(ca), ExprView::Char(cb)) => ca == cb,
                (ExprView::Cat(a1, a2), ExprView::Cat(b1, b2))
                | (ExprView::Alt(a1, a2), ExprView::Alt(b1, b2)) => {
                    stack.push((a2, b2));
                    stack.push((a1, b1));
                    true
                }
                (ExprView::Rep(ia), ExprView::Rep(ib))
                | (ExprView::Delta(ia), ExprView::Delta(ib)) => {
                    stack.push((ia, ib));
                    true
                }
                (ExprView::Reduction(ia, fa), ExprView::Reduction(ib, fb)) => {
                    stack.push((ia, ib));
                    fa.ptr_eq(&fb)
                }
                _ => false,
            };

            if !same {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

use hyderive::prelude::*;

mod common;

fn residual(g: &mut Grammar<char>, root: NodeId, input: &str) -> NodeId {
    let mut session = g.session(root);
    session.feed_all(input.chars()).unwrap();
    session.residual()
}

fn residual_size(root: fn(&mut Grammar<char>) -> NodeId, symbol: char, n: usize) -> usize {
    let mut g: Grammar<char> = Grammar::new();
    let root = root(&mut g);
    let input: String = std::iter::repeat_n(symbol, n).collect();
    let residual = residual(&mut g, root, &input);
    g.reachable_count(residual).unwrap()
}

#[test]
fn atomic_nodes_are_unchanged() {
    let mut g: Grammar<char> = Grammar::new();
    let a = g.char('a');
    let tagged = g.eps_witness(Witness::leaf('t'));
    for node in [g.empty(), g.eps(), a, tagged] {
        assert_eq!(g.compact(node).unwrap(), node);
    }
}

#[test]
fn dead_branches_are_removed() {
    let mut g: Grammar<char> = Grammar::new();
    let a = g.char('a');
    let b = g.char('b');
    let dead = g.cat(Child::deferred(|g: &mut Grammar<char>| Ok(g.empty())), b);
    let either = g.alt(a, dead);

    assert!(g.empty_like(dead).unwrap());
    assert_eq!(g.compact(either).unwrap(), a);
    assert_eq!(g.compact(dead).unwrap(), g.empty());
}

#[test]
fn empty_string_expressions_become_eps() {
    let mut g: Grammar<char> = Grammar::new();
    let t = g.eps_witness(Witness::leaf('t'));
    let u = g.eps_witness(Witness::leaf('u'));
    let pair = g.cat(t, u);

    assert!(g.eps_like(pair).unwrap());
    let compacted = g.compact(pair).unwrap();
    let view = g.view(compacted).unwrap();
    assert_eq!(view.r#type(), ExprType::Eps);
    assert_eq!(common::rendered(view.forest().unwrap()), ["[t, u]"]);
}

#[test]
fn consumed_prefix_folds_into_reduction() {
    let mut g: Grammar<char> = Grammar::new();
    let t = g.eps_witness(Witness::leaf('t'));
    let x = g.char('x');
    let y = g.char('y');
    let xy = g.alt(x, y);
    let cat = g.cat(t, xy);

    let compacted = g.compact(cat).unwrap();
    assert_eq!(g.expr_type(compacted).unwrap(), ExprType::Reduction);
    assert_eq!(common::rendered(&g.parse("y".chars(), compacted).unwrap()), ["[t, y]"]);
}

#[test]
fn compaction_is_idempotent() {
    let mut g: Grammar<char> = Grammar::new();
    let exp = common::arithmetic(&mut g);
    let brackets = common::brackets(&mut g);
    let integer = common::integer(&mut g);

    for (root, input) in [(exp, "1+(1"), (brackets, "[["), (integer, "-1")] {
        let derived = {
            let mut node = root;
            for c in input.chars() {
                node = g.derive(&c, node).unwrap();
            }
            node
        };
        let once = g.compact(derived).unwrap();
        let twice = g.compact(once).unwrap();
        assert!(g.structurally_equal(once, twice).unwrap(), "{input:?}");
    }
}

#[test]
fn compaction_preserves_the_language() {
    let mut g: Grammar<char> = Grammar::new();
    let exp = common::arithmetic(&mut g);
    let d = g.derive(&'1', exp).unwrap();
    let d = g.derive(&'+', d).unwrap();
    let compacted = g.compact(d).unwrap();

    for (suffix, expected) in [("1", true), ("(2)", true), (")", false), ("1*", true)] {
        assert_eq!(g.recognize(suffix.chars(), d).unwrap(), expected, "{suffix:?}");
        assert_eq!(g.recognize(suffix.chars(), compacted).unwrap(), expected, "{suffix:?}");
    }
}

#[test]
fn residual_size_is_bounded_for_regular_grammars() {
    let cases: [(fn(&mut Grammar<char>) -> NodeId, char); 3] = [
        (common::number, '7'),
        (common::right_recursive, 'x'),
        (|g| {
            let x = g.char('x');
            g.rep(x)
        }, 'x'),
    ];

    for (root, symbol) in cases {
        let sizes: Vec<usize> = [5, 10, 20]
            .into_iter()
            .map(|n| residual_size(root, symbol, n))
            .collect();
        assert_eq!(sizes[0], sizes[1], "{sizes:?}");
        assert_eq!(sizes[1], sizes[2], "{sizes:?}");
    }
}

#[test]
fn residual_grows_without_compaction() {
    let size = |n: usize| {
        let config = GrammarConfig::default().with_compaction(false);
        let mut g: Grammar<char> = Grammar::with_config(config);
        let list = common::right_recursive(&mut g);
        let input: String = std::iter::repeat_n('x', n).collect();
        let residual = residual(&mut g, list, &input);
        g.reachable_count(residual).unwrap()
    };

    assert!(size(8) > size(4));
}

use std::cell::Cell;
use std::rc::Rc;

use hyderive::prelude::*;

mod common;

#[test]
fn walk_visits_each_node_once_parents_first() {
    let mut g: Grammar<char> = Grammar::new();
    let list = common::right_recursive(&mut g);

    let mut order = Vec::new();
    g.walk(list, |id, view| order.push((id, view.r#type()))).unwrap();

    let types: Vec<ExprType> = order.iter().map(|(_, t)| *t).collect();
    assert_eq!(types, [ExprType::Cat, ExprType::Char, ExprType::Alt, ExprType::Eps]);
    assert_eq!(order[0].0, list);
    assert_eq!(g.reachable_count(list).unwrap(), 4);
}

#[test]
fn walk_forces_deferred_children() {
    let mut g: Grammar<char> = Grammar::new();
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    let a = g.char('a');
    let cat = g.cat(
        a,
        Child::deferred(move |g: &mut Grammar<char>| {
            counter.set(counter.get() + 1);
            Ok(g.char('b'))
        }),
    );

    assert_eq!(runs.get(), 0);
    assert_eq!(g.reachable_count(cat).unwrap(), 3);
    assert_eq!(runs.get(), 1);
}

#[test]
fn shared_subexpressions_are_counted_once() {
    let mut g: Grammar<char> = Grammar::new();
    let digit = common::digit(&mut g);
    let twice = g.cat(digit, digit);

    let digits = g.reachable_count(digit).unwrap();
    assert_eq!(g.reachable_count(twice).unwrap(), digits + 1);
}

#[test]
fn separately_built_grammars_are_equal() {
    let mut g: Grammar<char> = Grammar::new();
    let first = common::arithmetic(&mut g);
    let second = common::arithmetic(&mut g);

    assert_ne!(first, second);
    assert!(g.structurally_equal(first, second).unwrap());
}

#[test]
fn unrolled_cycle_equals_the_cycle() {
    let mut g: Grammar<char> = Grammar::new();
    let list = common::right_recursive(&mut g);
    let x = g.char('x');
    let eps = g.eps();
    let tail = g.alt(eps, list);
    let unrolled = g.cat(x, tail);

    assert!(g.structurally_equal(unrolled, list).unwrap());
    assert!(g.structurally_equal(list, unrolled).unwrap());
}

#[test]
fn different_shapes_are_not_equal() {
    let mut g: Grammar<char> = Grammar::new();
    let right = common::right_recursive(&mut g);
    let left = common::left_recursive(&mut g);
    let brackets = common::brackets(&mut g);
    let a = g.char('a');
    let b = g.char('b');

    assert!(!g.structurally_equal(right, left).unwrap());
    assert!(!g.structurally_equal(right, brackets).unwrap());
    assert!(!g.structurally_equal(a, b).unwrap());
}

#[test]
fn reductions_compare_by_closure_identity() {
    let mut g: Grammar<char> = Grammar::new();
    let a = g.char('a');
    let tag = |w: &Witness<char>| Witness::pair(Witness::leaf('#'), w.clone());

    let shared = Reducer::new(tag);
    let first = g.reduction_with(a, shared.clone());
    let second = g.reduction_with(a, shared);
    assert!(g.structurally_equal(first, second).unwrap());

    let third = g.reduction(a, tag);
    assert!(!g.structurally_equal(first, third).unwrap());
}

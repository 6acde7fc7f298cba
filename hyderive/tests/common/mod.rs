#![allow(dead_code)]

use hyderive::prelude::*;

pub fn digit(g: &mut Grammar<char>) -> NodeId {
    let digits: Vec<NodeId> = ('0'..='9').map(|c| g.char(c)).collect();
    g.alt_seq(digits)
}

/// Zero or more digits.
pub fn number(g: &mut Grammar<char>) -> NodeId {
    let digit = digit(g);
    g.rep(digit)
}

/// Optional minus sign, one digit, then any number of digits.
pub fn integer(g: &mut Grammar<char>) -> NodeId {
    let eps = g.eps();
    let minus = g.char('-');
    let sign = g.alt(eps, minus);
    let digit = digit(g);
    let rest = number(g);
    g.cat_seq([sign, digit, rest])
}

/// L = x (ε | L)
pub fn right_recursive(g: &mut Grammar<char>) -> NodeId {
    g.letrec(|g, list| {
        let x = g.char('x');
        let eps = g.eps();
        let tail = g.alt(eps, list);
        g.cat(x, tail)
    })
    .unwrap()
}

/// L = (ε | L) x
pub fn left_recursive(g: &mut Grammar<char>) -> NodeId {
    g.letrec(|g, list| {
        let eps = g.eps();
        let head = g.alt(eps, list);
        let x = g.char('x');
        g.cat(head, x)
    })
    .unwrap()
}

/// L = '[' (ε | L) ']'
pub fn brackets(g: &mut Grammar<char>) -> NodeId {
    g.letrec(|g, nested| {
        let open = g.char('[');
        let eps = g.eps();
        let inner = g.alt(eps, nested);
        let close = g.char(']');
        g.cat_seq([open, inner, close])
    })
    .unwrap()
}

fn binary_rule(g: &mut Grammar<char>, operand: NodeId, op: char) -> NodeId {
    let op = g.char(op);
    g.cat_seq([operand, op, operand])
}

fn parenthesized(g: &mut Grammar<char>, inner: NodeId) -> NodeId {
    let open = g.char('(');
    let close = g.char(')');
    g.cat_seq([open, inner, close])
}

/// Term → Term * Term | Term / Term | ( Term ) | number
/// Exp  → Exp + Exp | Exp - Exp | ( Exp ) | Term
pub fn arithmetic(g: &mut Grammar<char>) -> NodeId {
    let term = g
        .letrec(|g, term| {
            let mul = binary_rule(g, term, '*');
            let div = binary_rule(g, term, '/');
            let group = parenthesized(g, term);
            let number = number(g);
            g.alt_seq([mul, div, group, number])
        })
        .unwrap();

    g.letrec(|g, exp| {
        let add = binary_rule(g, exp, '+');
        let sub = binary_rule(g, exp, '-');
        let group = parenthesized(g, exp);
        g.alt_seq([add, sub, group, term])
    })
    .unwrap()
}

/// Parse trees rendered and sorted, for order-independent comparisons.
pub fn rendered(forest: &ParseForest<char>) -> Vec<String> {
    let mut trees: Vec<String> = forest.iter().map(ToString::to_string).collect();
    trees.sort();
    trees
}

use hyderive::prelude::*;

mod common;

fn parse(g: &mut Grammar<char>, input: &str, root: NodeId) -> Vec<String> {
    common::rendered(&g.parse(input.chars(), root).unwrap())
}

#[test]
fn regular_witness_shapes() {
    let mut g: Grammar<char> = Grammar::new();
    let number = common::number(&mut g);
    let integer = common::integer(&mut g);
    let x = g.char('x');
    let xs = g.rep(x);

    assert_eq!(parse(&mut g, "12", number), ["[1, 2]"]);
    assert_eq!(parse(&mut g, "-12", integer), ["[[-, 1], 2]"]);
    assert_eq!(parse(&mut g, "xxx", xs), ["[x, [x, x]]"]);
}

#[test]
fn recursive_witness_shapes() {
    let mut g: Grammar<char> = Grammar::new();
    let right = common::right_recursive(&mut g);
    let left = common::left_recursive(&mut g);
    let brackets = common::brackets(&mut g);

    assert_eq!(parse(&mut g, "xx", right), ["[x, x]"]);
    assert_eq!(parse(&mut g, "xx", left), ["[x, x]"]);
    assert_eq!(parse(&mut g, "xxx", right), ["[x, [x, x]]"]);
    assert_eq!(parse(&mut g, "xxx", left), ["[[x, x], x]"]);
    assert_eq!(parse(&mut g, "[[]]", brackets), ["[[[, [[, ]]], ]]"]);
}

#[test]
fn ambiguous_sum_has_two_trees() {
    let mut g: Grammar<char> = Grammar::new();
    let exp = common::arithmetic(&mut g);

    assert_eq!(
        parse(&mut g, "1+1-1", exp),
        ["[[1, +], [[1, -], 1]]", "[[[[1, +], 1], -], 1]"]
    );
}

#[test]
fn precedence_levels_disambiguate() {
    let mut g: Grammar<char> = Grammar::new();
    let exp = common::arithmetic(&mut g);

    assert_eq!(parse(&mut g, "1+1*1", exp), ["[[1, +], [[1, *], 1]]"]);
    assert_eq!(
        parse(&mut g, "1+(1-1)", exp),
        ["[[1, +], [[(, [[1, -], 1]], )]]"]
    );
}

#[test]
fn rejected_input_has_no_trees() {
    let mut g: Grammar<char> = Grammar::new();
    let integer = common::integer(&mut g);
    let brackets = common::brackets(&mut g);

    assert!(g.parse("1-".chars(), integer).unwrap().is_empty());
    assert!(g.parse("[[]".chars(), brackets).unwrap().is_empty());
    assert!(g.parse("".chars(), brackets).unwrap().is_empty());
}

#[test]
fn empty_input_yields_the_nullable_witnesses() {
    let mut g: Grammar<char> = Grammar::new();
    let number = common::number(&mut g);
    let tagged = g.eps_witness(Witness::leaf('t'));
    let eps = g.eps();
    let either = g.alt(tagged, eps);

    assert_eq!(parse(&mut g, "", number), ["[]"]);
    assert_eq!(g.parse_forest(either).unwrap().len(), 2);
    let first = g.parse_forest(either).unwrap().iter().next().cloned();
    assert_eq!(first, Some(Witness::leaf('t')));
}

#[test]
fn reductions_shape_the_trees() {
    let mut g: Grammar<char> = Grammar::new();
    let digit = common::digit(&mut g);
    let digits = g.rep(digit);
    // Collect the matched digits into one leaf per number.
    let number = g.reduction(digits, |w: &Witness<char>| {
        let text: String = w.leaves().into_iter().collect();
        Witness::leaf(text.parse::<u32>().map_or('?', |n| char::from_digit(n % 10, 10).unwrap_or('?')))
    });

    assert_eq!(parse(&mut g, "47", number), ["7"]);
    assert_eq!(parse(&mut g, "", number), ["?"]);
}

#[test]
fn forest_of_a_recursive_rule_on_empty_input() {
    let mut g: Grammar<char> = Grammar::new();
    let optional_list = g
        .letrec(|g, list| {
            let x = g.char('x');
            let more = g.cat(x, list);
            let eps = g.eps();
            g.alt(eps, more)
        })
        .unwrap();

    let forest = g.parse_forest(optional_list).unwrap();
    assert!(forest.is_trivial());
    assert_eq!(parse(&mut g, "xx", optional_list), ["[x, x]"]);
}

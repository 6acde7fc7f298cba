use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use hyderive::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn number(g: &mut Grammar<char>) -> NodeId {
    let digits: Vec<NodeId> = ('0'..='9').map(|c| g.char(c)).collect();
    let digit = g.alt_seq(digits);
    g.rep(digit)
}

fn brackets(g: &mut Grammar<char>) -> NodeId {
    g.letrec(|g, nested| {
        let open = g.char('[');
        let eps = g.eps();
        let inner = g.alt(eps, nested);
        let close = g.char(']');
        g.cat_seq([open, inner, close])
    })
    .unwrap()
}

/// Exp → Exp + Exp | Exp * Exp | ( Exp ) | number
fn arithmetic(g: &mut Grammar<char>) -> NodeId {
    let number = number(g);
    g.letrec(|g, exp| {
        let plus = g.char('+');
        let add = g.cat_seq([exp, plus, exp]);
        let star = g.char('*');
        let mul = g.cat_seq([exp, star, exp]);
        let open = g.char('(');
        let close = g.char(')');
        let group = g.cat_seq([open, exp, close]);
        g.alt_seq([add, mul, group, number])
    })
    .unwrap()
}

fn random_expression(rng: &mut impl Rng, budget: usize) -> String {
    if budget == 0 || rng.random_bool(0.3) {
        // Leaf: a short number
        return (0..rng.random_range(1..=3))
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();
    }

    match rng.random_range(0..3) {
        0 => format!("({})", random_expression(rng, budget - 1)),
        1 => format!(
            "{}+{}",
            random_expression(rng, budget - 1),
            random_expression(rng, budget - 1)
        ),
        _ => format!(
            "{}*{}",
            random_expression(rng, budget - 1),
            random_expression(rng, budget - 1)
        ),
    }
}

fn bench_recognize_regular(c: &mut Criterion) {
    let mut group = c.benchmark_group("recognize_number");
    for len in [16, 64, 256] {
        let input: String = (0..len).map(|i| char::from(b'0' + (i % 10) as u8)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &input, |b, input| {
            b.iter(|| {
                let mut g: Grammar<char> = Grammar::new();
                let root = number(&mut g);
                black_box(g.recognize(input.chars(), root).unwrap());
            })
        });
    }
    group.finish();
}

fn bench_recognize_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("recognize_brackets");
    for depth in [4, 16, 64] {
        let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &input, |b, input| {
            b.iter(|| {
                let mut g: Grammar<char> = Grammar::new();
                let root = brackets(&mut g);
                black_box(g.recognize(input.chars(), root).unwrap());
            })
        });
    }
    group.finish();
}

fn bench_parse_arithmetic(c: &mut Criterion) {
    // Seeded for determinism across runs.
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    let simple = "1+2*3".to_string();
    let complex = random_expression(&mut rng, 3);

    c.bench_function("parse_arithmetic_simple", |b| {
        b.iter(|| {
            let mut g: Grammar<char> = Grammar::new();
            let root = arithmetic(&mut g);
            black_box(g.parse(simple.chars(), root).unwrap());
        })
    });

    c.bench_function("recognize_arithmetic_random", |b| {
        b.iter(|| {
            let mut g: Grammar<char> = Grammar::new();
            let root = arithmetic(&mut g);
            black_box(g.recognize(complex.chars(), root).unwrap());
        })
    });
}

fn bench_session_feed(c: &mut Criterion) {
    c.bench_function("session_feed_number_1k", |b| {
        b.iter(|| {
            let mut g: Grammar<char> = Grammar::new();
            let root = number(&mut g);
            let mut session = g.session(root);
            for i in 0..1000u32 {
                session.feed(char::from(b'0' + (i % 10) as u8)).unwrap();
            }
            black_box(session.accepts().unwrap());
        })
    });
}

criterion_group!(
    benches,
    bench_recognize_regular,
    bench_recognize_nested,
    bench_parse_arithmetic,
    bench_session_feed,
);
criterion_main!(benches);

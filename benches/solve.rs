use xsolve::{ac3, extract_slots, CancelToken, ConstraintGraph, DomainStore, Grid, Solver, WordIndex};

use criterion::Benchmark;
use criterion::{criterion_group, criterion_main, Criterion};

fn word_square_words() -> Vec<String> {
    ["BIT", "ARE", "TEN", "BAT", "IRE", "CAT", "DOG", "EAR", "TOE", "NET"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let open_square = Grid::parse("...\n...\n...").unwrap();

    let grid = open_square.clone();
    c.bench(
        "solve",
        Benchmark::new("extract_slots_3x3", move |b| {
            b.iter(|| extract_slots(&grid));
        }),
    );

    let grid = open_square.clone();
    let index = WordIndex::build(word_square_words());
    c.bench(
        "solve",
        Benchmark::new("ac3_3x3", move |b| {
            let (slots, prefilled) = extract_slots(&grid);
            let graph = ConstraintGraph::build(&slots);
            let cancel = CancelToken::new();
            b.iter(|| {
                let mut domains = DomainStore::build(&slots, &prefilled, &index);
                ac3(&mut domains, &graph, &slots, &prefilled, &cancel)
            });
        }),
    );

    let grid = open_square;
    let index = WordIndex::build(word_square_words());
    c.bench(
        "solve",
        Benchmark::new("solve_3x3_word_square", move |b| {
            b.iter(|| {
                let mut solver = Solver::prepare(&grid, &index);
                solver.solve()
            });
        }),
    );

    let grid = Grid::parse("....\n....\n....\n....").unwrap();
    let index = WordIndex::build(
        [
            "CARD", "AREA", "REAR", "DART", "BONE", "TACO", "DIRE", "ACRE", "EBON",
        ]
        .iter()
        .map(|w| w.to_string())
        .collect(),
    );
    c.bench(
        "solve",
        Benchmark::new("solve_4x4_word_square", move |b| {
            b.iter(|| {
                let mut solver = Solver::prepare(&grid, &index);
                solver.solve()
            });
        }),
    );
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

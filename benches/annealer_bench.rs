use criterion::{criterion_group, criterion_main, Criterion};
use metropolis::generator::ClueSet;
use metropolis::geometry::{ConstraintGroups, GridSize};
use metropolis::optimizer::{
    Annealer, AnnealerOptions, MoveGenerator, PairSwap, PointMutation, StopPolicy,
};
use metropolis::oracle::UniquenessOracle;
use metropolis::scorer::magic::MagicSquareCost;
use metropolis::scorer::sudoku::{self, SudokuCost, SOLVE_TEMPERATURE};
use metropolis::scorer::CostModel;
use metropolis::RandomSource;
use std::hint::black_box;

const PUZZLE: &str = "\
000081000002007800053000170370000000600000003000000024069000230005900400000650000";
const SOLUTION: &str = "\
746281359912537846853496172374125698628749513591368724169874235285913467437652981";

fn digits(text: &str) -> Vec<u8> {
    text.bytes().map(|b| b - b'0').collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let groups = ConstraintGroups::sudoku(3, 3).expect("classic grid");
    let givens = digits(PUZZLE);
    let solution = digits(SOLUTION);

    let mut rng = RandomSource::with_seed(1);
    let start = sudoku::random_start(&groups, &givens, &mut rng).expect("valid puzzle");
    let model = SudokuCost::for_config(&groups, &start).expect("valid mask");
    let mut moves = PointMutation::new(&groups.domain()).expect("nine digits");

    c.bench_function("sudoku delta", |b| {
        b.iter(|| {
            let mv = moves.propose(&start, &mut rng).expect("open cells");
            model.delta(black_box(&start), black_box(&mv))
        })
    });

    c.bench_function("sudoku full cost", |b| {
        b.iter(|| model.cost(black_box(&start)))
    });

    let options = AnnealerOptions {
        temperature: SOLVE_TEMPERATURE,
        stop: StopPolicy::default().with_max_steps(100_000),
        ..Default::default()
    };
    let annealer = Annealer::new(options).expect("valid options");
    c.bench_function("sudoku anneal (100k steps)", |b| {
        b.iter(|| {
            annealer
                .run(start.clone(), &model, &mut moves, &mut rng, &())
                .expect("run")
                .best
                .cost
        })
    });

    let magic = MagicSquareCost::new(10).expect("order 10");
    let square = magic.random_start(&mut rng);
    let annealer = Annealer::new(AnnealerOptions {
        temperature: 1.0,
        stop: StopPolicy::default().with_max_steps(100_000),
        ..Default::default()
    })
    .expect("valid options");
    c.bench_function("magic 10x10 anneal (100k steps)", |b| {
        b.iter(|| {
            annealer
                .run(square.clone(), &magic, &mut PairSwap::default(), &mut rng, &())
                .expect("run")
                .best
                .cost
        })
    });

    let oracle = UniquenessOracle::new(&groups);
    let mask: Vec<bool> = givens.iter().map(|&v| v != 0).collect();
    let clues = ClueSet::from_mask(GridSize::square(9), mask).expect("symmetric");
    c.bench_function("oracle is_unique (24 clues)", |b| {
        b.iter(|| oracle.is_unique(black_box(&clues), black_box(&solution)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

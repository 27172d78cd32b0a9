use criterion::{black_box, criterion_group, criterion_main, Criterion};
use match3_board::core::matcher::board_has_match;
use match3_board::core::{fill_board, find_valid_swap, EngineConfig, GameState, Geometry, SimpleRng};
use match3_board::types::{Adjacency, Color, StateTag};

fn bench_fill(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);

    c.bench_function("fill_board_8x8", |b| {
        b.iter(|| fill_board(black_box(Geometry::new(8, 8)), &Color::ALL, &mut rng, 0.125))
    });
}

fn bench_match_scan(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);
    let board = fill_board(Geometry::new(8, 8), &Color::ALL, &mut rng, 0.125).unwrap();

    c.bench_function("board_has_match", |b| {
        b.iter(|| board_has_match(black_box(&board)))
    });
    c.bench_function("find_valid_swap", |b| {
        b.iter(|| find_valid_swap(black_box(&board), Adjacency::Orthogonal))
    });
}

fn bench_full_turn(c: &mut Criterion) {
    let config = EngineConfig::default().with_seed(12345);

    c.bench_function("full_turn_default_pacing", |b| {
        b.iter_batched(
            || {
                let mut game = GameState::new(config.clone()).unwrap();
                if let Some((first, second)) = game.valid_swap() {
                    game.try_select(first.x, first.y);
                    game.try_select(second.x, second.y);
                }
                game
            },
            |mut game| {
                while game.advance().unwrap() != StateTag::Idle {}
                game
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_fill, bench_match_scan, bench_full_turn);
criterion_main!(benches);

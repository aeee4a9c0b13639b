use adaptive_chess::search::{evaluate_position, order_moves, search_for_side_to_move};
use adaptive_chess::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const ITALIAN: &str = "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn bench_evaluate(c: &mut Criterion) {
    let pos = Position::from_fen(ITALIAN).unwrap();
    c.bench_function("evaluate_position_italian", |b| {
        b.iter(|| black_box(evaluate_position(&pos)))
    });
}

fn bench_order_moves(c: &mut Criterion) {
    let mut pos = Position::from_fen(ITALIAN).unwrap();
    let moves = pos.legal_moves();
    c.bench_function("order_moves_italian", |b| {
        b.iter(|| {
            let mut ordered = moves.clone();
            order_moves(&mut pos, &mut ordered);
            black_box(ordered)
        })
    });
}

fn bench_search_depths(c: &mut Criterion) {
    let mut group = c.benchmark_group("alpha_beta_italian");
    group.sample_size(10);
    for depth in 1..=4u8 {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            let mut pos = Position::from_fen(ITALIAN).unwrap();
            b.iter(|| black_box(search_for_side_to_move(&mut pos, depth)))
        });
    }
    group.finish();
}

fn bench_select_move_by_rating(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_move_italian");
    group.sample_size(10);
    let cases: [(Strategy, &[i32]); 2] = [
        (Strategy::Search, &[400, 1200, 1600]),
        (Strategy::Tiered, &[400, 1200, 1800, 2500]),
    ];
    for (strategy, ratings) in cases {
        let engine = AdaptiveEngine::new(strategy);
        for &rating in ratings {
            let id = BenchmarkId::new(strategy.name(), rating);
            group.bench_with_input(id, &rating, |b, &rating| {
                let mut pos = Position::from_fen(ITALIAN).unwrap();
                let mut rng = ChaCha8Rng::seed_from_u64(1);
                b.iter(|| black_box(engine.select_move(&mut pos, Rating::new(rating), &mut rng)))
            });
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_order_moves,
    bench_search_depths,
    bench_select_move_by_rating,
);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chesscore::{perft, Position};

pub fn benchmark_perft(c: &mut Criterion) {
    let pos = Position::start();
    c.bench_function("perft start position depth 4", |b| {
        b.iter(|| perft(black_box(&pos), 4))
    });
}

pub fn benchmark_move_generation(c: &mut Criterion) {
    let pos = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
        .unwrap();
    c.bench_function("gen moves midgame", |b| {
        b.iter(|| black_box(&pos).gen_moves())
    });
}

criterion_group!(benches, benchmark_perft, benchmark_move_generation);
criterion_main!(benches);

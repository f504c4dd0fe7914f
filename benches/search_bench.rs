use velha::engine::TranspositionTable;
use velha::search::{choose_move, select_move, PriorBias, SearchConfig};
use velha::{Board, Mark};

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(2));
    targets =
        searching_empty_board_cold,
        searching_reply_cold,
        searching_reply_warm,
        searching_empty_board_parallel,
}

fn searching_empty_board_cold(c: &mut criterion::Criterion) {
    let board = Board::new();
    let config = SearchConfig { maximizer: Mark::X, opening_shortcut: false, ..SearchConfig::default() };
    c.bench_function("full search from the empty board (cold cache)", |b| {
        b.iter(|| {
            let mut tt = TranspositionTable::new();
            select_move(&board, &config, &PriorBias::default(), &mut tt)
        })
    });
}

fn searching_reply_cold(c: &mut criterion::Criterion) {
    let board: Board = "X--------".parse().unwrap();
    c.bench_function("reply to a corner opening (cold cache)", |b| {
        b.iter(|| {
            let mut tt = TranspositionTable::new();
            choose_move(&board, Mark::O, &PriorBias::default(), &mut tt)
        })
    });
}

fn searching_reply_warm(c: &mut criterion::Criterion) {
    let board: Board = "X--------".parse().unwrap();
    let mut tt = TranspositionTable::new();
    choose_move(&board, Mark::O, &PriorBias::default(), &mut tt);
    c.bench_function("reply to a corner opening (warm cache)", |b| {
        b.iter(|| choose_move(&board, Mark::O, &PriorBias::default(), &mut tt))
    });
}

fn searching_empty_board_parallel(c: &mut criterion::Criterion) {
    let board = Board::new();
    let config = SearchConfig {
        maximizer: Mark::X,
        opening_shortcut: false,
        parallel_root: true,
        ..SearchConfig::default()
    };
    c.bench_function("full search from the empty board (parallel root)", |b| {
        b.iter(|| {
            let mut tt = TranspositionTable::new();
            select_move(&board, &config, &PriorBias::default(), &mut tt)
        })
    });
}

//! Testes de integração do motor: optimalidade, cache e garantias de jogo.

use std::collections::{HashMap, HashSet};
use velha::engine::TranspositionTable;
use velha::search::{choose_move, select_move, PriorBias, SearchConfig, Selection};
use velha::{game_outcome, is_legal_move, Board, GameOutcome, Mark, Move, Score};

/// Minimax sem poda nem cache, com memo por (tabuleiro, ply, lado).
struct Reference {
    maximizer: Mark,
    memo: HashMap<(Board, u8, bool), Score>,
}

impl Reference {
    fn new(maximizer: Mark) -> Self {
        Reference { maximizer, memo: HashMap::new() }
    }

    fn value(&mut self, board: &Board, ply: u8, maximizing: bool) -> Score {
        match board.outcome() {
            GameOutcome::Winner(mark) if mark == self.maximizer => return 10 - ply as Score,
            GameOutcome::Winner(_) => return -(10 - ply as Score),
            GameOutcome::Draw => return 0,
            GameOutcome::InProgress => {}
        }
        if let Some(&v) = self.memo.get(&(*board, ply, maximizing)) {
            return v;
        }
        let mark = if maximizing { self.maximizer } else { !self.maximizer };
        let children = board.legal_moves().into_iter().map(|mv| {
            let mut next = *board;
            next.play(mv.index(), mark).unwrap();
            next
        });
        let scores: Vec<Score> = children.map(|next| self.value(&next, ply + 1, !maximizing)).collect();
        let v = if maximizing { *scores.iter().max().unwrap() } else { *scores.iter().min().unwrap() };
        self.memo.insert((*board, ply, maximizing), v);
        v
    }

    /// Score de cada lance da raiz, como o motor o define.
    fn root_scores(&mut self, board: &Board) -> Vec<(Move, Score)> {
        board
            .legal_moves()
            .into_iter()
            .map(|mv| {
                let mut next = *board;
                next.play(mv.index(), self.maximizer).unwrap();
                (mv, self.value(&next, 0, false))
            })
            .collect()
    }
}

fn reachable_positions() -> Vec<Board> {
    fn walk(board: Board, seen: &mut HashSet<Board>) {
        if !seen.insert(board) || board.outcome().is_terminal() {
            return;
        }
        let mark = board.side_to_move();
        for mv in board.legal_moves() {
            let mut next = board;
            next.play(mv.index(), mark).unwrap();
            walk(next, seen);
        }
    }
    let mut seen = HashSet::new();
    walk(Board::new(), &mut seen);
    let mut positions: Vec<Board> = seen.into_iter().collect();
    positions.sort_by_key(|b| (9 - b.empty_count(), b.key(Mark::X)));
    positions
}

fn full_search(maximizer: Mark) -> SearchConfig {
    SearchConfig { maximizer, opening_shortcut: false, ..SearchConfig::default() }
}

#[test]
fn test_reachable_position_count() {
    assert_eq!(reachable_positions().len(), 5478);
}

#[test]
fn test_matches_reference_minimax_everywhere() {
    let mut references = [Reference::new(Mark::X), Reference::new(Mark::O)];
    let mut checked = 0;

    for board in reachable_positions().into_iter().filter(|b| !b.outcome().is_terminal()) {
        let maximizer = board.side_to_move();
        let reference = &mut references[maximizer as usize];
        let expected = reference.root_scores(&board);
        let best = expected.iter().map(|&(_, s)| s).max().unwrap();
        let first_best = expected.iter().find(|&&(_, s)| s == best).unwrap().0;

        let mut tt = TranspositionTable::new();
        let result = select_move(&board, &full_search(maximizer), &PriorBias::default(), &mut tt);

        assert_eq!(result.score, best, "score mismatch on {}", board);
        assert_eq!(result.best_move, Some(first_best), "move mismatch on {}", board);
        for entry in &result.evaluated_moves {
            let exact = expected.iter().find(|&&(mv, _)| mv == entry.mv).unwrap().1;
            assert_eq!(entry.score, exact, "root score of {} on {}", entry.mv, board);
        }
        checked += 1;
    }

    assert_eq!(checked, 4520);
}

#[test]
fn test_cache_shared_across_positions_stays_exact() {
    let mut references = [Reference::new(Mark::X), Reference::new(Mark::O)];
    let mut caches = [TranspositionTable::new(), TranspositionTable::new()];

    for board in reachable_positions().into_iter().filter(|b| !b.outcome().is_terminal()) {
        let maximizer = board.side_to_move();
        let expected = references[maximizer as usize].root_scores(&board);
        let best = expected.iter().map(|&(_, s)| s).max().unwrap();

        let result = select_move(&board, &full_search(maximizer), &PriorBias::default(), &mut caches[maximizer as usize]);
        assert_eq!(result.score, best, "score mismatch on {} with a warm cache", board);
    }
}

#[test]
fn test_empty_board_opens_in_the_center() {
    let mut tt = TranspositionTable::new();
    let result = choose_move(&Board::new(), Mark::X, &PriorBias::default(), &mut tt);
    assert_eq!(result.best_move, Some(Move::CENTER));
    assert_eq!(result.score, 0);
    assert_eq!(result.nodes_evaluated, 1);
    assert_eq!(result.depth, 0);
    assert!(tt.is_empty());
}

#[test]
fn test_full_search_of_empty_board_is_a_draw() {
    let mut tt = TranspositionTable::new();
    let result = select_move(&Board::new(), &full_search(Mark::X), &PriorBias::default(), &mut tt);
    assert_eq!(result.score, 0);
    assert_eq!(result.best_move, Move::new(0));
    assert_eq!(result.evaluated_moves.len(), 9);
    assert!(result.evaluated_moves.iter().all(|e| e.score == 0));
    assert_eq!(result.selection, Selection::Search);
}

#[test]
fn test_blocks_immediate_threat() {
    let board: Board = "XX-O-----".parse().unwrap();
    let mut tt = TranspositionTable::new();
    let result = choose_move(&board, Mark::O, &PriorBias::default(), &mut tt);
    assert_eq!(result.best_move, Move::new(2));
    assert_eq!(result.score, -7);
    assert_eq!(result.depth, 6);
}

#[test]
fn test_takes_the_win_over_the_block() {
    let board: Board = "XX-OO----".parse().unwrap();
    let mut tt = TranspositionTable::new();
    let result = choose_move(&board, Mark::O, &PriorBias::default(), &mut tt);
    assert_eq!(result.best_move, Move::new(5));
    assert_eq!(result.score, 10);
}

#[test]
fn test_drawn_middle_game_avoids_losing_corners() {
    let board: Board = "X---O---X".parse().unwrap();
    let mut tt = TranspositionTable::new();
    let result = choose_move(&board, Mark::O, &PriorBias::default(), &mut tt);
    assert_eq!(result.score, 0);
    let mv = result.best_move.unwrap();
    assert!(mv.is_edge(), "O must answer on an edge, got {}", mv);
    assert_eq!(mv, Move::new(1).unwrap());
}

#[test]
fn test_finished_boards_have_no_move() {
    let mut tt = TranspositionTable::new();
    let won: Board = "XXXOO----".parse().unwrap();
    let result = choose_move(&won, Mark::O, &PriorBias::default(), &mut tt);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, -10);

    let drawn: Board = "XOXXOOOXX".parse().unwrap();
    assert_eq!(game_outcome(&drawn), GameOutcome::Draw);
    let result = choose_move(&drawn, Mark::X, &PriorBias::default(), &mut tt);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, 0);
}

#[test]
fn test_search_never_mutates_the_board() {
    let board: Board = "X-O-X----".parse().unwrap();
    let copy = board;
    let mut tt = TranspositionTable::new();
    choose_move(&board, Mark::O, &PriorBias::default(), &mut tt);
    assert_eq!(board, copy);
    assert_eq!(board.to_string(), "X-O-X----");
}

#[test]
fn test_warm_cache_does_less_work() {
    let board: Board = "X--------".parse().unwrap();
    let mut tt = TranspositionTable::new();

    let cold = choose_move(&board, Mark::O, &PriorBias::default(), &mut tt);
    let size = tt.len();
    let hits = tt.hits();
    let warm = choose_move(&board, Mark::O, &PriorBias::default(), &mut tt);

    assert_eq!(cold.best_move, warm.best_move);
    assert_eq!(cold.score, warm.score);
    assert_eq!(tt.len(), size);
    assert!(tt.hits() > hits);
    assert!(warm.nodes_searched < cold.nodes_searched);

    tt.clear();
    assert!(tt.is_empty());
}

#[test]
fn test_legal_move_checks() {
    let board: Board = "X---O----".parse().unwrap();
    assert!(!is_legal_move(&board, 0));
    assert!(!is_legal_move(&board, 4));
    assert!(is_legal_move(&board, 8));
    assert!(!is_legal_move(&board, 9));
}

/// Percorre todas as respostas possíveis do adversário; o motor responde sempre.
fn engine_never_loses(engine_mark: Mark) {
    fn walk(board: Board, to_move: Mark, engine_mark: Mark, tt: &mut TranspositionTable, games: &mut usize) {
        match game_outcome(&board) {
            GameOutcome::Winner(mark) => {
                assert_eq!(mark, engine_mark, "engine lost on {}", board);
                *games += 1;
                return;
            }
            GameOutcome::Draw => {
                *games += 1;
                return;
            }
            GameOutcome::InProgress => {}
        }

        if to_move == engine_mark {
            let result = choose_move(&board, engine_mark, &PriorBias::default(), tt);
            let mv = result.best_move.unwrap();
            let mut next = board;
            next.play(mv.index(), engine_mark).unwrap();
            walk(next, !to_move, engine_mark, tt, games);
        } else {
            for mv in board.legal_moves() {
                let mut next = board;
                next.play(mv.index(), to_move).unwrap();
                walk(next, !to_move, engine_mark, tt, games);
            }
        }
    }

    let mut tt = TranspositionTable::new();
    let mut games = 0;
    walk(Board::new(), Mark::X, engine_mark, &mut tt, &mut games);
    assert!(games > 0);
}

#[test]
fn test_engine_as_x_never_loses() {
    engine_never_loses(Mark::X);
}

#[test]
fn test_engine_as_o_never_loses() {
    engine_never_loses(Mark::O);
}

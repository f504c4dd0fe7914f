use crate::core::*;

/// Score base de uma vitória; vitórias mais rápidas valem mais.
pub const WIN_SCORE: Score = 10;

/// "Infinito" da janela alpha-beta. Qualquer score real está em [-10, 10].
pub const INF: Score = 1_000;

/// Avalia uma posição terminal do ponto de vista do maximizador.
///
/// Vitória do maximizador: `+(10 - ply)`; do minimizador: `-(10 - ply)`;
/// empate: 0. Devolve `None` se o jogo continua.
#[inline(always)]
pub fn terminal_score(board: &Board, ply: Depth, maximizer: Mark) -> Option<Score> {
    match board.outcome() {
        GameOutcome::Winner(mark) if mark == maximizer => Some(WIN_SCORE - ply as Score),
        GameOutcome::Winner(_) => Some(-(WIN_SCORE - ply as Score)),
        GameOutcome::Draw => Some(0),
        GameOutcome::InProgress => None,
    }
}

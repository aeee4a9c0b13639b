use crate::core::*;

/// Score de mate, do ponto de vista de quem deu o mate.
pub const MATE_SCORE: f64 = 1000.0;

/// Bônus por peça ocupando uma das quatro casas centrais
const CENTER_BONUS: f64 = 0.3;

/// Bônus por rei em casa de roque
const CASTLED_KING_BONUS: f64 = 0.5;

/// Avalia a posição do ponto de vista das brancas (positivo = brancas melhor).
///
/// Casos terminais têm prioridade: mate vale ±1000 a favor de quem NÃO está
/// a jogar, afogamento e material insuficiente valem exatamente 0.
pub fn evaluate_position(pos: &Position) -> f64 {
    if let Some(score) = terminal_score(pos) {
        return score;
    }
    material_balance(pos) + positional_score(pos)
}

/// Score de posições terminais, ou `None` se o jogo continua.
pub fn terminal_score(pos: &Position) -> Option<f64> {
    if pos.is_checkmate() {
        // Quem está a jogar levou mate
        return Some(match pos.side_to_move() {
            Color::White => -MATE_SCORE,
            Color::Black => MATE_SCORE,
        });
    }
    if pos.is_stalemate() || pos.is_insufficient_material() {
        return Some(0.0);
    }
    None
}

/// Soma do material em todas as casas ocupadas (P=1, N=3, B=3, R=5, Q=9).
pub fn material_balance(pos: &Position) -> f64 {
    let board = pos.board();
    let mut score = 0.0;
    for square in *board.combined() {
        if let Some((piece, color)) = pos.piece_on(square) {
            score += signed(piece_value(piece), color);
        }
    }
    score
}

/// Controle do centro e segurança do rei (rei rocado).
pub fn positional_score(pos: &Position) -> f64 {
    let mut score = 0.0;

    for square in CENTER_SQUARES {
        if let Some((_, color)) = pos.piece_on(square) {
            score += signed(CENTER_BONUS, color);
        }
    }

    let board = pos.board();
    for color in [Color::White, Color::Black] {
        let king = board.king_square(color);
        if castled_king_squares(color).contains(&king) {
            score += signed(CASTLED_KING_BONUS, color);
        }
    }

    score
}

#[inline(always)]
fn signed(value: f64, color: Color) -> f64 {
    match color {
        Color::White => value,
        Color::Black => -value,
    }
}

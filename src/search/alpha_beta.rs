use crate::core::*;
use crate::search::evaluation::{evaluate_position, MATE_SCORE};
use crate::search::move_ordering::order_moves;
use std::time::{Duration, Instant};
use tracing::trace;

/// Resultado da busca Alpha-Beta
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<ChessMove>,
    /// Score do ponto de vista das brancas
    pub score: f64,
    pub depth: u8,
    pub nodes_searched: u64,
    pub time_elapsed: Duration,
}

/// Minimax de profundidade fixa com poda Alpha-Beta.
///
/// Sem tabela de transposição, sem quiescência, sem aprofundamento
/// iterativo: a profundidade pedida é a profundidade buscada.
#[derive(Debug, Default)]
pub struct AlphaBetaSearcher {
    nodes_searched: u64,
}

impl AlphaBetaSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Busca com limite de profundidade. `maximizing` = brancas a jogar na raiz.
    pub fn search(&mut self, pos: &mut Position, depth: u8, maximizing: bool) -> SearchResult {
        self.nodes_searched = 0;
        let start_time = Instant::now();

        let (score, best_move) =
            self.minimax(pos, depth, f64::NEG_INFINITY, f64::INFINITY, maximizing);

        let result = SearchResult {
            best_move,
            score,
            depth,
            nodes_searched: self.nodes_searched,
            time_elapsed: start_time.elapsed(),
        };
        trace!(
            depth,
            score,
            nodes = result.nodes_searched,
            best = ?result.best_move.map(|mv| mv.to_string()),
            "alpha-beta finished"
        );
        result
    }

    fn minimax(
        &mut self,
        pos: &mut Position,
        depth: u8,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> (f64, Option<ChessMove>) {
        self.nodes_searched += 1;

        if depth == 0 || pos.is_terminal() {
            return (leaf_score(pos, depth), None);
        }

        let mut moves = pos.legal_moves();
        order_moves(pos, &mut moves);

        let mut best_move = None;

        if maximizing {
            let mut best_score = f64::NEG_INFINITY;
            for mv in moves {
                let (score, _) = {
                    let mut child = pos.play(mv);
                    self.minimax(&mut child, depth - 1, alpha, beta, false)
                };

                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }

                alpha = alpha.max(score);
                if beta <= alpha {
                    break; // Corte beta
                }
            }
            (best_score, best_move)
        } else {
            let mut best_score = f64::INFINITY;
            for mv in moves {
                let (score, _) = {
                    let mut child = pos.play(mv);
                    self.minimax(&mut child, depth - 1, alpha, beta, true)
                };

                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }

                beta = beta.min(score);
                if beta <= alpha {
                    break; // Corte alfa
                }
            }
            (best_score, best_move)
        }
    }
}

/// Busca a partir da posição, do ponto de vista pedido.
pub fn search(pos: &mut Position, depth: u8, maximizing: bool) -> SearchResult {
    AlphaBetaSearcher::new().search(pos, depth, maximizing)
}

/// Busca do ponto de vista de quem está a jogar.
pub fn search_for_side_to_move(pos: &mut Position, depth: u8) -> SearchResult {
    let maximizing = pos.side_to_move() == Color::White;
    search(pos, depth, maximizing)
}

/// Avaliação de folha. Mates encontrados com profundidade restante valem mais,
/// então mate em 1 ganha de um mate mais distante.
fn leaf_score(pos: &Position, depth_left: u8) -> f64 {
    let score = evaluate_position(pos);
    if score.abs() >= MATE_SCORE {
        score + score.signum() * depth_left as f64
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE_MATES_IN_ONE: &str = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
    const BLACK_MATES_IN_ONE: &str = "r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1";

    #[test]
    fn finds_mate_in_one_for_white_at_every_depth() {
        for depth in 1..=4 {
            let mut pos = Position::from_fen(WHITE_MATES_IN_ONE).unwrap();
            let result = search_for_side_to_move(&mut pos, depth);
            assert_eq!(result.best_move.unwrap().to_string(), "a1a8", "depth {}", depth);
            assert!(result.score >= MATE_SCORE);
        }
    }

    #[test]
    fn finds_mate_in_one_for_black_at_every_depth() {
        for depth in 1..=4 {
            let mut pos = Position::from_fen(BLACK_MATES_IN_ONE).unwrap();
            let result = search_for_side_to_move(&mut pos, depth);
            assert_eq!(result.best_move.unwrap().to_string(), "a8a1", "depth {}", depth);
            assert!(result.score <= -MATE_SCORE);
        }
    }

    #[test]
    fn depth_zero_returns_static_eval_without_move() {
        let mut pos = Position::new();
        let result = search(&mut pos, 0, true);
        assert!(result.best_move.is_none());
        assert_eq!(result.score, evaluate_position(&pos));
        assert_eq!(result.nodes_searched, 1);
    }

    #[test]
    fn terminal_position_returns_no_move() {
        let mut pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let result = search(&mut pos, 3, false);
        assert!(result.best_move.is_none());
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn grabs_a_hanging_queen() {
        for depth in 1..=3 {
            let mut pos = Position::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
            let result = search_for_side_to_move(&mut pos, depth);
            assert_eq!(result.best_move.unwrap().to_string(), "d1d5", "depth {}", depth);
        }
    }

    #[test]
    fn search_is_deterministic_and_restores_position() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let mut pos = Position::from_fen(fen).unwrap();
        let first = search_for_side_to_move(&mut pos, 3);
        assert_eq!(pos.fen(), Position::from_fen(fen).unwrap().fen());
        assert_eq!(pos.pending_undos(), 0);

        let second = search_for_side_to_move(&mut pos, 3);
        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.score, second.score);
        assert_eq!(first.nodes_searched, second.nodes_searched);
    }

    #[test]
    fn pruning_visits_fewer_nodes_than_full_width() {
        let mut pos = Position::new();
        let result = search(&mut pos, 3, true);
        // Sem poda seriam 1 + 20 + 400 + 8902 nós
        assert!(result.nodes_searched < 1 + 20 + 400 + 8902);
        assert!(result.best_move.is_some());
    }
}

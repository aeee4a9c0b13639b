use crate::core::*;

const CAPTURE_PRIORITY: i32 = 10;
const CHECK_PRIORITY: i32 = 5;
const CENTER_PRIORITY: i32 = 2;

/// Ordena movimentos para maximizar podas Alpha-Beta.
///
/// Só reordena: o conjunto de lances não muda. O sort é estável, então
/// empates mantêm a ordem da geração de lances.
pub fn order_moves(pos: &mut Position, moves: &mut Vec<ChessMove>) {
    let mut scored: Vec<(i32, ChessMove)> = moves
        .iter()
        .map(|&mv| (score_move(pos, mv), mv))
        .collect();
    scored.sort_by_key(|&(score, _)| std::cmp::Reverse(score));

    moves.clear();
    moves.extend(scored.into_iter().map(|(_, mv)| mv));
}

/// Pontua movimento para ordenação (quanto maior, melhor)
pub fn score_move(pos: &mut Position, mv: ChessMove) -> i32 {
    let mut score = 0;

    if pos.is_capture(mv) {
        score += CAPTURE_PRIORITY;
    }

    if pos.gives_check(mv) {
        score += CHECK_PRIORITY;
    }

    if is_center(mv.get_dest()) {
        score += CENTER_PRIORITY;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_same_set_of_moves() {
        let mut pos = Position::from_fen(
            "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 2 3",
        )
        .unwrap();
        let original = pos.legal_moves();
        let mut ordered = original.clone();
        order_moves(&mut pos, &mut ordered);

        assert_eq!(ordered.len(), original.len());
        for mv in &original {
            assert!(ordered.contains(mv));
        }
        assert_eq!(pos.pending_undos(), 0);
    }

    #[test]
    fn captures_with_check_come_first() {
        // Bxf7+ e Qxf7# capturam e dão xeque
        let mut pos = Position::from_fen(
            "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 2 3",
        )
        .unwrap();
        let mut moves = pos.legal_moves();
        order_moves(&mut pos, &mut moves);
        let mut top: Vec<String> = moves[..2].iter().map(|mv| mv.to_string()).collect();
        top.sort();
        assert_eq!(top, vec!["c4f7", "f3f7"]);
    }

    #[test]
    fn priorities_add_up() {
        let mut pos = Position::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        // exd5: captura em casa central
        let capture = pos.find_uci("e4d5").unwrap();
        assert_eq!(score_move(&mut pos, capture), CAPTURE_PRIORITY + CENTER_PRIORITY);
        let push = pos.find_uci("e4e5").unwrap();
        assert_eq!(score_move(&mut pos, push), CENTER_PRIORITY);
        let king = pos.find_uci("e1f1").unwrap();
        assert_eq!(score_move(&mut pos, king), 0);
    }

    #[test]
    fn ties_keep_generation_order() {
        let mut pos = Position::new();
        let original = pos.legal_moves();
        let mut ordered = original.clone();
        order_moves(&mut pos, &mut ordered);

        // Na posição inicial só e4/d4 têm prioridade (casa central)
        let rest: Vec<_> = ordered[2..].to_vec();
        let expected: Vec<_> = original
            .iter()
            .copied()
            .filter(|mv| !is_center(mv.get_dest()))
            .collect();
        assert_eq!(rest, expected);
    }
}

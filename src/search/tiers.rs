// Ficheiro: src/search/tiers.rs
// Descrição: Escada heurística de seleção de lances, um filtro barato por tier.
//
// Cada tier filtra os lances legais e escolhe uniformemente entre os que
// sobram. Nenhum tier gera lances por conta própria: tudo vem de
// `Position::legal_moves`, e toda simulação é desfeita antes de retornar.

use crate::core::*;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

/// Beginner: probabilidade de jogar um lance totalmente aleatório.
pub const BEGINNER_RANDOM_PROBABILITY: f64 = 0.3;

/// Intermediate: máximo de capturas que o adversário pode ter na resposta.
pub const MAX_OPPONENT_CAPTURES: usize = 2;

/// Escolhe um lance segundo a política do tier. `None` só se não há lances legais.
pub fn select_tier_move<R: Rng + ?Sized>(
    tier: Tier,
    pos: &mut Position,
    rng: &mut R,
) -> Option<ChessMove> {
    let legal = pos.legal_moves();
    if legal.is_empty() {
        return None;
    }

    let choice = match tier {
        Tier::Expert => tactical_move(pos, &legal, rng),
        Tier::Strong => good_move(pos, &legal, rng),
        Tier::Intermediate => decent_move(pos, &legal, rng),
        Tier::Beginner => beginner_move(pos, &legal, rng),
        Tier::Random => random_move(&legal, rng),
    };

    trace!(%tier, candidates = legal.len(), choice = ?choice.map(|mv| mv.to_string()), "tier move");
    choice
}

/// Lance uniforme entre todos os legais.
pub fn random_move<R: Rng + ?Sized>(moves: &[ChessMove], rng: &mut R) -> Option<ChessMove> {
    moves.choose(rng).copied()
}

/// Expert: mate em 1 (primeiro encontrado), senão xeques, senão capturas, senão qualquer.
pub fn tactical_move<R: Rng + ?Sized>(
    pos: &mut Position,
    legal: &[ChessMove],
    rng: &mut R,
) -> Option<ChessMove> {
    if let Some(mate) = legal.iter().copied().find(|&mv| pos.gives_checkmate(mv)) {
        return Some(mate);
    }

    let checks = checking_moves(pos, legal);
    if let Some(mv) = random_move(&checks, rng) {
        return Some(mv);
    }

    let captures = capturing_moves(pos, legal);
    random_move(&captures, rng).or_else(|| random_move(legal, rng))
}

/// Strong: só lances que não deixam o próprio rei atacado (re-verificado por
/// simulação). Dentro deles, capturas, senão xeques, senão qualquer.
pub fn good_move<R: Rng + ?Sized>(
    pos: &mut Position,
    legal: &[ChessMove],
    rng: &mut R,
) -> Option<ChessMove> {
    let mover = pos.side_to_move();
    let safe: Vec<ChessMove> = legal
        .iter()
        .copied()
        .filter(|&mv| !pos.play(mv).king_in_check(mover))
        .collect();

    if safe.is_empty() {
        return random_move(legal, rng);
    }

    let captures = capturing_moves(pos, &safe);
    if let Some(mv) = random_move(&captures, rng) {
        return Some(mv);
    }

    let checks = checking_moves(pos, &safe);
    random_move(&checks, rng).or_else(|| random_move(&safe, rng))
}

/// Intermediate: descarta lances que deixam o adversário com mais de
/// `MAX_OPPONENT_CAPTURES` capturas. Heurística anti-blunder, não é busca.
pub fn decent_move<R: Rng + ?Sized>(
    pos: &mut Position,
    legal: &[ChessMove],
    rng: &mut R,
) -> Option<ChessMove> {
    if legal.len() == 1 {
        return Some(legal[0]);
    }

    let survivors: Vec<ChessMove> = legal
        .iter()
        .copied()
        .filter(|&mv| opponent_capture_count(pos, mv) <= MAX_OPPONENT_CAPTURES)
        .collect();

    random_move(&survivors, rng).or_else(|| random_move(legal, rng))
}

/// Beginner: 30% aleatório, senão a política básica de um lance.
pub fn beginner_move<R: Rng + ?Sized>(
    pos: &mut Position,
    legal: &[ChessMove],
    rng: &mut R,
) -> Option<ChessMove> {
    if rng.gen_bool(BEGINNER_RANDOM_PROBABILITY) {
        return random_move(legal, rng);
    }
    basic_move(pos, legal, rng)
}

/// Política básica: trocas que não perdem material, senão desenvolvimento
/// de peças menores, senão qualquer lance.
pub fn basic_move<R: Rng + ?Sized>(
    pos: &mut Position,
    legal: &[ChessMove],
    rng: &mut R,
) -> Option<ChessMove> {
    let fair_trades: Vec<ChessMove> = legal
        .iter()
        .copied()
        .filter(|&mv| is_fair_trade(pos, mv))
        .collect();
    if let Some(mv) = random_move(&fair_trades, rng) {
        return Some(mv);
    }

    let development: Vec<ChessMove> = legal
        .iter()
        .copied()
        .filter(|&mv| is_development(pos, mv))
        .collect();
    random_move(&development, rng).or_else(|| random_move(legal, rng))
}

pub fn checking_moves(pos: &mut Position, moves: &[ChessMove]) -> Vec<ChessMove> {
    moves.iter().copied().filter(|&mv| pos.gives_check(mv)).collect()
}

pub fn capturing_moves(pos: &Position, moves: &[ChessMove]) -> Vec<ChessMove> {
    moves.iter().copied().filter(|&mv| pos.is_capture(mv)).collect()
}

/// Quantas respostas do adversário são capturas depois de `mv`.
pub fn opponent_capture_count(pos: &mut Position, mv: ChessMove) -> usize {
    let child = pos.play(mv);
    child
        .legal_moves()
        .into_iter()
        .filter(|&reply| child.is_capture(reply))
        .count()
}

/// Captura de peça que vale pelo menos tanto quanto a que captura.
fn is_fair_trade(pos: &Position, mv: ChessMove) -> bool {
    if !pos.is_capture(mv) {
        return false;
    }
    let attacker = match pos.piece_on(mv.get_source()) {
        Some((piece, _)) => piece,
        None => return false,
    };
    // Casa de destino vazia numa captura = en passant
    let victim = pos
        .piece_on(mv.get_dest())
        .map_or(Piece::Pawn, |(piece, _)| piece);
    piece_value(victim) >= piece_value(attacker)
}

/// Cavalo ou bispo saindo da sua casa inicial.
fn is_development(pos: &Position, mv: ChessMove) -> bool {
    match pos.piece_on(mv.get_source()) {
        Some((piece, color)) => minor_piece_home_squares(color, piece)
            .map_or(false, |homes| homes.contains(&mv.get_source())),
        None => false,
    }
}

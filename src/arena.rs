// Ficheiro: src/arena.rs
// Descrição: Self-play entre dois jogadores, partidas independentes em paralelo.
//
// A busca nunca é paralela: cada partida tem a sua própria posição e o seu
// próprio RNG, e o rayon só distribui partidas inteiras pelas threads.

use crate::core::*;
use crate::engine::{AdaptiveEngine, MoveStrategy, Plan};
use crate::session::{GameResult, GameSession};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, info, warn};

/// Limite padrão de meios-lances por partida.
pub const DEFAULT_MAX_PLIES: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Player {
    /// O motor adaptativo completo, calibrado para um rating
    Rated { engine: AdaptiveEngine, rating: Rating },
    /// Um plano fixo (tier ou busca), sem passar pelo calibrador
    Fixed(Plan),
}

impl Player {
    pub fn rated(engine: AdaptiveEngine, rating: Rating) -> Self {
        Player::Rated { engine, rating }
    }

    pub fn tier(tier: Tier) -> Self {
        Player::Fixed(Plan::Tier(tier))
    }

    pub fn random() -> Self {
        Self::tier(Tier::Random)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Rated { engine, rating } => write!(f, "{}@{}", engine.strategy(), rating),
            Player::Fixed(plan) => write!(f, "{}", plan),
        }
    }
}

impl MoveStrategy for Player {
    fn choose_move<R: Rng + ?Sized>(&self, pos: &mut Position, rng: &mut R) -> Option<ChessMove> {
        match self {
            Player::Rated { engine, rating } => engine.select_move(pos, *rating, rng).as_move(),
            Player::Fixed(plan) => plan.choose_move(pos, rng),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Finished(GameResult),
    /// Atingiu o limite de meios-lances sem resultado
    Unfinished,
}

#[derive(Debug, Clone)]
pub struct GameRecord {
    pub outcome: GameOutcome,
    pub moves: Vec<ChessMove>,
}

/// Joga uma partida completa a partir da posição inicial.
pub fn play_game<R: Rng + ?Sized>(
    white: &Player,
    black: &Player,
    rng: &mut R,
    max_plies: u32,
) -> GameRecord {
    let mut session = GameSession::new(Rating::default(), Color::White);
    play_from(&mut session, white, black, rng, max_plies)
}

/// Continua a partida da sessão até ao fim ou até `max_plies` meios-lances.
pub fn play_from<R: Rng + ?Sized>(
    session: &mut GameSession,
    white: &Player,
    black: &Player,
    rng: &mut R,
    max_plies: u32,
) -> GameRecord {
    let mut plies = 0;
    while plies < max_plies {
        if let Some(result) = session.result() {
            return record(session, GameOutcome::Finished(result));
        }

        let player = match session.position().side_to_move() {
            Color::White => white,
            Color::Black => black,
        };
        let mut scratch = session.position().clone();
        let mv = match player.choose_move(&mut scratch, rng) {
            Some(mv) => mv,
            None => break,
        };
        if let Err(e) = session.play_move(mv) {
            warn!(player = %player, error = %e, "player produced an unusable move");
            break;
        }
        plies += 1;
    }

    match session.result() {
        Some(result) => record(session, GameOutcome::Finished(result)),
        None => record(session, GameOutcome::Unfinished),
    }
}

fn record(session: &GameSession, outcome: GameOutcome) -> GameRecord {
    GameRecord {
        outcome,
        moves: session.history().to_vec(),
    }
}

/// Placar do ponto de vista do primeiro jogador.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub games: usize,
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
    pub unfinished: usize,
}

impl MatchReport {
    /// Pontos do primeiro jogador (vitória 1, empate 0.5).
    pub fn first_score(&self) -> f64 {
        self.first_wins as f64 + 0.5 * self.draws as f64
    }

    pub fn second_score(&self) -> f64 {
        self.second_wins as f64 + 0.5 * self.draws as f64
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} games: +{} -{} ={} (unfinished {})",
            self.games, self.first_wins, self.second_wins, self.draws, self.unfinished
        )
    }
}

/// Arena de self-play. Só define quantas threads o rayon pode usar.
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    threads: usize,
    max_plies: u32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    pub fn new() -> Self {
        Self {
            threads: num_cpus::get().max(1),
            max_plies: DEFAULT_MAX_PLIES,
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_max_plies(mut self, max_plies: u32) -> Self {
        self.max_plies = max_plies;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Joga `games` partidas, trocando as cores a cada partida. A partida `i`
    /// usa `ChaCha8Rng::seed_from_u64(seed + i)`, então o placar é reproduzível
    /// para qualquer número de threads.
    pub fn run_match(&self, first: &Player, second: &Player, games: usize, seed: u64) -> MatchReport {
        info!(%first, %second, games, threads = self.threads, "match started");

        let play = || -> Vec<(usize, GameOutcome)> {
            (0..games)
                .into_par_iter()
                .map(|i| {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64));
                    let (white, black) = if i % 2 == 0 {
                        (first, second)
                    } else {
                        (second, first)
                    };
                    let game = play_game(white, black, &mut rng, self.max_plies);
                    debug!(game = i, outcome = ?game.outcome, plies = game.moves.len(), "game finished");
                    (i, game.outcome)
                })
                .collect()
        };

        let outcomes = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
        {
            Ok(pool) => pool.install(play),
            Err(e) => {
                warn!("could not build thread pool ({}), using the global one", e);
                play()
            }
        };

        let report = tally(&outcomes);
        info!(%report, "match finished");
        report
    }
}

/// Conta resultados do ponto de vista do primeiro jogador (branco nas partidas pares).
fn tally(outcomes: &[(usize, GameOutcome)]) -> MatchReport {
    let mut report = MatchReport {
        games: outcomes.len(),
        ..MatchReport::default()
    };

    for &(i, outcome) in outcomes {
        let first_color = if i % 2 == 0 { Color::White } else { Color::Black };
        match outcome {
            GameOutcome::Finished(result) => match result.winner() {
                Some(color) if color == first_color => report.first_wins += 1,
                Some(_) => report.second_wins += 1,
                None => report.draws += 1,
            },
            GameOutcome::Unfinished => report.unfinished += 1,
        }
    }
    report
}

/// Atalho com a arena padrão.
pub fn run_match(first: &Player, second: &Player, games: usize, seed: u64) -> MatchReport {
    Arena::new().run_match(first, second, games, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DrawReason;

    #[test]
    fn random_game_terminates_with_legal_history() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let game = play_game(&Player::random(), &Player::random(), &mut rng, 40);
        assert!(game.moves.len() <= 40);

        let mut pos = Position::new();
        for mv in &game.moves {
            assert!(pos.is_legal(*mv));
            pos.advance(*mv);
        }
    }

    #[test]
    fn finished_games_report_the_session_result() {
        // Brancas têm mate em 1 e o Expert encontra sempre
        let mut session =
            GameSession::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", Rating::default(), Color::White)
                .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let expert = Player::tier(Tier::Expert);
        let game = play_from(&mut session, &expert, &Player::random(), &mut rng, 10);
        assert_eq!(game.outcome, GameOutcome::Finished(GameResult::WhiteWins));
        assert_eq!(game.moves.len(), 1);
    }

    #[test]
    fn tally_swaps_colours_every_other_game() {
        let outcomes = [
            (0, GameOutcome::Finished(GameResult::WhiteWins)),
            (1, GameOutcome::Finished(GameResult::WhiteWins)),
            (2, GameOutcome::Finished(GameResult::Draw(DrawReason::Stalemate))),
            (3, GameOutcome::Unfinished),
        ];
        let report = tally(&outcomes);
        assert_eq!(report.first_wins, 1);
        assert_eq!(report.second_wins, 1);
        assert_eq!(report.draws, 1);
        assert_eq!(report.unfinished, 1);
        assert_eq!(report.first_score(), 1.5);
    }

    #[test]
    fn match_is_reproducible_for_any_thread_count() {
        let first = Player::tier(Tier::Beginner);
        let second = Player::random();
        let one = Arena::new().with_threads(1).with_max_plies(60).run_match(&first, &second, 6, 42);
        let many = Arena::new().with_threads(4).with_max_plies(60).run_match(&first, &second, 6, 42);
        assert_eq!(one, many);
        assert_eq!(one.games, 6);
    }
}

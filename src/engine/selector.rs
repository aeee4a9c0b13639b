// Ficheiro: src/engine/selector.rs
// Descrição: Ponto de entrada do motor adaptativo. Posição + rating -> um lance legal.

use crate::core::*;
use crate::engine::calibrator::{calibrate, Calibration, Plan, Strategy, DEFAULT_HYBRID_FLOOR};
use crate::engine::config::EngineConfig;
use crate::search::{random_move, search_for_side_to_move, select_tier_move};
use rand::Rng;
use tracing::{debug, error};

/// Qualquer coisa que escolha um lance a partir de uma posição.
///
/// Contrato: o lance devolvido pertence ao conjunto legal, e a posição volta
/// exatamente ao estado de entrada. `None` só quando não há lances legais.
pub trait MoveStrategy {
    fn choose_move<R: Rng + ?Sized>(&self, pos: &mut Position, rng: &mut R) -> Option<ChessMove>;
}

impl MoveStrategy for Plan {
    fn choose_move<R: Rng + ?Sized>(&self, pos: &mut Position, rng: &mut R) -> Option<ChessMove> {
        match *self {
            Plan::Search {
                depth,
                randomization,
            } => {
                let result = search_for_side_to_move(pos, depth);
                debug!(
                    depth,
                    nodes = result.nodes_searched,
                    score = result.score,
                    elapsed_us = result.time_elapsed.as_micros() as u64,
                    "search done"
                );

                // Planos construídos à mão podem trazer valores fora de [0, 1]
                let randomization = if randomization.is_nan() {
                    0.0
                } else {
                    randomization.clamp(0.0, 1.0)
                };
                if randomization > 0.0 && rng.gen_bool(randomization) {
                    let noisy = random_move(&pos.legal_moves(), rng);
                    debug!(randomization, "search move replaced by random move");
                    return noisy;
                }
                result.best_move
            }
            Plan::Tier(tier) => select_tier_move(tier, pos, rng),
        }
    }
}

/// Motor sem estado: só guarda a estratégia e o piso da híbrida.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveEngine {
    strategy: Strategy,
    hybrid_floor: Rating,
}

impl Default for AdaptiveEngine {
    fn default() -> Self {
        Self::new(Strategy::default())
    }
}

impl AdaptiveEngine {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            hybrid_floor: Rating::new(DEFAULT_HYBRID_FLOOR as i32),
        }
    }

    pub fn with_hybrid_floor(mut self, floor: Rating) -> Self {
        self.hybrid_floor = floor;
        self
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.strategy).with_hybrid_floor(config.hybrid_floor())
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn hybrid_floor(&self) -> Rating {
        self.hybrid_floor
    }

    pub fn calibrate(&self, rating: Rating) -> Calibration {
        calibrate(rating, self.strategy, self.hybrid_floor)
    }

    /// Escolhe um lance para o rating pedido.
    ///
    /// Sem lances legais devolve `NoLegalMove`. A posição é devolvida no mesmo
    /// estado em que entrou.
    pub fn select_move<R: Rng + ?Sized>(
        &self,
        pos: &mut Position,
        rating: Rating,
        rng: &mut R,
    ) -> MoveSelection {
        let legal = pos.legal_moves();
        if legal.is_empty() {
            debug!(fen = %pos.fen(), "no legal move");
            return MoveSelection::NoLegalMove;
        }

        let calibration = self.calibrate(rating);
        let depth_before = pos.pending_undos();
        let choice = calibration.plan.choose_move(pos, rng);
        debug_assert_eq!(pos.pending_undos(), depth_before, "strategy leaked an apply");

        let mv = match choice {
            Some(mv) if legal.contains(&mv) => Some(mv),
            other => {
                error!(
                    plan = %calibration.plan,
                    returned = ?other.map(|mv| mv.to_string()),
                    fen = %pos.fen(),
                    "strategy returned a move outside the legal set, falling back to random"
                );
                random_move(&legal, rng)
            }
        };

        debug!(
            rating = %rating,
            strategy = %calibration.strategy,
            plan = %calibration.plan,
            chosen = ?mv.map(|m| m.to_string()),
            "move selected"
        );
        MoveSelection::from(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const WHITE_MATES_IN_ONE: &str = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
    const CHECKMATED: &str = "R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1";

    #[test]
    fn terminal_position_yields_no_legal_move() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for strategy in [Strategy::Search, Strategy::Tiered, Strategy::Hybrid] {
            let engine = AdaptiveEngine::new(strategy);
            let mut pos = Position::from_fen(CHECKMATED).unwrap();
            assert_eq!(
                engine.select_move(&mut pos, Rating::new(1500), &mut rng),
                MoveSelection::NoLegalMove
            );
        }
    }

    #[test]
    fn out_of_range_randomization_is_clamped() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut pos = Position::from_fen(WHITE_MATES_IN_ONE).unwrap();
        let legal = pos.legal_moves();

        // Acima de 1 vira sempre aleatório, sem pânico
        for _ in 0..20 {
            let plan = Plan::Search { depth: 1, randomization: 5.0 };
            let mv = plan.choose_move(&mut pos, &mut rng).unwrap();
            assert!(legal.contains(&mv));
        }

        // NaN e negativos desligam o ruído
        for randomization in [f64::NAN, -0.5] {
            let plan = Plan::Search { depth: 1, randomization };
            let mv = plan.choose_move(&mut pos, &mut rng).unwrap();
            assert_eq!(mv.to_string(), "a1a8");
        }
        assert_eq!(pos.pending_undos(), 0);
    }

    #[test]
    fn full_strength_search_plays_mate_in_one() {
        let engine = AdaptiveEngine::new(Strategy::Search);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pos = Position::from_fen(WHITE_MATES_IN_ONE).unwrap();
        // 2000 = profundidade 5, sem ruído
        let chosen = engine.select_move(&mut pos, Rating::new(2000), &mut rng);
        assert_eq!(chosen.as_move().unwrap().to_string(), "a1a8");
        assert_eq!(pos.fen(), Position::from_fen(WHITE_MATES_IN_ONE).unwrap().fen());
    }

    #[test]
    fn selected_moves_are_legal_for_every_strategy() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        for strategy in [Strategy::Search, Strategy::Tiered, Strategy::Hybrid] {
            let engine = AdaptiveEngine::new(strategy);
            for (seed, rating) in [(1, 400), (2, 900), (3, 1300), (4, 1700)] {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let mut pos = Position::from_fen(fen).unwrap();
                let mv = engine
                    .select_move(&mut pos, Rating::new(rating), &mut rng)
                    .as_move()
                    .unwrap();
                assert!(pos.is_legal(mv));
                assert_eq!(pos.pending_undos(), 0);
            }
        }
    }

    #[test]
    fn from_config_picks_up_strategy_and_floor() {
        let config = EngineConfig {
            strategy: Strategy::Hybrid,
            hybrid_floor: 1600,
            ..EngineConfig::default()
        };
        let engine = AdaptiveEngine::from_config(&config);
        assert_eq!(engine.strategy(), Strategy::Hybrid);
        assert_eq!(engine.hybrid_floor(), Rating::new(1600));
        assert_eq!(engine.calibrate(Rating::new(1500)).plan, Plan::Tier(Tier::Intermediate));
    }

    #[test]
    fn plan_as_strategy_restores_position() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let plans = [
            Plan::Search {
                depth: 2,
                randomization: 0.5,
            },
            Plan::Tier(Tier::Strong),
        ];
        for plan in plans {
            let mut pos = Position::new();
            let before = pos.fen();
            let mv = plan.choose_move(&mut pos, &mut rng).unwrap();
            assert!(pos.is_legal(mv));
            assert_eq!(pos.fen(), before);
        }
    }
}

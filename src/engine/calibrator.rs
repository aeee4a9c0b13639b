// Ficheiro: src/engine/calibrator.rs
// Descrição: Traduz um rating em estratégia + parâmetros (profundidade, ruído, tier).

use crate::core::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rating a partir do qual a busca joga sem ruído.
pub const FULL_STRENGTH_RATING: u16 = 2000;

/// Piso padrão da estratégia híbrida: abaixo dele usa tiers.
pub const DEFAULT_HYBRID_FLOOR: u16 = 1200;

/// Família de estratégia usada pelo motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Minimax com poda alpha-beta, profundidade e ruído dependentes do rating
    #[default]
    Search,
    /// Escada heurística de tiers
    Tiered,
    /// Tiers abaixo do piso, busca a partir dele
    Hybrid,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Search => "search",
            Strategy::Tiered => "tiered",
            Strategy::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(Strategy::Search),
            "tiered" | "tiers" => Ok(Strategy::Tiered),
            "hybrid" => Ok(Strategy::Hybrid),
            other => Err(EngineError::Config(format!(
                "unknown strategy '{}' (expected search, tiered or hybrid)",
                other
            ))),
        }
    }
}

/// O que efetivamente vai ser executado para escolher o lance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Plan {
    /// Busca de profundidade fixa; depois, com probabilidade `randomization`,
    /// troca o lance por um legal aleatório.
    Search { depth: u8, randomization: f64 },
    Tier(Tier),
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Search {
                depth,
                randomization,
            } => write!(f, "search(depth={}, noise={:.2})", depth, randomization),
            Plan::Tier(tier) => write!(f, "tier({})", tier),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub rating: Rating,
    pub strategy: Strategy,
    pub plan: Plan,
}

/// Profundidade da busca por faixa de rating.
pub fn depth_for_rating(rating: Rating) -> u8 {
    match rating.get() {
        0..=799 => 1,
        800..=1199 => 2,
        1200..=1599 => 3,
        1600..=1999 => 4,
        2000..=2399 => 5,
        _ => 6,
    }
}

/// Probabilidade de trocar o lance da busca por um aleatório: (2000 − r)/2000.
pub fn randomization_probability(rating: Rating) -> f64 {
    let r = rating.get();
    if r >= FULL_STRENGTH_RATING {
        0.0
    } else {
        f64::from(FULL_STRENGTH_RATING - r) / f64::from(FULL_STRENGTH_RATING)
    }
}

fn search_plan(rating: Rating) -> Plan {
    Plan::Search {
        depth: depth_for_rating(rating),
        randomization: randomization_probability(rating),
    }
}

/// Escolhe o plano para o rating. O rating já vem com clamp aplicado pelo tipo.
pub fn calibrate(rating: Rating, strategy: Strategy, hybrid_floor: Rating) -> Calibration {
    let plan = match strategy {
        Strategy::Search => search_plan(rating),
        Strategy::Tiered => Plan::Tier(Tier::from_rating(rating)),
        Strategy::Hybrid if rating < hybrid_floor => Plan::Tier(Tier::from_rating(rating)),
        Strategy::Hybrid => search_plan(rating),
    };

    Calibration {
        rating,
        strategy,
        plan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Rating {
        Rating::new(DEFAULT_HYBRID_FLOOR as i32)
    }

    #[test]
    fn depth_bands() {
        let cases = [
            (400, 1),
            (799, 1),
            (800, 2),
            (1199, 2),
            (1200, 3),
            (1599, 3),
            (1600, 4),
            (1999, 4),
            (2000, 5),
            (2399, 5),
            (2400, 6),
            (3000, 6),
        ];
        for (rating, depth) in cases {
            assert_eq!(depth_for_rating(Rating::new(rating)), depth, "rating {}", rating);
        }
    }

    #[test]
    fn randomization_falls_linearly_to_zero() {
        assert!((randomization_probability(Rating::new(400)) - 0.8).abs() < 1e-12);
        assert!((randomization_probability(Rating::new(1000)) - 0.5).abs() < 1e-12);
        assert!((randomization_probability(Rating::new(1999)) - 0.0005).abs() < 1e-12);
        assert_eq!(randomization_probability(Rating::new(2000)), 0.0);
        assert_eq!(randomization_probability(Rating::new(3000)), 0.0);
    }

    #[test]
    fn out_of_range_ratings_calibrate_like_the_bounds() {
        for strategy in [Strategy::Search, Strategy::Tiered, Strategy::Hybrid] {
            assert_eq!(
                calibrate(Rating::new(399), strategy, floor()).plan,
                calibrate(Rating::new(400), strategy, floor()).plan
            );
            assert_eq!(
                calibrate(Rating::new(3001), strategy, floor()).plan,
                calibrate(Rating::new(3000), strategy, floor()).plan
            );
        }
    }

    #[test]
    fn tiered_strategy_maps_to_tiers() {
        let plan = |r| calibrate(Rating::new(r), Strategy::Tiered, floor()).plan;
        assert_eq!(plan(2600), Plan::Tier(Tier::Expert));
        assert_eq!(plan(2000), Plan::Tier(Tier::Strong));
        assert_eq!(plan(1500), Plan::Tier(Tier::Intermediate));
        assert_eq!(plan(600), Plan::Tier(Tier::Beginner));
    }

    #[test]
    fn hybrid_switches_at_the_floor() {
        let below = calibrate(Rating::new(1199), Strategy::Hybrid, floor());
        assert_eq!(below.plan, Plan::Tier(Tier::Beginner));

        let at = calibrate(Rating::new(1200), Strategy::Hybrid, floor());
        assert!(matches!(at.plan, Plan::Search { depth: 3, .. }));
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Search".parse::<Strategy>().unwrap(), Strategy::Search);
        assert_eq!(" TIERED ".parse::<Strategy>().unwrap(), Strategy::Tiered);
        assert_eq!("hybrid".parse::<Strategy>().unwrap(), Strategy::Hybrid);
        assert!(matches!(
            "llama".parse::<Strategy>(),
            Err(EngineError::Config(_))
        ));
    }
}

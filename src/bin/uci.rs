// Interface UCI (Universal Chess Interface) para o motor adaptativo

use adaptive_chess::engine::load_config;
use adaptive_chess::logging::init_tracing;
use adaptive_chess::*;
use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

struct UCIEngine {
    engine: AdaptiveEngine,
    session: GameSession,
    rating: Rating,
    hybrid_floor: Rating,
    rng: ChaCha8Rng,
}

impl UCIEngine {
    fn new(config: &EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        UCIEngine {
            engine: AdaptiveEngine::from_config(config),
            session: GameSession::new(config.rating(), Color::White),
            rating: config.rating(),
            hybrid_floor: config.hybrid_floor(),
            rng,
        }
    }

    fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();

        for line in stdin.lock().lines() {
            let input = line?;
            let parts: Vec<&str> = input.split_whitespace().collect();

            if parts.is_empty() {
                continue;
            }

            match parts[0] {
                "uci" => self.handle_uci(),
                "isready" => println!("readyok"),
                "ucinewgame" => self.handle_new_game(),
                "setoption" => self.handle_setoption(&parts),
                "position" => self.handle_position(&parts),
                "go" => self.handle_go(),
                "stop" => {} // A busca é síncrona: quando o stop chega já respondemos
                "quit" => break,
                other => debug!("ignoring unknown command '{}'", other),
            }
            io::stdout().flush()?;
        }
        Ok(())
    }

    fn handle_uci(&self) {
        println!("id name Adaptive Chess {}", env!("CARGO_PKG_VERSION"));
        println!("id author Pedro Contessoto");

        println!(
            "option name Rating type spin default {} min {} max {}",
            self.rating,
            Rating::MIN,
            Rating::MAX
        );
        println!(
            "option name Strategy type combo default {} var search var tiered var hybrid",
            self.engine.strategy()
        );

        println!("uciok");
    }

    fn handle_new_game(&mut self) {
        self.session = GameSession::new(self.rating, Color::White);
    }

    // setoption name <Nome> value <Valor>
    fn handle_setoption(&mut self, parts: &[&str]) {
        let name_idx = parts.iter().position(|&p| p == "name");
        let value_idx = parts.iter().position(|&p| p == "value");
        let (name, value) = match (name_idx, value_idx) {
            (Some(n), Some(v)) if n + 1 < v && v + 1 < parts.len() => {
                (parts[n + 1..v].join(" "), parts[v + 1..].join(" "))
            }
            _ => {
                println!("info string malformed setoption");
                return;
            }
        };

        match name.to_ascii_lowercase().as_str() {
            "rating" => match value.parse::<i32>() {
                Ok(r) => {
                    self.rating = Rating::new(r);
                    self.session.set_rating(r);
                }
                Err(_) => println!("info string invalid rating '{}'", value),
            },
            "strategy" => match value.parse::<Strategy>() {
                Ok(strategy) => {
                    self.engine = AdaptiveEngine::new(strategy).with_hybrid_floor(self.hybrid_floor);
                }
                Err(e) => println!("info string {}", e),
            },
            _ => println!("info string unknown option '{}'", name),
        }
    }

    fn handle_position(&mut self, parts: &[&str]) {
        if parts.len() < 2 {
            return;
        }

        let mut idx = 1;

        let session = match parts[idx] {
            "startpos" => {
                idx += 1;
                Ok(GameSession::new(self.rating, Color::White))
            }
            "fen" => {
                idx += 1;
                let mut fen_parts = Vec::new();

                // Coleta partes do FEN até "moves" ou fim
                while idx < parts.len() && parts[idx] != "moves" {
                    fen_parts.push(parts[idx]);
                    idx += 1;
                }

                GameSession::from_fen(&fen_parts.join(" "), self.rating, Color::White)
            }
            _ => return,
        };

        self.session = match session {
            Ok(session) => session,
            Err(e) => {
                println!("info string {}", e);
                return;
            }
        };

        // Processa movimentos se houver
        if idx < parts.len() && parts[idx] == "moves" {
            for uci in &parts[idx + 1..] {
                if let Err(e) = self.session.play_uci(uci) {
                    warn!("position: stopping at '{}': {}", uci, e);
                    println!("info string {}", e);
                    break;
                }
            }
        }
    }

    // Relógios e profundidade do `go` são ignorados: a força vem só do rating
    fn handle_go(&mut self) {
        let calibration = self.engine.calibrate(self.rating);
        println!(
            "info string rating {} plan {}",
            calibration.rating, calibration.plan
        );

        let mut position = self.session.position().clone();
        match self.engine.select_move(&mut position, self.rating, &mut self.rng) {
            MoveSelection::Move(mv) => println!("bestmove {}", mv),
            MoveSelection::NoLegalMove => println!("bestmove 0000"),
        }
    }
}

fn main() -> Result<()> {
    let config = load_config();
    init_tracing(&config.log_level);

    let mut engine = UCIEngine::new(&config);
    engine.run()
}

// Motor de Xadrez Adaptativo - linha de comando

use adaptive_chess::arena::{Arena, Player};
use adaptive_chess::engine::{load_config, load_from_path};
use adaptive_chess::logging::init_tracing;
use adaptive_chess::*;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Parser, Debug)]
#[command(name = "adaptive_chess")]
#[command(about = "Motor de xadrez com força ajustável por rating (400-3000)")]
#[command(version)]
struct Cli {
    /// Ficheiro TOML de configuração (senão ADAPTIVE_CHESS_CONFIG / adaptive_chess.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// search | tiered | hybrid
    #[arg(long, global = true)]
    strategy: Option<Strategy>,

    #[arg(long, global = true)]
    seed: Option<u64>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Escolhe um lance para uma posição
    Select {
        #[arg(long, default_value = START_FEN)]
        fen: String,

        #[arg(long)]
        rating: Option<i32>,

        /// Repete a seleção e mostra a distribuição dos lances
        #[arg(long, default_value_t = 1)]
        samples: usize,
    },
    /// Self-play entre dois jogadores ("random", "expert", "search@1500", "1200", ...)
    Match {
        #[arg(long)]
        first: String,

        #[arg(long)]
        second: String,

        #[arg(long, default_value_t = 100)]
        games: usize,

        #[arg(long)]
        threads: Option<usize>,

        #[arg(long)]
        max_plies: Option<u32>,
    },
    /// Partida interativa contra o motor
    Play {
        #[arg(long)]
        rating: Option<i32>,

        /// Cor do humano: white | black
        #[arg(long, default_value = "white")]
        color: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?
            .apply_env_overrides(),
        None => load_config(),
    };
    // Flags da CLI têm prioridade sobre ficheiro e ambiente
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    init_tracing(&config.log_level);

    match cli.command {
        Command::Select {
            fen,
            rating,
            samples,
        } => run_select(&config, &fen, rating, samples),
        Command::Match {
            first,
            second,
            games,
            threads,
            max_plies,
        } => run_match(&config, &first, &second, games, threads, max_plies),
        Command::Play { rating, color } => run_play(&config, rating, &color),
    }
}

fn make_rng(config: &EngineConfig) -> ChaCha8Rng {
    match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn run_select(config: &EngineConfig, fen: &str, rating: Option<i32>, samples: usize) -> Result<()> {
    let engine = AdaptiveEngine::from_config(config);
    let rating = rating.map(Rating::new).unwrap_or_else(|| config.rating());
    let mut position = Position::from_fen(fen)?;
    let mut rng = make_rng(config);

    let calibration = engine.calibrate(rating);
    println!("📋 FEN: {}", position.fen());
    println!("🎯 Rating {} → {}", rating, calibration.plan);

    let start = Instant::now();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for _ in 0..samples.max(1) {
        let selection = engine.select_move(&mut position, rating, &mut rng);
        *counts.entry(selection.to_string()).or_insert(0) += 1;
    }
    let elapsed = start.elapsed();

    if counts.len() == 1 && samples <= 1 {
        let (mv, _) = counts.iter().next().ok_or_else(|| anyhow!("no selection made"))?;
        println!("✅ Lance: {}", mv);
    } else {
        let mut ranked: Vec<_> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        println!("✅ Distribuição ({} amostras, {} lances distintos):", samples, ranked.len());
        for (mv, n) in ranked {
            println!("   {:<6} {:>5}  ({:.1}%)", mv, n, 100.0 * n as f64 / samples as f64);
        }
    }
    println!("⏱️  Tempo: {:.2}ms", elapsed.as_secs_f64() * 1000.0);
    Ok(())
}

/// "random", nome de tier, "estratégia@rating" ou só o rating.
fn parse_player(spec: &str, config: &EngineConfig) -> Result<Player> {
    let spec = spec.trim().to_ascii_lowercase();
    let tier = match spec.as_str() {
        "random" => Some(Tier::Random),
        "expert" => Some(Tier::Expert),
        "strong" => Some(Tier::Strong),
        "intermediate" => Some(Tier::Intermediate),
        "beginner" => Some(Tier::Beginner),
        _ => None,
    };
    if let Some(tier) = tier {
        return Ok(Player::tier(tier));
    }

    let (strategy, rating) = match spec.split_once('@') {
        Some((strategy, rating)) => (strategy.parse::<Strategy>()?, rating),
        None => (config.strategy, spec.as_str()),
    };
    let rating: i32 = rating
        .parse()
        .with_context(|| format!("invalid player '{}'", spec))?;
    let engine = AdaptiveEngine::new(strategy).with_hybrid_floor(config.hybrid_floor());
    Ok(Player::rated(engine, Rating::new(rating)))
}

fn run_match(
    config: &EngineConfig,
    first: &str,
    second: &str,
    games: usize,
    threads: Option<usize>,
    max_plies: Option<u32>,
) -> Result<()> {
    let first = parse_player(first, config)?;
    let second = parse_player(second, config)?;
    let seed = config.seed.unwrap_or_else(rand::random);

    let mut arena = Arena::new().with_max_plies(max_plies.unwrap_or(config.max_plies.max(1)));
    if let Some(threads) = threads {
        arena = arena.with_threads(threads);
    }

    println!("⚔️  {} vs {}: {} partidas, {} threads, seed {}", first, second, games, arena.threads(), seed);
    let start = Instant::now();
    let report = arena.run_match(&first, &second, games, seed);
    println!("📊 {}", report);
    println!(
        "   Pontos: {} {:.1} x {:.1} {}",
        first,
        report.first_score(),
        report.second_score(),
        second
    );
    println!("⏱️  Tempo total: {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn report_game_over(session: &GameSession) {
    let Some(result) = session.result() else {
        return;
    };
    let verdict = match result.winner() {
        Some(color) if color == session.human_color() => "vitória do humano",
        Some(_) => "vitória do motor",
        None => "empate",
    };
    println!("🏁 Fim de jogo: {} ({})", result.score(), verdict);
    println!("   {}", result);
    println!("   FEN final: {}", session.fen());
}

fn run_play(config: &EngineConfig, rating: Option<i32>, color: &str) -> Result<()> {
    let human = match color.to_ascii_lowercase().as_str() {
        "white" | "w" | "brancas" => Color::White,
        "black" | "b" | "pretas" => Color::Black,
        other => bail!("unknown color '{}' (white or black)", other),
    };
    let rating = rating.map(Rating::new).unwrap_or_else(|| config.rating());
    let engine = AdaptiveEngine::from_config(config);
    let mut session = GameSession::new(rating, human);
    let mut rng = make_rng(config);

    println!(
        "♟️  Nova partida: humano com {:?}, motor a {} ({})",
        session.human_color(),
        rating,
        engine.strategy()
    );
    println!("   Comandos: <lance uci> | moves | rating <n> | reset | quit");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if session.is_over() {
            report_game_over(&session);
            break;
        }

        if session.is_engine_turn() {
            let reply = session.engine_reply(&engine, &mut rng)?;
            println!("🤖 Motor joga: {}", reply);
            continue;
        }

        println!("📋 {}", session.fen());
        print!("> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let input = line.trim();
        let mut words = input.split_whitespace();

        match words.next() {
            None => continue,
            Some("quit") => break,
            Some("moves") => println!("   {}", session.legal_moves_uci().join(" ")),
            Some("reset") => {
                session.reset();
                println!("🔄 Partida reiniciada");
            }
            Some("rating") => match words.next().map(str::parse::<i32>) {
                Some(Ok(value)) => println!("🎯 Rating: {}", session.set_rating(value)),
                _ => println!("❌ Uso: rating <n>"),
            },
            Some(uci) => {
                if let Err(e) = session.play_uci(uci) {
                    println!("❌ {}", e);
                }
            }
        }
    }
    Ok(())
}

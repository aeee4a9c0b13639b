// Ficheiro: src/engine/config.rs
// Descrição: Configuração do motor. TOML opcional + overrides por variável de ambiente.

use crate::arena::DEFAULT_MAX_PLIES;
use crate::core::*;
use crate::engine::calibrator::{Strategy, DEFAULT_HYBRID_FLOOR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Variável com o caminho explícito do ficheiro de configuração.
pub const CONFIG_ENV_VAR: &str = "ADAPTIVE_CHESS_CONFIG";

/// Locais procurados, por ordem, quando a variável não está definida.
pub const CONFIG_SEARCH_PATHS: &[&str] = &["adaptive_chess.toml", "../adaptive_chess.toml"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub strategy: Strategy,
    /// Só usado pela estratégia híbrida
    pub hybrid_floor: i32,
    pub default_rating: i32,
    /// `None` = semente aleatória do sistema
    pub seed: Option<u64>,
    /// Limite de meios-lances por partida no modo self-play
    pub max_plies: u32,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            hybrid_floor: DEFAULT_HYBRID_FLOOR as i32,
            default_rating: Rating::default().get() as i32,
            seed: None,
            max_plies: DEFAULT_MAX_PLIES,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn rating(&self) -> Rating {
        Rating::new(self.default_rating)
    }

    pub fn hybrid_floor(&self) -> Rating {
        Rating::new(self.hybrid_floor)
    }

    /// Aplica overrides a partir de uma função de lookup (o ambiente, em produção).
    /// Valores que não fazem parse são ignorados com aviso.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ADAPTIVE_CHESS_STRATEGY") {
            match v.parse::<Strategy>() {
                Ok(strategy) => self.strategy = strategy,
                Err(e) => warn!("ignoring ADAPTIVE_CHESS_STRATEGY: {}", e),
            }
        }
        if let Some(v) = lookup("ADAPTIVE_CHESS_RATING") {
            match v.trim().parse::<i32>() {
                Ok(rating) => self.default_rating = rating,
                Err(e) => warn!("ignoring ADAPTIVE_CHESS_RATING={}: {}", v, e),
            }
        }
        if let Some(v) = lookup("ADAPTIVE_CHESS_SEED") {
            match v.trim().parse::<u64>() {
                Ok(seed) => self.seed = Some(seed),
                Err(e) => warn!("ignoring ADAPTIVE_CHESS_SEED={}: {}", v, e),
            }
        }
        if let Some(v) = lookup("ADAPTIVE_CHESS_LOG_LEVEL") {
            self.log_level = v;
        }
        self
    }

    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }
}

/// Lê e faz parse de um ficheiro TOML, sem overrides.
pub fn load_from_path(path: &Path) -> Result<EngineConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
    EngineConfig::from_toml_str(&content)
}

/// Carrega a configuração: `ADAPTIVE_CHESS_CONFIG`, depois os caminhos padrão,
/// depois os defaults. Overrides de ambiente são aplicados no fim.
/// Ficheiros ilegíveis não abortam: avisam e caem para os defaults.
pub fn load_config() -> EngineConfig {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            candidates.push(path);
        } else {
            warn!(
                "{}={} not found, searching defaults",
                CONFIG_ENV_VAR,
                path.display()
            );
        }
    }
    candidates.extend(CONFIG_SEARCH_PATHS.iter().map(PathBuf::from));

    let base = match candidates.iter().find(|path| path.exists()) {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_from_path(path).unwrap_or_else(|e| {
                warn!("{}, using defaults", e);
                EngineConfig::default()
            })
        }
        None => {
            debug!("No adaptive_chess.toml found, using built-in defaults");
            EngineConfig::default()
        }
    };

    base.apply_env_overrides()
}

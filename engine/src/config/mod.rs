//! Configuration management
//!
//! Handles loading, validation, and management of the Tiller configuration.
//! Configuration is stored in TOML format at ~/.tiller/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level
//! - **memory**: Reinforcement/decay magnitudes and the relevance bonus
//! - **scoring**: Confidence weights and clamps, action cap
//! - **planner**: Plan step cap
//! - **api_server**: Bind port for `tiller serve`
//!
//! The reinforcement/decay magnitudes and scoring weights are deliberate
//! design choices rather than values fixed by behavior, so they live here
//! and flow into the engine as [`EngineTuning`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use sdk::errors::EngineError;

use crate::pipeline::EngineTuning;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core engine settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Memory store tuning
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Confidence scoring tuning
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Planner tuning
    #[serde(default)]
    pub planner: PlannerConfig,

    /// API server settings
    #[serde(default)]
    pub api_server: ApiServerConfig,
}

/// Core engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Memory store tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Strength added to every retrieved entry per call
    pub reinforcement_increment: f64,
    /// Strength removed from every untouched entry per call
    pub decay_decrement: f64,
    /// Relevance bonus per unit of strength for tag-matched entries
    pub relevance_strength_bonus: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            reinforcement_increment: 0.15,
            decay_decrement: 0.05,
            relevance_strength_bonus: 0.1,
        }
    }
}

/// Confidence scoring tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of average retrieved-memory strength
    pub memory_weight: f64,
    /// Weight of directive specificity
    pub specificity_weight: f64,
    /// Lower clamp for action confidence
    pub confidence_floor: f64,
    /// Upper clamp for action confidence
    pub confidence_ceiling: f64,
    /// Maximum synthesized actions per response
    pub max_actions: usize,
    /// Number of top retrieved entries the analyzer considers
    pub analysis_top_n: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            memory_weight: 0.5,
            specificity_weight: 0.5,
            confidence_floor: 0.05,
            confidence_ceiling: 0.95,
            max_actions: 3,
            analysis_top_n: 3,
        }
    }
}

/// Planner tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Maximum plan steps (also the specificity scale cap)
    pub max_steps: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { max_steps: 5 }
    }
}

/// API server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiServerConfig {
    /// Port to bind on 127.0.0.1 (0 picks a free port)
    pub port: u16,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self { port: 7171 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            memory: MemoryConfig::default(),
            scoring: ScoringConfig::default(),
            planner: PlannerConfig::default(),
            api_server: ApiServerConfig::default(),
        }
    }
}

impl Config {
    /// Default configuration file path (~/.tiller/config.toml)
    pub fn default_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;
        Ok(home.join(".tiller").join("config.toml"))
    }

    /// Load configuration from the default location, creating it with
    /// defaults on first use.
    pub fn load_or_create() -> Result<Self, EngineError> {
        let path = Self::default_path()?;
        if path.exists() {
            return Self::load_from_path(&path);
        }

        let config = Self::default();
        config.save_to_path(&path)?;
        tracing::info!("Created default configuration at {:?}", path);
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {e}")))?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to a specific path, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<(), EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| EngineError::Config(format!("Failed to create config dir: {e}")))?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, contents)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {e}")))?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), EngineError> {
        let unit = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(EngineError::Config(format!(
                    "{name} must be in [0.0, 1.0], got {value}"
                )))
            }
        };

        unit("memory.reinforcement_increment", self.memory.reinforcement_increment)?;
        unit("memory.decay_decrement", self.memory.decay_decrement)?;
        unit("memory.relevance_strength_bonus", self.memory.relevance_strength_bonus)?;
        unit("scoring.memory_weight", self.scoring.memory_weight)?;
        unit("scoring.specificity_weight", self.scoring.specificity_weight)?;
        unit("scoring.confidence_floor", self.scoring.confidence_floor)?;
        unit("scoring.confidence_ceiling", self.scoring.confidence_ceiling)?;

        if self.scoring.confidence_floor > self.scoring.confidence_ceiling {
            return Err(EngineError::Config(
                "scoring.confidence_floor must not exceed scoring.confidence_ceiling".to_string(),
            ));
        }
        if self.planner.max_steps < 2 {
            return Err(EngineError::Config(
                "planner.max_steps must be at least 2".to_string(),
            ));
        }
        if self.scoring.max_actions == 0 {
            return Err(EngineError::Config(
                "scoring.max_actions must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the engine tuning from this configuration
    pub fn tuning(&self) -> EngineTuning {
        EngineTuning {
            reinforcement_increment: self.memory.reinforcement_increment,
            decay_decrement: self.memory.decay_decrement,
            relevance_strength_bonus: self.memory.relevance_strength_bonus,
            memory_weight: self.scoring.memory_weight,
            specificity_weight: self.scoring.specificity_weight,
            confidence_floor: self.scoring.confidence_floor,
            confidence_ceiling: self.scoring.confidence_ceiling,
            max_plan_steps: self.planner.max_steps,
            max_actions: self.scoring.max_actions,
            analysis_top_n: self.scoring.analysis_top_n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_tuning_defaults() {
        assert_eq!(Config::default().tuning(), EngineTuning::default());
    }

    #[test]
    fn test_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.tuning(), config.tuning());
        assert_eq!(parsed.core.log_level, config.core.log_level);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[core]\nlog_level = \"debug\"\n").unwrap();
        assert_eq!(parsed.core.log_level, "debug");
        assert_eq!(parsed.memory.reinforcement_increment, 0.15);
        assert_eq!(parsed.planner.max_steps, 5);
    }

    #[test]
    fn test_validation_rejects_out_of_range_values() {
        let mut config = Config::default();
        config.memory.reinforcement_increment = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scoring.confidence_floor = 0.9;
        config.scoring.confidence_ceiling = 0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.planner.max_steps = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.core.log_level = "trace".to_string();
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.core.log_level, "trace");
    }
}

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    /// Edge length of the square board.
    #[serde(default = "defaults::board_size")]
    pub board_size: usize,

    /// Base RNG seed. When omitted a seed is drawn from entropy and logged.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Score shown as 100% progress in the status line.
    #[serde(default = "defaults::goal_score")]
    pub goal_score: u64,

    #[serde(default)]
    pub spawn: SpawnConfig,

    #[serde(default)]
    pub autoplay: AutoplayConfig,

    #[serde(default)]
    pub recorder: RecorderConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct SpawnConfig {
    /// Probability that a new tile is a 2 rather than a 4.
    #[serde(default = "defaults::low_rank_probability")]
    pub low_rank_probability: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct AutoplayConfig {
    #[serde(default = "defaults::num_games")]
    pub num_games: u32,
    /// Hard cap per game; a capped game is recorded as unfinished.
    #[serde(default = "defaults::max_moves")]
    pub max_moves: u64,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct RecorderConfig {
    /// Directory holding `metadata.db`. Recording is off when unset.
    #[serde(default)]
    pub db_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_size: defaults::board_size(),
            seed: None,
            goal_score: defaults::goal_score(),
            spawn: SpawnConfig::default(),
            autoplay: AutoplayConfig::default(),
            recorder: RecorderConfig::default(),
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            low_rank_probability: defaults::low_rank_probability(),
        }
    }
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            num_games: defaults::num_games(),
            max_moves: defaults::max_moves(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = std::fs::File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.board_size > 0, "board_size must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.spawn.low_rank_probability),
            "spawn.low_rank_probability must be within [0, 1], got {}",
            self.spawn.low_rank_probability
        );
        ensure!(self.autoplay.num_games > 0, "autoplay.num_games must be positive");
        Ok(())
    }
}

mod defaults {
    pub fn board_size() -> usize { twenty48_core::engine::DEFAULT_SIZE }
    pub fn goal_score() -> u64 { 30_000 }
    pub fn low_rank_probability() -> f64 { twenty48_core::engine::DEFAULT_LOW_RANK_PROBABILITY }
    pub fn num_games() -> u32 { 8 }
    pub fn max_moves() -> u64 { 100_000 }
}

//! File and command-line configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tile_merge_core::{TileValue, WIN_THRESHOLD};
use tile_merge_session::Config as SessionConfig;
use tile_merge_system_spawning as spawning;
use tile_merge_world as world;

/// Best-score file used when neither the command line nor the file names one.
pub(crate) const DEFAULT_BEST_SCORE_PATH: &str = "tile-merge-best.toml";

/// Optional settings read from a TOML file.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    seed: Option<u64>,
    best_score_path: Option<PathBuf>,
    undo_budget: Option<u32>,
    history_capacity: Option<usize>,
    win_threshold: Option<u32>,
    four_probability: Option<f64>,
}

impl FileConfig {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) seed: u64,
    pub(crate) best_score_path: PathBuf,
    pub(crate) session: SessionConfig,
}

/// Merges command-line overrides on top of the file settings.
///
/// A missing seed is drawn from the thread generator.
pub(crate) fn resolve(
    seed: Option<u64>,
    best_score_path: Option<PathBuf>,
    file: FileConfig,
) -> Result<Settings> {
    let defaults = world::Config::default();
    let win_threshold = match file.win_threshold {
        Some(value) => TileValue::new(value).ok_or_else(|| {
            anyhow!("win_threshold must be a power of two of at least 2, got {value}")
        })?,
        None => WIN_THRESHOLD,
    };
    let world = world::Config::new(
        file.undo_budget.unwrap_or(defaults.undo_budget()),
        file.history_capacity.unwrap_or(defaults.history_capacity()),
        win_threshold,
    );

    let seed = seed.or(file.seed).unwrap_or_else(rand::random);
    let mut spawning = spawning::Config::new(seed);
    if let Some(probability) = file.four_probability {
        spawning = spawning.with_four_probability(probability);
    }

    Ok(Settings {
        seed,
        best_score_path: best_score_path
            .or(file.best_score_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BEST_SCORE_PATH)),
        session: SessionConfig::new(world, spawning),
    })
}

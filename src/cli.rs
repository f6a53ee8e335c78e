//! Command-line options for the `blockfall` binary.
//!
//! `--preset` picks the base layout, `--config` overlays a JSON file on top of it
//! field by field, `--seed` fixes the piece sequence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::Value;

use crate::core::EngineConfig;

/// Board layout the game starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Preset {
    /// 12x20, 10 lines per level, gentle speed-up
    #[default]
    Desktop,
    /// 10x20, 5 lines per level, steep speed-up
    #[value(alias = "mobile")]
    Compact,
    /// 12x20 with the compact leveling cadence
    Alternate,
}

impl Preset {
    pub fn config(self) -> EngineConfig {
        match self {
            Preset::Desktop => EngineConfig::desktop(),
            Preset::Compact => EngineConfig::compact(),
            Preset::Alternate => EngineConfig::alternate(),
        }
    }
}

/// Falling-block puzzle in the terminal.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "blockfall",
    version,
    about = "Falling-block puzzle in the terminal.",
    long_about = "Falling-block puzzle in the terminal. Clear full rows to score; \
        the game speeds up every few lines.\n\n\
        CONTROLS:\n  Left/Right, A/D, H/L  Move     Up, W, K          Rotate\n  \
        Down, S, J, Space     Drop     P                 Pause\n  \
        R                     Restart  Q / Esc / Ctrl-C  Quit"
)]
pub struct Options {
    /// Board layout to start from.
    #[arg(short, long, value_enum, default_value = "desktop")]
    pub preset: Preset,

    /// JSON file whose fields override the preset (e.g. {"board_height": 24}).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed for the piece sequence. Taken from the clock when not set.
    #[arg(short, long, value_name = "N")]
    pub seed: Option<u32>,
}

impl Options {
    /// Preset plus config file, validated.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let base = self.preset.config();
        let config = match &self.config {
            Some(path) => load_config(path, base)?,
            None => base,
        };
        config.validate().context("configuration rejected")?;
        Ok(config)
    }
}

/// Read a JSON config file and apply it over `base`.
pub fn load_config(path: &Path, base: EngineConfig) -> Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    overlay_json(base, &text).with_context(|| format!("parsing config {}", path.display()))
}

/// Fields present in `json` replace the matching fields of `base`.
pub fn overlay_json(base: EngineConfig, json: &str) -> Result<EngineConfig> {
    let patch: Value = serde_json::from_str(json)?;
    let Value::Object(patch) = patch else {
        bail!("config must be a JSON object");
    };

    let mut merged = serde_json::to_value(base)?;
    if let Value::Object(fields) = &mut merged {
        for (key, value) in patch {
            if !fields.contains_key(&key) {
                bail!("unknown config field {key:?}");
            }
            fields.insert(key, value);
        }
    }
    Ok(serde_json::from_value(merged)?)
}

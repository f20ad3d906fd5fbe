use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use arrow_quest_core::LevelId;
use arrow_quest_system_pacing::Config as PacingConfig;
use arrow_quest_system_programmer::DEFAULT_SLOT_CAPACITY;
use serde::Deserialize;
use tracing::debug;

/// Configuration file looked up in the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "arrow-quest.toml";

/// Tunables loaded from `arrow-quest.toml`. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Timing of run steps.
    pub(crate) pacing: PacingSettings,
    /// Program drop zone limits.
    pub(crate) program: ProgramSettings,
    /// Campaign progression.
    pub(crate) campaign: CampaignSettings,
}

/// `[pacing]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PacingSettings {
    /// Length of the avatar move animation in milliseconds.
    pub(crate) move_duration_ms: u64,
    /// Pause after each move in milliseconds.
    pub(crate) step_delay_ms: u64,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            move_duration_ms: 500,
            step_delay_ms: 300,
        }
    }
}

impl PacingSettings {
    /// Builds the pacing system configuration.
    pub(crate) fn config(&self) -> PacingConfig {
        PacingConfig::new(
            Duration::from_millis(self.move_duration_ms),
            Duration::from_millis(self.step_delay_ms),
        )
    }
}

/// `[program]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ProgramSettings {
    /// Number of arrow slots in the drop zone.
    pub(crate) slot_capacity: usize,
}

impl Default for ProgramSettings {
    fn default() -> Self {
        Self {
            slot_capacity: DEFAULT_SLOT_CAPACITY,
        }
    }
}

/// `[campaign]` table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CampaignSettings {
    /// Index of the level a new campaign starts on.
    pub(crate) start_level: usize,
}

impl CampaignSettings {
    /// Validated starting level.
    pub(crate) fn start_level(&self) -> Result<LevelId> {
        LevelId::new(self.start_level).context("invalid campaign.start_level in configuration")
    }
}

impl Settings {
    /// Parses settings from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(contents).context("failed to parse configuration toml contents")?;
        ensure!(
            settings.program.slot_capacity > 0,
            "program.slot_capacity must be at least 1"
        );
        Ok(settings)
    }
}

/// Loads settings from `explicit`, or from [`DEFAULT_CONFIG_PATH`] when it exists.
///
/// A missing default file yields the built-in defaults; a missing explicit
/// path is an error.
pub(crate) fn load(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        return read(path);
    }

    let path = Path::new(DEFAULT_CONFIG_PATH);
    if path.exists() {
        read(path)
    } else {
        debug!("no {DEFAULT_CONFIG_PATH} found, using defaults");
        Ok(Settings::default())
    }
}

fn read(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;
    let settings = Settings::parse(&contents)
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(settings)
}

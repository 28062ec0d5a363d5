use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::scheduler::QueuePolicy;

fn default_volume() -> u8 {
    50
}

/// Plugin configuration
///
/// The host surfaces these options in its configuration UI; this struct is
/// the serialized form handed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JingleConfig {
    /// Jingle playback volume, 0-100
    #[serde(default = "default_volume")]
    pub volume: u8,

    /// Play jingles even when the in-game music is not muted
    #[serde(default)]
    pub play_on_unmute: bool,

    /// Volume test mode: play a jingle on every stat change
    #[serde(default)]
    pub test_mode: bool,

    /// Delay before the output device is opened, in milliseconds.
    /// 0 disables the pre-roll.
    #[serde(default)]
    pub startup_delay_ms: u64,

    /// Ordering of queued jingle requests
    #[serde(default)]
    pub queue_policy: QueuePolicy,
}

impl Default for JingleConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            play_on_unmute: false,
            test_mode: false,
            startup_delay_ms: 0,
            queue_policy: QueuePolicy::default(),
        }
    }
}

impl JingleConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let config: JingleConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(path, json).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })
    }

    /// Validate option ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.volume > 100 {
            return Err(ConfigError::Invalid(format!(
                "volume must be 0-100, got {}",
                self.volume
            )));
        }
        Ok(())
    }
}

//! Game configuration
//!
//! The configuration is a JSON document with camelCase keys. Every field is
//! optional: missing values fall back to the defaults below, field by field.
//!
//! ```
//! use tui_stacker_core::GameConfig;
//!
//! let config = GameConfig::from_json(r#"{ "gameplay": { "accuracy": 0.5 } }"#).unwrap();
//! assert_eq!(config.gameplay.accuracy, 0.5);
//! assert_eq!(config.gameplay.distance, 12.0);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::color::{may_saturate, parse_hex_color};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub block: BlockConfig,
    pub gameplay: GameplayConfig,
    pub instructions: InstructionsConfig,
    pub camera: CameraConfig,
    pub background: BackgroundConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockConfig {
    pub base: BaseBlockConfig,
    pub colors: ColorsConfig,
}

/// The immobile block at the bottom of the stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseBlockConfig {
    /// Hex color string, e.g. `"0x333344"`.
    pub color: String,
    pub scale: Extent,
}

impl Default for BaseBlockConfig {
    fn default() -> Self {
        Self {
            color: "0x333344".to_string(),
            scale: Extent {
                x: 10.0,
                y: 2.0,
                z: 10.0,
            },
        }
    }
}

/// Per-block color variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorsConfig {
    pub base: RgbConfig,
    pub range: RgbConfig,
    pub intensity: RgbConfig,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            base: RgbConfig::splat(200.0),
            range: RgbConfig::splat(55.0),
            intensity: RgbConfig {
                r: 0.3,
                g: 0.34,
                b: 0.38,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RgbConfig {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl RgbConfig {
    pub fn splat(v: f64) -> Self {
        Self { r: v, g: v, b: v }
    }
}

/// `{x, y, z}` as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Extent {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Extent> for DVec3 {
    fn from(e: Extent) -> Self {
        DVec3::new(e.x, e.y, e.z)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameplayConfig {
    /// Half-width of the band the active block sweeps before reversing.
    pub distance: f64,
    pub speed: SpeedConfig,
    /// Largest overlap shortfall (world units) still counted as perfect.
    pub accuracy: f64,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            distance: 12.0,
            speed: SpeedConfig::default(),
            accuracy: 0.2,
        }
    }
}

/// Movement speed in world units per target frame:
/// `base + min(growth * stack_len, cap)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeedConfig {
    pub base: f64,
    pub growth: f64,
    pub cap: f64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            base: 0.16,
            growth: 0.0008,
            cap: 0.08,
        }
    }
}

impl SpeedConfig {
    pub fn at(&self, stack_len: usize) -> f64 {
        self.base + (self.growth * stack_len as f64).min(self.cap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstructionsConfig {
    /// Stack length at which the instructions are hidden.
    pub height: usize,
}

impl Default for InstructionsConfig {
    fn default() -> Self {
        Self { height: 5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    /// Added to the followed block height.
    pub offset: f64,
    /// Half of the visible world width.
    pub view_size: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: 6.0,
            view_size: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundConfig {
    pub color: String,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            color: "0x111118".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gameplay;
        if !g.distance.is_finite() || g.distance <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "gameplay.distance",
                reason: "must be a positive number",
            });
        }
        if !g.accuracy.is_finite() || g.accuracy < 0.0 {
            return Err(ConfigError::Invalid {
                field: "gameplay.accuracy",
                reason: "must be a non-negative number",
            });
        }
        let s = &g.speed;
        if [s.base, s.growth, s.cap]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::Invalid {
                field: "gameplay.speed",
                reason: "terms must be non-negative numbers",
            });
        }

        let scale = self.block.base.scale;
        if [scale.x, scale.y, scale.z]
            .iter()
            .any(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err(ConfigError::Invalid {
                field: "block.base.scale",
                reason: "every component must be positive",
            });
        }

        self.base_color()?;
        parse_hex_color(&self.background.color)?;

        let colors = &self.block.colors;
        if may_saturate(&colors.base, &colors.range) {
            log::warn!("block colors can leave the 0..=255 range and will be clamped");
        }

        Ok(())
    }

    pub fn base_color(&self) -> Result<u32, ConfigError> {
        parse_hex_color(&self.block.base.color)
    }

    pub fn base_scale(&self) -> DVec3 {
        self.block.base.scale.into()
    }
}

/// Host settings read from the environment.
///
/// - `STACKER_CONFIG`: path to a JSON game config (built-in defaults otherwise)
/// - `STACKER_SEED`: RNG seed (defaults to the current time)
/// - `STACKER_PLAYER`: name recorded on the local leaderboard
/// - `STACKER_LOG_FILE`: file that receives log output (the terminal is busy)
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    pub config_path: Option<PathBuf>,
    pub seed: Option<u32>,
    pub player: String,
    pub log_file: Option<PathBuf>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            seed: None,
            player: "player".to_string(),
            log_file: None,
        }
    }
}

impl LaunchOptions {
    pub fn from_env() -> Self {
        use std::env;

        let path_var = |name: &str| {
            env::var(name)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
        };
        let config_path = path_var("STACKER_CONFIG");
        let log_file = path_var("STACKER_LOG_FILE");

        let seed = env::var("STACKER_SEED").ok().and_then(|s| s.trim().parse().ok());

        let player = env::var("STACKER_PLAYER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "player".to_string());

        Self {
            config_path,
            seed,
            player,
            log_file,
        }
    }
}

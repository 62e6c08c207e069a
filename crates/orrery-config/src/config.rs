//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use orrery_scene::Scene;

use crate::error::ConfigError;

/// Top-level orrery configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Camera placement.
    pub camera: CameraConfig,
    /// Scene contents: background image and body table.
    pub scene: SceneConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
}

/// Static camera placement. The camera never moves during a session; only
/// its aspect ratio changes, on window resize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position in world units.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
}

/// Scene contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Path to the background image, relative to the working directory.
    pub background: PathBuf,
    /// Body table, parents before children. Validated by
    /// [`orrery_scene::Scene::new`] at startup.
    pub bodies: Vec<orrery_scene::BodySpec>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            title: "orrery".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        // Raised above the orbital plane so the planet's sweep and the
        // moon's epicycle both read clearly.
        Self {
            eye: Vec3::new(0.0, 0.9, 1.1),
            target: Vec3::ZERO,
            fov_y_deg: 45.0,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: PathBuf::from("assets/bg.png"),
            bodies: Scene::solar_system().bodies().to_vec(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save ---

/// Where [`Config::load_or_create`] got its result from.
///
/// Returned instead of logging directly: config loading runs before the
/// tracing subscriber is installed, so the caller reports the source once
/// logging is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from an existing file.
    Loaded,
    /// No file existed; defaults were written to disk.
    Created,
}

impl Config {
    /// Load config from the given file, or create a default config file.
    pub fn load_or_create(config_path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path).map_err(|source| {
                ConfigError::Read {
                    path: config_path.to_path_buf(),
                    source,
                }
            })?;
            let config: Config = ron::from_str(&contents).map_err(|source| {
                ConfigError::Parse {
                    path: config_path.to_path_buf(),
                    source,
                }
            })?;
            Ok((config, ConfigSource::Loaded))
        } else {
            let config = Config::default();
            config.save(config_path)?;
            Ok((config, ConfigSource::Created))
        }
    }

    /// Save config to the given file as RON.
    pub fn save(&self, config_path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: config_path.to_path_buf(),
            source,
        };

        if let Some(parent) = config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::write(config_path, serialized).map_err(write_error)?;
        Ok(())
    }
}

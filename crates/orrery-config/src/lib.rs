//! Configuration for the orrery.
//!
//! Settings persist to disk as a RON file, with every field defaulted so old
//! config files keep loading as new fields appear. CLI flags override loaded
//! values via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CameraConfig, Config, ConfigSource, DebugConfig, SceneConfig, WindowConfig};
pub use error::ConfigError;

//! Runtime configuration, read from a TOML file.
//!
//! Every section and every key has a default, so a file only needs to name
//! what it overrides:
//!
//! ```toml
//! [clock]
//! time_scale = 432000.0
//!
//! [camera]
//! approach_speed = 3.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub clock: ClockConfig,
    pub orbits: OrbitConfig,
    pub window: WindowConfig,
}

/// Knobs for the camera rig. Rates are per second, angles in radians unless
/// the name says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fovy_degrees: f32,
    pub home_position: [f32; 3],
    pub home_target: [f32; 3],
    /// Radians of look rotation per pixel of pointer motion.
    pub look_sensitivity: f32,
    /// Fraction of the look distance panned per pixel of pointer motion.
    pub pan_sensitivity: f32,
    /// How fast smoothed motion catches up with its goal.
    pub smooth_factor: f32,
    /// Same for the look-at target; kept below `smooth_factor` so zooming
    /// eases the target in after the position.
    pub target_smooth_factor: f32,
    /// Fraction of the look distance covered by one scroll notch.
    pub zoom_step: f32,
    pub approach_speed: f32,
    pub min_approach_rate: f32,
    /// The approach stops this many body radii away from the body.
    pub approach_distance_factor: f32,
    pub lock_epsilon: f32,
    /// Closest zoom while locked, in body radii.
    pub min_zoom_factor: f32,
    /// Idle orbiting speed while locked.
    pub creep_rate: f32,
    /// Pitch is refused within this angle of straight up or down.
    pub pitch_limit: f32,
    pub z_near_multiplier: f32,
    pub z_far_multiplier: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Simulation seconds per wall-clock second.
    pub time_scale: f64,
    pub start_paused: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub segments: usize,
    /// Orbit lines are drawn in the body's color scaled by this.
    pub path_brightness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Zero means no limit.
    pub framerate_limit: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            fovy_degrees: 45.0,
            home_position: [0.0, 80.0, 220.0],
            home_target: [0.0, 0.0, 0.0],
            look_sensitivity: 0.005,
            pan_sensitivity: 0.0015,
            smooth_factor: 10.0,
            target_smooth_factor: 4.0,
            zoom_step: 0.1,
            approach_speed: 2.0,
            min_approach_rate: 1.0,
            approach_distance_factor: 6.0,
            lock_epsilon: 0.02,
            min_zoom_factor: 1.5,
            creep_rate: 0.05,
            pitch_limit: 0.01,
            z_near_multiplier: 0.01,
            z_far_multiplier: 1024.0,
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            // One day per second
            time_scale: 86400.0,
            start_paused: false,
        }
    }
}

impl Default for OrbitConfig {
    fn default() -> Self {
        OrbitConfig {
            segments: crate::astro::orbit::DEFAULT_PATH_SEGMENTS,
            path_brightness: 0.6,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "Astral".to_owned(),
            width: 1280,
            height: 800,
            framerate_limit: 60,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml(&text)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Loads the file if there is one. A missing file falls back to the
    /// defaults; a malformed one is still an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Config::default()),
            Some(path) if !path.exists() => {
                warn!(path = %path.display(), "config file not found, using defaults");
                Ok(Config::default())
            }
            Some(path) => Self::load(path),
        }
    }
}

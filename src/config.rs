use glam::{IVec2, Vec2};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::ray::Ray;
use crate::raycast::{CornerPolicy, TraversalOptions};
use crate::stepper::DEFAULT_MAX_STEPS_PER_AXIS;

pub const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub ray: RayConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub snapshots: SnapshotConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_cols")]
    pub cols: i32,
    #[serde(default = "default_rows")]
    pub rows: i32,
    #[serde(default = "default_tile_size")]
    pub tile_width: f32,
    #[serde(default = "default_tile_size")]
    pub tile_height: f32,
    #[serde(default)]
    pub origin_x: f32,
    #[serde(default)]
    pub origin_y: f32,
}

/// Ray shown before any mouse input
#[derive(Debug, Default, Deserialize)]
pub struct RayConfig {
    #[serde(default)]
    pub origin_x: f32,
    #[serde(default)]
    pub origin_y: f32,
    #[serde(default)]
    pub destination_x: f32,
    #[serde(default)]
    pub destination_y: f32,
}

#[derive(Debug, Deserialize)]
pub struct TraversalConfig {
    #[serde(default = "default_max_steps_per_axis")]
    pub max_steps_per_axis: usize,
    #[serde(default)]
    pub corner_policy: CornerPolicy,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_bg")]
    pub background_r: u8,
    #[serde(default = "default_bg")]
    pub background_g: u8,
    #[serde(default = "default_bg")]
    pub background_b: u8,
    #[serde(default = "default_point_size")]
    pub point_size: f32,
    /// Empty border around the grid, in pixels
    #[serde(default)]
    pub margin: f32,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_directory")]
    pub directory: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// One of off, error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_cols() -> i32 { 40 }
fn default_rows() -> i32 { 30 }
fn default_tile_size() -> f32 { 20.0 }
fn default_max_steps_per_axis() -> usize { DEFAULT_MAX_STEPS_PER_AXIS }
fn default_window_title() -> String { "2D Tile Raycasting".to_string() }
fn default_bg() -> u8 { 51 }
fn default_point_size() -> f32 { 3.0 }
fn default_snapshot_directory() -> String { "snapshots".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
            tile_width: default_tile_size(),
            tile_height: default_tile_size(),
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_steps_per_axis: default_max_steps_per_axis(),
            corner_policy: CornerPolicy::default(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background_r: default_bg(),
            background_g: default_bg(),
            background_b: default_bg(),
            point_size: default_point_size(),
            margin: 0.0,
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            directory: default_snapshot_directory(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from `config.toml`, or use defaults if it is
    /// missing or malformed
    pub fn load() -> Self {
        Self::load_or_default(Path::new(CONFIG_PATH))
    }

    /// Like [`Config::load`] for an arbitrary path
    ///
    /// Runs before the logger is installed, so the outcome goes straight to
    /// stdout/stderr.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            println!("No {} found, using default configuration", path.display());
            return Config::default();
        }

        match Self::load_from(path) {
            Ok(config) => {
                println!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                eprintln!("Warning: {}", e);
                eprintln!("Using default configuration");
                Config::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Build the validated grid described by `[grid]`
    pub fn grid(&self) -> Result<Grid> {
        Grid::new(
            Vec2::new(self.grid.tile_width, self.grid.tile_height),
            Vec2::new(self.grid.origin_x, self.grid.origin_y),
            IVec2::new(self.grid.cols, self.grid.rows),
        )
    }

    pub fn initial_ray(&self) -> Ray {
        Ray::between(
            Vec2::new(self.ray.origin_x, self.ray.origin_y),
            Vec2::new(self.ray.destination_x, self.ray.destination_y),
        )
    }

    pub fn traversal_options(&self) -> TraversalOptions {
        TraversalOptions {
            max_steps_per_axis: self.traversal.max_steps_per_axis,
            corner_policy: self.traversal.corner_policy,
        }
    }
}

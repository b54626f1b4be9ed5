use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::grid::{Axis, Grid};
use crate::ray::Ray;
use crate::raycast::{traverse_with, ImpactEvent, Traversal, TraversalOptions};

/// Tolerance for times and points when replaying a snapshot
pub const SNAPSHOT_TOLERANCE: f32 = 1e-4;

/// A raycast frozen to disk: its inputs and the impacts it produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaycastSnapshot {
    pub name: String,
    pub grid: GridRecord,
    pub ray: RayRecord,
    #[serde(default)]
    pub options: TraversalOptions,
    pub impacts: Vec<ImpactRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRecord {
    pub tile_width: f32,
    pub tile_height: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub cols: i32,
    pub rows: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RayRecord {
    pub origin_x: f32,
    pub origin_y: f32,
    pub vector_x: f32,
    pub vector_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRecord {
    pub time: f32,
    pub x: f32,
    pub y: f32,
    pub tile_x: i32,
    pub tile_y: i32,
    /// "x" for vertical grid lines, "y" for horizontal ones
    pub axis: String,
}

impl From<&ImpactEvent> for ImpactRecord {
    fn from(impact: &ImpactEvent) -> Self {
        ImpactRecord {
            time: impact.time,
            x: impact.point.x,
            y: impact.point.y,
            tile_x: impact.tile.x,
            tile_y: impact.tile.y,
            axis: axis_name(impact.axis).to_string(),
        }
    }
}

fn axis_name(axis: Axis) -> &'static str {
    match axis {
        Axis::X => "x",
        Axis::Y => "y",
    }
}

/// Outcome of replaying a snapshot against the current traversal
#[derive(Debug)]
pub struct SnapshotCheck {
    pub name: String,
    pub expected: usize,
    pub actual: usize,
    pub mismatches: Vec<String>,
}

impl SnapshotCheck {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl RaycastSnapshot {
    /// Record a traversal together with the inputs that produced it
    pub fn capture(
        name: &str,
        grid: &Grid,
        ray: &Ray,
        options: &TraversalOptions,
        traversal: &Traversal,
    ) -> Self {
        RaycastSnapshot {
            name: name.to_string(),
            grid: GridRecord {
                tile_width: grid.tile_size().x,
                tile_height: grid.tile_size().y,
                origin_x: grid.origin().x,
                origin_y: grid.origin().y,
                cols: grid.tile_count().x,
                rows: grid.tile_count().y,
            },
            ray: RayRecord {
                origin_x: ray.origin.x,
                origin_y: ray.origin.y,
                vector_x: ray.vector.x,
                vector_y: ray.vector.y,
            },
            options: *options,
            impacts: traversal.impacts.iter().map(ImpactRecord::from).collect(),
        }
    }

    /// Save to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(path, json).map_err(|e| Error::io(path, e))?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let snapshot: RaycastSnapshot = serde_json::from_str(&json)?;
        Ok(snapshot)
    }

    /// Load every `.json` snapshot in a directory, sorted by file name
    pub fn load_dir(dir: &Path) -> Result<Vec<(PathBuf, Result<Self>)>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| Error::io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        paths.sort();

        Ok(paths
            .into_iter()
            .map(|path| {
                let snapshot = Self::load_from_file(&path);
                (path, snapshot)
            })
            .collect())
    }

    /// Rebuild the grid and ray the snapshot was taken with
    pub fn restore(&self) -> Result<(Grid, Ray)> {
        let grid = Grid::new(
            Vec2::new(self.grid.tile_width, self.grid.tile_height),
            Vec2::new(self.grid.origin_x, self.grid.origin_y),
            IVec2::new(self.grid.cols, self.grid.rows),
        )?;
        let ray = Ray::new(
            Vec2::new(self.ray.origin_x, self.ray.origin_y),
            Vec2::new(self.ray.vector_x, self.ray.vector_y),
        );
        Ok((grid, ray))
    }

    /// Re-run the traversal and compare it with the recorded impacts
    pub fn verify(&self) -> Result<SnapshotCheck> {
        let (grid, ray) = self.restore()?;
        let traversal = traverse_with(&grid, &ray, &self.options);
        let actual: Vec<ImpactRecord> = traversal.impacts.iter().map(ImpactRecord::from).collect();

        let mut mismatches = Vec::new();
        if actual.len() != self.impacts.len() {
            mismatches.push(format!(
                "expected {} impacts, got {}",
                self.impacts.len(),
                actual.len()
            ));
        }

        for (i, (expected, got)) in self.impacts.iter().zip(&actual).enumerate() {
            if (expected.tile_x, expected.tile_y) != (got.tile_x, got.tile_y) {
                mismatches.push(format!(
                    "impact {}: tile ({}, {}) != ({}, {})",
                    i, expected.tile_x, expected.tile_y, got.tile_x, got.tile_y
                ));
            }
            if expected.axis != got.axis {
                mismatches.push(format!("impact {}: axis {} != {}", i, expected.axis, got.axis));
            }
            if (expected.time - got.time).abs() > SNAPSHOT_TOLERANCE {
                mismatches.push(format!("impact {}: time {} != {}", i, expected.time, got.time));
            }
            let expected_point = Vec2::new(expected.x, expected.y);
            let got_point = Vec2::new(got.x, got.y);
            if expected_point.distance(got_point) > SNAPSHOT_TOLERANCE * expected_point.length().max(1.0) {
                mismatches.push(format!(
                    "impact {}: point {} != {}",
                    i, expected_point, got_point
                ));
            }
        }

        Ok(SnapshotCheck {
            name: self.name.clone(),
            expected: self.impacts.len(),
            actual: actual.len(),
            mismatches,
        })
    }
}

/// One line per impact, tab separated, for the clipboard and the replay tool
pub fn impact_table(traversal: &Traversal) -> String {
    let mut table = String::from("#\ttime\tx\ty\ttile\taxis\n");
    for (i, impact) in traversal.impacts.iter().enumerate() {
        let flag = if traversal.is_anomalous(i) { "\t!" } else { "" };
        table.push_str(&format!(
            "{}\t{:.4}\t{:.2}\t{:.2}\t({}, {})\t{}{}\n",
            i,
            impact.time,
            impact.point.x,
            impact.point.y,
            impact.tile.x,
            impact.tile.y,
            axis_name(impact.axis),
            flag
        ));
    }
    table
}

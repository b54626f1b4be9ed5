use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::grid::{Axis, Grid};
use crate::ray::Ray;
use crate::stepper::{step_axis, AxisPass, AxisStop, ImmediateExit, DEFAULT_MAX_STEPS_PER_AXIS};
use crate::tiles::{find_anomalies, visited_tiles, TileAnomaly};

/// Times closer than this count as the same corner crossing
const CORNER_TIME_EPSILON: f32 = 1e-5;
/// Points closer than this (world units) count as the same corner
const CORNER_POINT_EPSILON: f32 = 1e-3;

/// A crossing of a grid line by the ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactEvent {
    /// Fraction of the ray length at the crossing, in `[0, 1]`
    pub time: f32,
    /// World-space crossing point
    pub point: Vec2,
    /// Tile the ray enters at this crossing
    pub tile: IVec2,
    /// Axis whose grid lines were crossed (X for vertical lines)
    pub axis: Axis,
}

/// What to do when both axes cross a grid corner at the same time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerPolicy {
    /// Report both crossings, x first
    #[default]
    KeepBoth,
    /// Report one crossing entering the diagonal tile
    Collapse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalOptions {
    pub max_steps_per_axis: usize,
    pub corner_policy: CornerPolicy,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            max_steps_per_axis: DEFAULT_MAX_STEPS_PER_AXIS,
            corner_policy: CornerPolicy::default(),
        }
    }
}

/// How a traversal ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Both axes were stepped; see the per-axis reports for why each stopped
    Completed,
    /// The ray starts outside the grid, nothing was stepped
    OriginOutsideGrid,
    /// The first crossing of `axis` is already outside the grid
    ImmediateExit { axis: Axis },
}

/// Summary of one axis pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisReport {
    pub axis: Axis,
    pub stop: AxisStop,
    pub recorded: usize,
}

impl From<&AxisPass> for AxisReport {
    fn from(pass: &AxisPass) -> Self {
        AxisReport {
            axis: pass.axis,
            stop: pass.stop,
            recorded: pass.events.len(),
        }
    }
}

/// Result of casting one ray through the grid
#[derive(Clone, Debug, PartialEq)]
pub struct Traversal {
    /// Crossings ordered by ascending time
    pub impacts: Vec<ImpactEvent>,
    /// Tile containing the ray origin, if the origin is inside the grid
    pub origin_tile: Option<IVec2>,
    pub outcome: Outcome,
    /// One report per axis pass that ran
    pub axes: Vec<AxisReport>,
    /// Impacts whose tile lies outside the grid
    pub anomalies: Vec<TileAnomaly>,
}

impl Traversal {
    fn aborted(origin_tile: Option<IVec2>, outcome: Outcome, axes: Vec<AxisReport>) -> Self {
        Traversal {
            impacts: Vec::new(),
            origin_tile,
            outcome,
            axes,
            anomalies: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.impacts.is_empty()
    }

    /// True when any axis hit the step cap
    pub fn is_truncated(&self) -> bool {
        self.axes.iter().any(|report| report.stop == AxisStop::StepCap)
    }

    /// Check if the impact at `index` was flagged as a tile anomaly
    pub fn is_anomalous(&self, index: usize) -> bool {
        self.anomalies.iter().any(|anomaly| anomaly.index == index)
    }

    /// Grid tiles along the ray, origin tile first
    pub fn visited_tiles(&self, grid: &Grid) -> Vec<IVec2> {
        visited_tiles(grid, self.origin_tile, &self.impacts)
    }
}

/// Cast `ray` through `grid` with default options
pub fn traverse(grid: &Grid, ray: &Ray) -> Traversal {
    traverse_with(grid, ray, &TraversalOptions::default())
}

/// Cast `ray` through `grid`, returning every grid line crossing in time order
pub fn traverse_with(grid: &Grid, ray: &Ray, options: &TraversalOptions) -> Traversal {
    let Some(origin_tile) = grid.tile_containing(ray.origin) else {
        log::trace!("ray origin {} outside grid", ray.origin);
        return Traversal::aborted(None, Outcome::OriginOutsideGrid, Vec::new());
    };

    let mut passes = Vec::with_capacity(Axis::ALL.len());
    for axis in Axis::ALL {
        match step_axis(grid, ray, origin_tile, axis, options.max_steps_per_axis) {
            Ok(pass) => passes.push(pass),
            Err(ImmediateExit { axis }) => {
                let axes = passes.iter().map(AxisReport::from).collect();
                return Traversal::aborted(
                    Some(origin_tile),
                    Outcome::ImmediateExit { axis },
                    axes,
                );
            }
        }
    }

    let axes: Vec<AxisReport> = passes.iter().map(AxisReport::from).collect();
    let mut impacts = merge_passes(passes);
    if options.corner_policy == CornerPolicy::Collapse {
        impacts = collapse_corners(impacts);
    }

    let anomalies = find_anomalies(grid, &impacts);
    if !anomalies.is_empty() {
        log::debug!(
            "{} of {} impacts enter tiles outside the grid: {:?}",
            anomalies.len(),
            impacts.len(),
            anomalies
        );
    }

    Traversal {
        impacts,
        origin_tile: Some(origin_tile),
        outcome: Outcome::Completed,
        axes,
        anomalies,
    }
}

/// Concatenate axis passes and order the crossings by time
///
/// The sort is stable, so equal times keep pass order (x before y).
pub fn merge_passes(passes: Vec<AxisPass>) -> Vec<ImpactEvent> {
    let mut impacts: Vec<ImpactEvent> = passes.into_iter().flat_map(|pass| pass.events).collect();
    impacts.sort_by(|left, right| {
        left.time
            .partial_cmp(&right.time)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    impacts
}

/// Merge simultaneous x and y crossings of the same grid corner
///
/// The merged event keeps the earlier entry's time and point and enters the
/// diagonal tile: column from the x crossing, row from the y crossing.
pub fn collapse_corners(impacts: Vec<ImpactEvent>) -> Vec<ImpactEvent> {
    let mut collapsed: Vec<ImpactEvent> = Vec::with_capacity(impacts.len());
    let mut last_merged = false;

    for impact in impacts {
        if let Some(last) = collapsed.last_mut() {
            let same_corner = !last_merged
                && last.axis != impact.axis
                && (last.time - impact.time).abs() <= CORNER_TIME_EPSILON
                && last.point.distance(impact.point) <= CORNER_POINT_EPSILON;
            if same_corner {
                let (x_crossing, y_crossing) = match last.axis {
                    Axis::X => (*last, impact),
                    Axis::Y => (impact, *last),
                };
                last.tile = IVec2::new(x_crossing.tile.x, y_crossing.tile.y);
                last_merged = true;
                continue;
            }
        }
        collapsed.push(impact);
        last_merged = false;
    }

    collapsed
}

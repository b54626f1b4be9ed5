use glam::{IVec2, Vec2};

use crate::grid::{Axis, Grid};
use crate::ray::Ray;
use crate::raycast::ImpactEvent;

/// Default cap on the number of crossings recorded per axis
pub const DEFAULT_MAX_STEPS_PER_AXIS: usize = 256;

/// Why an axis pass stopped producing crossings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisStop {
    /// The ray has no component along this axis
    Parallel,
    /// The ray ends before reaching the first grid line
    BeyondRay,
    /// The next crossing lies outside the grid
    LeftGrid,
    /// The next crossing lies past the end of the ray
    RayExhausted,
    /// The per-axis step cap was reached; the pass is truncated
    StepCap,
}

/// Crossings of the grid lines perpendicular to one axis, in ray order
#[derive(Clone, Debug)]
pub struct AxisPass {
    pub axis: Axis,
    pub events: Vec<ImpactEvent>,
    pub stop: AxisStop,
}

impl AxisPass {
    fn empty(axis: Axis, stop: AxisStop) -> Self {
        AxisPass {
            axis,
            events: Vec::new(),
            stop,
        }
    }
}

/// The first crossing of an axis already lies outside the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImmediateExit {
    pub axis: Axis,
}

/// Step along the grid lines perpendicular to `axis`
///
/// `start_tile` is the tile containing the ray origin. The first crossing is
/// found from the edge of that tile facing the ray direction; every later
/// crossing is `first + step * k`, so rounding error does not grow with the
/// number of steps. Each crossing's coordinate on `axis` is taken straight
/// from the grid line it lies on, and its time is the fraction of the ray's
/// extent along `axis`, which equals the fraction of its length.
///
/// Returns [`ImmediateExit`] when the first crossing is out of grid bounds;
/// the caller abandons the whole traversal in that case.
pub fn step_axis(
    grid: &Grid,
    ray: &Ray,
    start_tile: IVec2,
    axis: Axis,
    max_steps: usize,
) -> Result<AxisPass, ImmediateExit> {
    let a = axis.index();
    let b = axis.other().index();
    let direction = ray.direction();
    let dir = direction[a];

    if dir == 0 {
        return Ok(AxisPass::empty(axis, AxisStop::Parallel));
    }

    // Positive rays leave through the far edge of the start tile, negative
    // rays through its own edge
    let first_line = if dir > 0 {
        start_tile[a] + 1
    } else {
        start_tile[a]
    };
    let first_edge = grid.line_coordinate(axis, first_line);
    let t0 = (first_edge - ray.origin[a]) / ray.vector[a];

    if t0 >= 1.0 {
        return Ok(AxisPass::empty(axis, AxisStop::BeyondRay));
    }

    let mut first_point = ray.point_at(t0);
    first_point[a] = first_edge;

    if !grid.contains(first_point) {
        log::trace!(
            "{:?} pass: first crossing {} outside grid, abandoning raycast",
            axis,
            first_point
        );
        return Err(ImmediateExit { axis });
    }

    if max_steps == 0 {
        return Ok(AxisPass::empty(axis, AxisStop::StepCap));
    }

    let mut events = vec![ImpactEvent {
        // Origin on the crossed line gives -0.0
        time: if t0 > 0.0 { t0 } else { 0.0 },
        point: first_point,
        tile: entered_tile(grid, axis, dir, first_line, first_point),
        axis,
    }];

    // One tile along the primary axis moves the ray by the slope times that
    // tile size along the secondary axis
    let slope = (ray.vector[b] / ray.vector[a]).abs();
    let mut step = Vec2::ZERO;
    step[a] = grid.tile_size()[a] * dir as f32;
    step[b] = grid.tile_size()[a] * slope * direction[b] as f32;

    let mut k: i32 = 1;
    let stop = loop {
        if events.len() >= max_steps {
            log::debug!(
                "{:?} pass: step cap of {} reached, truncating",
                axis,
                max_steps
            );
            break AxisStop::StepCap;
        }

        let line = first_line + dir * k;
        let mut point = first_point + step * k as f32;
        point[a] = grid.line_coordinate(axis, line);

        if !grid.contains(point) {
            break AxisStop::LeftGrid;
        }

        // Parametric along the primary axis; `ray.length()` can overflow
        let time = (point[a] - ray.origin[a]) / ray.vector[a];
        if time > 1.0 {
            break AxisStop::RayExhausted;
        }

        events.push(ImpactEvent {
            time,
            point,
            tile: entered_tile(grid, axis, dir, line, point),
            axis,
        });

        k += 1;
    };

    log::trace!(
        "{:?} pass: {} crossings, stopped by {:?}",
        axis,
        events.len(),
        stop
    );

    Ok(AxisPass { axis, events, stop })
}

/// Tile on the far side of grid line `line` for a ray moving `dir` along `axis`
///
/// The secondary coordinate is floored from the point; the primary one comes
/// from the line index, shifted down by one for negative directions since
/// the ray then enters the tile below the line.
fn entered_tile(grid: &Grid, axis: Axis, dir: i32, line: i32, point: Vec2) -> IVec2 {
    let mut tile = grid.tile_of(point);
    tile[axis.index()] = if dir < 0 { line - 1 } else { line };
    tile
}

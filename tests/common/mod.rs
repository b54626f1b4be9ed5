#![allow(dead_code)]

use glam::{IVec2, Vec2};
use tile_raycast::{Axis, CornerPolicy, Grid, ImpactEvent, Ray, Traversal};

/// The 800x600 grid of 20px tiles the visualizer opens with
pub fn screen_grid() -> Grid {
    Grid::new(Vec2::new(20.0, 20.0), Vec2::ZERO, IVec2::new(40, 30)).unwrap()
}

pub fn ray(origin: (f32, f32), vector: (f32, f32)) -> Ray {
    Ray::new(Vec2::new(origin.0, origin.1), Vec2::new(vector.0, vector.1))
}

/// Tile an impact should report: floored from its point, except along the
/// crossed axis where the line index is shifted for negative directions
pub fn reconstruct_tile(grid: &Grid, ray: &Ray, impact: &ImpactEvent) -> IVec2 {
    let a = impact.axis.index();
    let mut tile = grid.tile_of(impact.point);
    let line = ((impact.point[a] - grid.origin()[a]) / grid.tile_size()[a]).round() as i32;
    tile[a] = if ray.direction()[a] < 0 { line - 1 } else { line };
    tile
}

/// Check the invariants every traversal must satisfy
pub fn assert_invariants(grid: &Grid, ray: &Ray, traversal: &Traversal, policy: CornerPolicy) {
    let context = format!("ray {:?}", ray);

    for pair in traversal.impacts.windows(2) {
        assert!(
            pair[0].time <= pair[1].time,
            "{}: times not ascending: {} then {}",
            context,
            pair[0].time,
            pair[1].time
        );
    }

    for (i, impact) in traversal.impacts.iter().enumerate() {
        assert!(
            (0.0..=1.0).contains(&impact.time),
            "{}: impact {} time {} outside [0, 1]",
            context,
            i,
            impact.time
        );
        assert!(
            grid.contains(impact.point),
            "{}: impact {} point {} outside grid",
            context,
            i,
            impact.point
        );
        assert_eq!(
            traversal.is_anomalous(i),
            !grid.contains_tile(impact.tile),
            "{}: impact {} anomaly flag does not match tile {}",
            context,
            i,
            impact.tile
        );
        if policy == CornerPolicy::KeepBoth {
            assert_eq!(
                impact.tile,
                reconstruct_tile(grid, ray, impact),
                "{}: impact {} tile inconsistent with point {}",
                context,
                i,
                impact.point
            );
        }
        if ray.direction()[impact.axis.index()] == 0 {
            panic!("{}: impact {} on an axis the ray is parallel to", context, i);
        }
    }
}

/// Rays fanning out from a few origins at many angles and lengths
pub fn fan_of_rays(grid: &Grid) -> Vec<Ray> {
    let bounds = grid.bounds();
    let size = bounds.size();
    let origins = [
        bounds.min + size * Vec2::new(0.5, 0.5),
        bounds.min + size * Vec2::new(0.013, 0.021),
        bounds.min + size * Vec2::new(0.97, 0.9),
        bounds.min + size * Vec2::new(0.31, 0.77),
        bounds.min + grid.tile_size() * Vec2::new(3.0, 2.0),
    ];
    let lengths = [0.0, 7.5, 55.0, 240.0, 1500.0];

    let mut rays = Vec::new();
    for origin in origins {
        for step in 0..48 {
            let angle = (step as f32) * std::f32::consts::TAU / 48.0 + 0.01;
            for length in lengths {
                let vector = Vec2::new(angle.cos(), angle.sin()) * length;
                rays.push(Ray::new(origin, vector));
            }
        }
        // Exactly axis-aligned rays
        for vector in [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y] {
            rays.push(Ray::new(origin, vector * 333.0));
        }
    }
    rays
}

/// Mirror a ray left-right across the grid's vertical center line
pub fn mirror_x(grid: &Grid, ray: &Ray) -> Ray {
    let bounds = grid.bounds();
    Ray::new(
        Vec2::new(bounds.min.x + bounds.max.x - ray.origin.x, ray.origin.y),
        Vec2::new(-ray.vector.x, ray.vector.y),
    )
}

/// Mirror a ray top-bottom across the grid's horizontal center line
pub fn mirror_y(grid: &Grid, ray: &Ray) -> Ray {
    let bounds = grid.bounds();
    Ray::new(
        Vec2::new(ray.origin.x, bounds.min.y + bounds.max.y - ray.origin.y),
        Vec2::new(ray.vector.x, -ray.vector.y),
    )
}

pub fn mirror_tile(grid: &Grid, tile: IVec2, axis: Axis) -> IVec2 {
    let mut mirrored = tile;
    let a = axis.index();
    mirrored[a] = grid.tile_count()[a] - 1 - tile[a];
    mirrored
}

mod common;

use approx::assert_relative_eq;
use common::{assert_invariants, fan_of_rays, mirror_tile, mirror_x, mirror_y, ray, screen_grid};
use glam::{IVec2, Vec2};
use tile_raycast::{traverse, traverse_with, Axis, CornerPolicy, Grid, ImpactEvent, Ray, TraversalOptions};

fn test_grids() -> Vec<Grid> {
    vec![
        screen_grid(),
        Grid::new(Vec2::new(30.0, 10.0), Vec2::ZERO, IVec2::new(10, 25)).unwrap(),
        Grid::new(Vec2::new(7.5, 12.25), Vec2::new(-40.0, 13.0), IVec2::new(17, 9)).unwrap(),
        Grid::new(Vec2::new(50.0, 50.0), Vec2::new(200.0, -300.0), IVec2::new(1, 1)).unwrap(),
    ]
}

#[test]
fn invariants_hold_for_fans_of_rays() {
    for grid in test_grids() {
        for ray in fan_of_rays(&grid) {
            let traversal = traverse(&grid, &ray);
            assert_invariants(&grid, &ray, &traversal, CornerPolicy::KeepBoth);

            let options = TraversalOptions {
                corner_policy: CornerPolicy::Collapse,
                ..TraversalOptions::default()
            };
            let collapsed = traverse_with(&grid, &ray, &options);
            assert_invariants(&grid, &ray, &collapsed, CornerPolicy::Collapse);
            assert!(collapsed.impacts.len() <= traversal.impacts.len());
        }
    }
}

#[test]
fn parallel_axis_never_produces_events() {
    let grid = screen_grid();
    for origin in [(10.0, 10.0), (401.0, 299.0), (795.0, 595.0)] {
        for length in [5.0, 120.0, 900.0] {
            let vertical = traverse(&grid, &ray(origin, (0.0, length)));
            assert!(vertical.impacts.iter().all(|impact| impact.axis == Axis::Y));

            let horizontal = traverse(&grid, &ray(origin, (-length, 0.0)));
            assert!(horizontal.impacts.iter().all(|impact| impact.axis == Axis::X));
        }
    }
}

#[test]
fn zero_vector_is_always_empty() {
    for grid in test_grids() {
        let center = grid.bounds().min + grid.world_size() * 0.5;
        let traversal = traverse(&grid, &Ray::new(center, Vec2::ZERO));
        assert!(traversal.is_empty());
        assert!(traversal.origin_tile.is_some());
    }
}

#[test]
fn outside_origins_are_always_empty() {
    let grid = screen_grid();
    let outside = [(-5.0, -5.0), (-0.01, 300.0), (400.0, 600.0), (900.0, 10.0), (400.0, -1.0)];
    for origin in outside {
        for vector in [(100.0, 0.0), (0.0, 100.0), (-50.0, 75.0), (1000.0, 1000.0)] {
            assert!(traverse(&grid, &ray(origin, vector)).is_empty());
        }
    }
}

fn on_axis(impacts: &[ImpactEvent], axis: Axis) -> Vec<ImpactEvent> {
    impacts.iter().copied().filter(|impact| impact.axis == axis).collect()
}

/// Mirrored rays cross the mirrored lines at the same times
fn assert_mirrored(grid: &Grid, original: &Ray, mirrored: &Ray, flip: Axis) {
    let a = traverse(grid, original);
    let b = traverse(grid, mirrored);
    let bounds = grid.bounds();
    let f = flip.index();

    for axis in Axis::ALL {
        let left = on_axis(&a.impacts, axis);
        let right = on_axis(&b.impacts, axis);
        assert_eq!(left.len(), right.len(), "{:?} pass of {:?} vs mirror", axis, original);

        for (l, r) in left.iter().zip(&right) {
            assert_relative_eq!(l.time, r.time, epsilon = 1e-4);
            assert_relative_eq!(l.point[f], bounds.min[f] + bounds.max[f] - r.point[f], epsilon = 1e-2);
            assert_eq!(l.tile, mirror_tile(grid, r.tile, flip), "{:?} vs mirror", original);
        }
    }
}

#[test]
fn mirrored_rays_give_mirrored_crossings() {
    let grid = screen_grid();
    let rays = [
        ray((113.0, 87.0), (250.3, 131.7)),
        ray((402.5, 311.0), (-173.9, 222.2)),
        ray((55.5, 533.3), (311.1, -95.3)),
    ];

    for original in rays {
        assert_mirrored(&grid, &original, &mirror_x(&grid, &original), Axis::X);
        assert_mirrored(&grid, &original, &mirror_y(&grid, &original), Axis::Y);
    }
}

#[test]
fn long_rays_stay_on_the_line() {
    // Stepping is first + step * k, so the last crossing of a long ray is as
    // accurate as the first
    let grid = Grid::new(Vec2::new(1.0, 1.0), Vec2::ZERO, IVec2::new(2000, 2000)).unwrap();
    let ray = ray((0.5, 0.5), (1987.3, 1411.9));
    let options = TraversalOptions {
        max_steps_per_axis: 4000,
        ..TraversalOptions::default()
    };
    let traversal = traverse_with(&grid, &ray, &options);

    assert!(traversal.impacts.len() > 3000);
    assert!(!traversal.is_truncated());
    for impact in &traversal.impacts {
        let expected = ray.point_at(impact.time);
        assert!(
            impact.point.distance(expected) < 0.05,
            "{} drifted from {}",
            impact.point,
            expected
        );
    }
    assert_invariants(&grid, &ray, &traversal, CornerPolicy::KeepBoth);
}

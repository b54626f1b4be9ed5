use glam::{IVec2, Vec2};

use crate::error::{Error, Result};

/// One of the two grid axes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Both axes in stepping order
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Component index into `Vec2`/`IVec2`
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// The perpendicular axis
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// Axis-aligned bounding box, inclusive on all sides
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Check if a point lies inside the box or on its border
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Uniform tile grid anchored at its bottom-left corner
///
/// Immutable once built: tile size is positive and finite on both axes and
/// there is at least one tile per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    tile_size: Vec2,
    origin: Vec2,
    tile_count: IVec2,
    bounds: Aabb,
}

impl Grid {
    /// Create a grid of `tile_count` tiles of `tile_size`, starting at `origin`
    pub fn new(tile_size: Vec2, origin: Vec2, tile_count: IVec2) -> Result<Self> {
        if !(tile_size.x > 0.0 && tile_size.y > 0.0) || !tile_size.is_finite() {
            return Err(Error::InvalidGrid(format!(
                "tile size must be positive and finite, got {tile_size}"
            )));
        }
        if !origin.is_finite() {
            return Err(Error::InvalidGrid(format!(
                "origin must be finite, got {origin}"
            )));
        }
        if tile_count.x < 1 || tile_count.y < 1 {
            return Err(Error::InvalidGrid(format!(
                "tile count must be at least 1 per axis, got {tile_count}"
            )));
        }

        let bounds = Aabb {
            min: origin,
            max: origin + tile_count.as_vec2() * tile_size,
        };

        Ok(Grid {
            tile_size,
            origin,
            tile_count,
            bounds,
        })
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn tile_count(&self) -> IVec2 {
        self.tile_count
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// World-space width and height of the whole grid
    pub fn world_size(&self) -> Vec2 {
        self.bounds.size()
    }

    /// Check if a world point lies within the grid bounds (inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds.contains(point)
    }

    /// Check if a tile index addresses a tile of this grid
    pub fn contains_tile(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.x < self.tile_count.x && tile.y >= 0 && tile.y < self.tile_count.y
    }

    /// Tile index of a world point, without any bounds check
    pub fn tile_of(&self, point: Vec2) -> IVec2 {
        ((point - self.origin) / self.tile_size).floor().as_ivec2()
    }

    /// Tile a ray starting at `point` begins in, or `None` when the point is
    /// not inside the grid.
    ///
    /// Unlike [`Grid::contains`] the far edges are excluded, so the returned
    /// tile is always a valid index.
    pub fn tile_containing(&self, point: Vec2) -> Option<IVec2> {
        let relative = point - self.origin;
        let size = self.world_size();
        let inside = relative.x >= 0.0
            && relative.x < size.x
            && relative.y >= 0.0
            && relative.y < size.y;
        if !inside {
            return None;
        }

        // Division can round up to the tile count right below the far edge
        Some(self.tile_of(point).min(self.tile_count - IVec2::ONE))
    }

    /// World coordinate of the grid line with `index` perpendicular to `axis`
    pub fn line_coordinate(&self, axis: Axis, index: i32) -> f32 {
        let a = axis.index();
        self.origin[a] + index as f32 * self.tile_size[a]
    }

    /// World-space rectangle (bottom-left corner, size) covered by a tile
    pub fn tile_rect(&self, tile: IVec2) -> (Vec2, Vec2) {
        (
            self.origin + tile.as_vec2() * self.tile_size,
            self.tile_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_grid() -> Grid {
        Grid::new(Vec2::new(20.0, 20.0), Vec2::ZERO, IVec2::new(40, 30)).unwrap()
    }

    #[test]
    fn test_bounds_from_tiles() {
        let grid = Grid::new(Vec2::new(10.0, 5.0), Vec2::new(-50.0, 100.0), IVec2::new(4, 3)).unwrap();
        assert_eq!(grid.bounds().min, Vec2::new(-50.0, 100.0));
        assert_eq!(grid.bounds().max, Vec2::new(-10.0, 115.0));
        assert_eq!(grid.world_size(), Vec2::new(40.0, 15.0));
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(Grid::new(Vec2::new(0.0, 20.0), Vec2::ZERO, IVec2::new(4, 4)).is_err());
        assert!(Grid::new(Vec2::new(20.0, -1.0), Vec2::ZERO, IVec2::new(4, 4)).is_err());
        assert!(Grid::new(Vec2::new(20.0, f32::INFINITY), Vec2::ZERO, IVec2::new(4, 4)).is_err());
        assert!(Grid::new(Vec2::new(20.0, 20.0), Vec2::new(f32::NAN, 0.0), IVec2::new(4, 4)).is_err());
        assert!(Grid::new(Vec2::new(20.0, 20.0), Vec2::ZERO, IVec2::new(0, 4)).is_err());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let grid = screen_grid();
        assert!(grid.contains(Vec2::new(0.0, 0.0)));
        assert!(grid.contains(Vec2::new(800.0, 600.0)));
        assert!(!grid.contains(Vec2::new(800.1, 300.0)));
        assert!(!grid.contains(Vec2::new(10.0, -0.1)));
    }

    #[test]
    fn test_tile_containing_excludes_far_edges() {
        let grid = screen_grid();
        assert_eq!(grid.tile_containing(Vec2::new(10.0, 10.0)), Some(IVec2::new(0, 0)));
        assert_eq!(grid.tile_containing(Vec2::new(799.9, 599.9)), Some(IVec2::new(39, 29)));
        assert_eq!(grid.tile_containing(Vec2::new(800.0, 10.0)), None);
        assert_eq!(grid.tile_containing(Vec2::new(-5.0, -5.0)), None);
        assert_eq!(grid.tile_containing(Vec2::new(f32::NAN, 10.0)), None);
    }

    #[test]
    fn test_tile_of_and_lines() {
        let grid = Grid::new(Vec2::new(20.0, 10.0), Vec2::new(100.0, 50.0), IVec2::new(5, 5)).unwrap();
        assert_eq!(grid.tile_of(Vec2::new(145.0, 71.0)), IVec2::new(2, 2));
        assert_eq!(grid.tile_of(Vec2::new(99.0, 50.0)), IVec2::new(-1, 0));
        assert_eq!(grid.line_coordinate(Axis::X, 3), 160.0);
        assert_eq!(grid.line_coordinate(Axis::Y, 3), 80.0);
        assert_eq!(grid.tile_rect(IVec2::new(1, 2)), (Vec2::new(120.0, 70.0), Vec2::new(20.0, 10.0)));
    }

    #[test]
    fn test_contains_tile() {
        let grid = screen_grid();
        assert!(grid.contains_tile(IVec2::new(0, 0)));
        assert!(grid.contains_tile(IVec2::new(39, 29)));
        assert!(!grid.contains_tile(IVec2::new(40, 0)));
        assert!(!grid.contains_tile(IVec2::new(0, -1)));
    }
}

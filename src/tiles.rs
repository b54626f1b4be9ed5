use glam::IVec2;

use crate::grid::Grid;
use crate::raycast::ImpactEvent;

/// An impact whose entered tile is not a tile of the grid
///
/// Happens where a crossing lies on the grid border, e.g. when the ray
/// leaves the grid through its last line or runs exactly along a border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileAnomaly {
    /// Position of the impact in the ordered sequence
    pub index: usize,
    pub tile: IVec2,
}

/// Check every impact's tile against the grid's tile range
pub fn find_anomalies(grid: &Grid, impacts: &[ImpactEvent]) -> Vec<TileAnomaly> {
    impacts
        .iter()
        .enumerate()
        .filter(|(_, impact)| !grid.contains_tile(impact.tile))
        .map(|(index, impact)| TileAnomaly {
            index,
            tile: impact.tile,
        })
        .collect()
}

/// Distinct grid tiles along the ray, starting with the origin tile
///
/// Consecutive repeats (both passes reporting the same tile at a corner)
/// and tiles outside the grid are skipped.
pub fn visited_tiles(grid: &Grid, origin_tile: Option<IVec2>, impacts: &[ImpactEvent]) -> Vec<IVec2> {
    let mut tiles: Vec<IVec2> = Vec::with_capacity(impacts.len() + 1);

    let candidates = origin_tile
        .into_iter()
        .chain(impacts.iter().map(|impact| impact.tile));
    for tile in candidates {
        if !grid.contains_tile(tile) || tiles.last() == Some(&tile) {
            continue;
        }
        tiles.push(tile);
    }

    tiles
}

use std::collections::VecDeque;

use tracing::debug;

use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::point::Point;

/// Mask value of a cell the fill has not reached.
pub const UNVISITED: u8 = 0;
/// Mask value of a cell the fill has reached.
pub const VISITED: u8 = 255;

/// 4-connected neighbours of a padded cell `(x, y)`, in traversal order.
///
/// Only interior cells are expanded, so `x, y >= 1` and nothing underflows.
#[inline]
fn neighbors(x: usize, y: usize) -> [(usize, usize); 4] {
    [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
}

/// Outcome of a flood fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloodFill {
    /// The seed cell does not hold the target value.
    Mismatch,
    /// The seed's 4-connected region: its size and a mask of its cells.
    Filled { count: usize, mask: Grid<u8> },
}

impl FloodFill {
    /// Number of cells in the region, 0 on a mismatch.
    pub fn count(&self) -> usize {
        match self {
            FloodFill::Mismatch => 0,
            FloodFill::Filled { count, .. } => *count,
        }
    }

    pub fn mask(&self) -> Option<&Grid<u8>> {
        match self {
            FloodFill::Mismatch => None,
            FloodFill::Filled { mask, .. } => Some(mask),
        }
    }

    pub fn into_mask(self) -> Option<Grid<u8>> {
        match self {
            FloodFill::Mismatch => None,
            FloodFill::Filled { mask, .. } => Some(mask),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, FloodFill::Filled { .. })
    }
}

/// Flood fill the 4-connected region of cells equal to `target` that
/// contains the seed `(seed_x, seed_y)`.
///
/// Fails only if the seed lies outside the grid.
pub fn label<T>(grid: &Grid<T>, seed_x: i32, seed_y: i32, target: T) -> Result<FloodFill>
where
    T: Copy + PartialEq,
{
    fill(grid, Point::new(seed_x, seed_y), target, |_, _| {})
}

/// Like [`label`], also returning the `(x, y)` cells in the order they were
/// marked, seed first.
pub fn label_traced<T>(
    grid: &Grid<T>,
    seed_x: i32,
    seed_y: i32,
    target: T,
) -> Result<(FloodFill, Vec<(usize, usize)>)>
where
    T: Copy + PartialEq,
{
    let mut order = Vec::new();
    let result = fill(grid, Point::new(seed_x, seed_y), target, |x, y| order.push((x, y)))?;
    Ok((result, order))
}

fn fill<T, V>(grid: &Grid<T>, seed: Point, target: T, mut visit: V) -> Result<FloodFill>
where
    T: Copy + PartialEq,
    V: FnMut(usize, usize),
{
    if !grid.contains(seed.x, seed.y) {
        return Err(GridError::SeedOutOfBounds {
            x: seed.x as i64,
            y: seed.y as i64,
            width: grid.width(),
            height: grid.height(),
        });
    }
    if grid.get_point(seed)? != target {
        debug!(x = seed.x, y = seed.y, "seed does not hold target value");
        return Ok(FloodFill::Mismatch);
    }

    // `None` borders the copy, so a neighbour lookup past the edge never
    // matches, whatever the target value.
    let padded = grid.padded_map(1, None, Some)?;
    let mut mask = Grid::filled(grid.width(), grid.height(), UNVISITED)?;
    let (sx, sy) = (seed.x as usize, seed.y as usize);
    mask.set_trusted(sx, sy, VISITED);
    visit(sx, sy);
    let mut count = 1usize;

    // Queue entries are padded coordinates: cell `(x, y)` sits at `(x + 1, y + 1)`.
    let mut queue = VecDeque::new();
    queue.push_back((sx + 1, sy + 1));

    while let Some((cx, cy)) = queue.pop_front() {
        let v = padded.get_trusted(cx, cy);
        for (nx, ny) in neighbors(cx, cy) {
            if padded.get_trusted(nx, ny) != v {
                continue;
            }
            // Only interior cells match, so the shifted cell is inside the mask.
            let (mx, my) = (nx - 1, ny - 1);
            if mask.get_trusted(mx, my) == UNVISITED {
                mask.set_trusted(mx, my, VISITED);
                visit(mx, my);
                count += 1;
                queue.push_back((nx, ny));
            }
        }
    }

    debug!(x = seed.x, y = seed.y, count, "flood fill done");
    Ok(FloodFill::Filled { count, mask })
}

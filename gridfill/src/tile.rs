/// Default tile edge, sized so one tile's working set stays cache-resident.
pub const DEFAULT_TILE_EDGE: usize = 512;

/// Half-open rectangle `[x0, x1) × [y0, y1)` of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Tile {
    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Partition a `width × height` grid into tiles of edge `edge`, row-major.
///
/// Tiles in the last column and row are clipped to the grid. Returns no
/// tiles for an empty grid or a zero edge.
pub fn partition(width: usize, height: usize, edge: usize) -> Vec<Tile> {
    if width == 0 || height == 0 || edge == 0 {
        return Vec::new();
    }
    let mut tiles = Vec::with_capacity(width.div_ceil(edge) * height.div_ceil(edge));
    for y0 in (0..height).step_by(edge) {
        for x0 in (0..width).step_by(edge) {
            tiles.push(Tile {
                x0,
                y0,
                x1: x0.saturating_add(edge).min(width),
                y1: y0.saturating_add(edge).min(height),
            });
        }
    }
    tiles
}

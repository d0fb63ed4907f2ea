use crate::error::{GridError, Result};
use crate::point::Point;

/// Dense row-major 2D buffer of cells.
///
/// The buffer always holds exactly `width * height` cells. All public
/// accessors are bounds-checked and report [`GridError::IndexOutOfRange`]
/// instead of touching memory outside the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    buf: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    /// Create a grid with every cell set to `T::default()`.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::filled(width, height, T::default())
    }

    /// Copy the rectangle `[x0, x0 + w) × [y0, y0 + h)` into a new grid
    /// surrounded by a `pad`-wide ring of `T::default()`.
    ///
    /// The all-zero rectangle `(0, 0, 0, 0)` selects the whole grid.
    pub fn copy(&self, x0: i32, y0: i32, w: usize, h: usize, pad: usize) -> Result<Grid<T>> {
        self.copy_with_border(x0, y0, w, h, pad, T::default())
    }
}

impl<T: Copy> Grid<T> {
    /// Create a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self> {
        let len = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            buf: vec![value; len],
        })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, buf: Vec<T>) -> Result<Self> {
        let expected = cell_count(width, height)?;
        if buf.len() != expected {
            return Err(GridError::BufferLength {
                expected,
                actual: buf.len(),
            });
        }
        Ok(Self { width, height, buf })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<T> {
        self.buf
    }

    /// Iterate over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // An empty grid has an empty buffer, so the clamped chunk size never yields.
        self.buf.chunks_exact(self.width.max(1))
    }

    /// Whether `(x, y)` addresses a cell of this grid.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index_of(&self, x: i32, y: i32) -> Result<usize> {
        if !self.contains(x, y) {
            return Err(GridError::IndexOutOfRange {
                x: x as i64,
                y: y as i64,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Result<T> {
        self.index_of(x, y).map(|i| self.buf[i])
    }

    pub fn at(&self, x: i32, y: i32) -> Result<&T> {
        let i = self.index_of(x, y)?;
        Ok(&self.buf[i])
    }

    pub fn at_mut(&mut self, x: i32, y: i32) -> Result<&mut T> {
        let i = self.index_of(x, y)?;
        Ok(&mut self.buf[i])
    }

    pub fn set(&mut self, x: i32, y: i32, value: T) -> Result<()> {
        *self.at_mut(x, y)? = value;
        Ok(())
    }

    pub fn get_point(&self, p: Point) -> Result<T> {
        self.get(p.x, p.y)
    }

    pub fn set_point(&mut self, p: Point, value: T) -> Result<()> {
        self.set(p.x, p.y, value)
    }

    /// Read a cell whose coordinates the caller has already validated.
    ///
    /// Out-of-range coordinates panic on the slice index.
    #[inline]
    pub(crate) fn get_trusted(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width && y < self.height);
        self.buf[y * self.width + x]
    }

    /// Write a cell whose coordinates the caller has already validated.
    #[inline]
    pub(crate) fn set_trusted(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(x < self.width && y < self.height);
        self.buf[y * self.width + x] = value;
    }

    /// Borrow the rectangle `[x0, x0 + w) × [y0, y0 + h)` as a read-only view.
    pub fn view(&self, x0: i32, y0: i32, w: usize, h: usize) -> Result<GridView<'_, T>> {
        let contained = x0 >= 0
            && y0 >= 0
            && (x0 as usize).checked_add(w).is_some_and(|x1| x1 <= self.width)
            && (y0 as usize).checked_add(h).is_some_and(|y1| y1 <= self.height);
        if !contained {
            return Err(GridError::InvalidRegion {
                x: x0 as i64,
                y: y0 as i64,
                width: w,
                height: h,
                grid_width: self.width,
                grid_height: self.height,
            });
        }
        Ok(GridView {
            grid: self,
            x0: x0 as usize,
            y0: y0 as usize,
            width: w,
            height: h,
        })
    }

    /// Like [`Grid::copy`], with an explicit value for the border ring.
    pub fn copy_with_border(
        &self,
        x0: i32,
        y0: i32,
        w: usize,
        h: usize,
        pad: usize,
        border: T,
    ) -> Result<Grid<T>> {
        let view = if (x0, y0, w, h) == (0, 0, 0, 0) {
            self.view(0, 0, self.width, self.height)?
        } else {
            self.view(x0, y0, w, h)?
        };
        view.padded_map(pad, border, |v| v)
    }

    /// Copy the whole grid into a padded grid of another cell type.
    pub(crate) fn padded_map<U: Copy>(
        &self,
        pad: usize,
        border: U,
        f: impl Fn(T) -> U,
    ) -> Result<Grid<U>> {
        GridView {
            grid: self,
            x0: 0,
            y0: 0,
            width: self.width,
            height: self.height,
        }
        .padded_map(pad, border, f)
    }
}

impl<T: Copy + PartialEq> Grid<T> {
    /// Number of cells equal to `value`.
    pub fn count(&self, value: T) -> usize {
        self.buf.iter().filter(|&&v| v == value).count()
    }
}

/// Borrowed read-only rectangle of a [`Grid`].
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a, T> {
    grid: &'a Grid<T>,
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
}

impl<'a, T: Copy> GridView<'a, T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read a cell in view coordinates.
    pub fn get(&self, x: i32, y: i32) -> Result<T> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(GridError::IndexOutOfRange {
                x: x as i64,
                y: y as i64,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self
            .grid
            .get_trusted(self.x0 + x as usize, self.y0 + y as usize))
    }

    /// Iterate over the rows of the view, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> {
        let (grid, x0, width) = (self.grid, self.x0, self.width);
        (self.y0..self.y0 + self.height).map(move |y| {
            let start = y * grid.width + x0;
            &grid.buf[start..start + width]
        })
    }

    /// Embed the view at `(pad, pad)` inside a grid whose border ring holds
    /// `border`, mapping each cell through `f`.
    ///
    /// Fails with [`GridError::InvalidRegion`] if the padded size overflows.
    pub fn padded_map<U: Copy>(
        &self,
        pad: usize,
        border: U,
        f: impl Fn(T) -> U,
    ) -> Result<Grid<U>> {
        let padded = |len: usize| pad.checked_mul(2).and_then(|p| p.checked_add(len));
        let (out_w, out_h) = match (padded(self.width), padded(self.height)) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(self.region_error()),
        };
        let len = out_w.checked_mul(out_h).ok_or_else(|| self.region_error())?;
        let mut buf = vec![border; len];
        for (y, row) in self.rows().enumerate() {
            let start = (y + pad) * out_w + pad;
            for (dst, &src) in buf[start..start + self.width].iter_mut().zip(row) {
                *dst = f(src);
            }
        }
        Ok(Grid {
            width: out_w,
            height: out_h,
            buf,
        })
    }

    fn region_error(&self) -> GridError {
        GridError::InvalidRegion {
            x: self.x0 as i64,
            y: self.y0 as i64,
            width: self.width,
            height: self.height,
            grid_width: self.grid.width,
            grid_height: self.grid.height,
        }
    }
}

fn cell_count(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .ok_or(GridError::SizeOverflow { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: usize, h: usize) -> Grid<u8> {
        let buf = (0..w * h).map(|i| (i % 251) as u8 + 1).collect();
        Grid::from_vec(w, h, buf).unwrap()
    }

    #[test]
    fn new_creates_zeroed_grid() {
        let g: Grid<u8> = Grid::new(10, 8).unwrap();
        assert_eq!(g.width(), 10);
        assert_eq!(g.height(), 8);
        assert_eq!(g.as_slice().len(), 80);
        assert!(g.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = Grid::from_vec(3, 3, vec![0u8; 8]).unwrap_err();
        assert!(matches!(
            err,
            GridError::BufferLength {
                expected: 9,
                actual: 8
            }
        ));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let err = Grid::<u8>::from_vec(1 << 63, 2, Vec::new()).unwrap_err();
        assert!(matches!(err, GridError::SizeOverflow { height: 2, .. }));
        assert!(matches!(
            Grid::filled(usize::MAX, 2, 0u8),
            Err(GridError::SizeOverflow { .. })
        ));
        assert!(matches!(
            Grid::<u8>::new(2, usize::MAX),
            Err(GridError::SizeOverflow { .. })
        ));
    }

    #[test]
    fn copy_with_huge_pad_is_rejected() {
        let g = Grid::filled(1, 1, 7u8).unwrap();
        for pad in [usize::MAX / 2, usize::MAX, usize::MAX / 4] {
            assert!(
                matches!(g.copy(0, 0, 1, 1, pad), Err(GridError::InvalidRegion { .. })),
                "pad {pad}"
            );
        }
        assert_eq!(g.copy(0, 0, 1, 1, 2).unwrap().width(), 5);
    }

    #[test]
    fn get_set_cell() {
        let mut g: Grid<u8> = Grid::new(4, 4).unwrap();
        g.set(2, 3, 128).unwrap();
        assert_eq!(g.get(2, 3).unwrap(), 128);
        assert_eq!(g.get(0, 0).unwrap(), 0);
        *g.at_mut(1, 1).unwrap() = 7;
        assert_eq!(*g.at(1, 1).unwrap(), 7);
        assert_eq!(g.get_point(Point::new(1, 1)).unwrap(), 7);
    }

    #[test]
    fn out_of_range_access_is_reported() {
        let mut g: Grid<u8> = Grid::new(4, 3).unwrap();
        for (x, y) in [(4, 0), (0, 3), (-1, 0), (0, -1), (100, 100)] {
            assert!(
                matches!(g.get(x, y), Err(GridError::IndexOutOfRange { .. })),
                "({x}, {y})"
            );
            assert!(g.set(x, y, 1).is_err());
        }
        assert!(g.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn rows_are_row_major() {
        let g = Grid::from_vec(3, 2, vec![1u8, 2, 3, 4, 5, 6]).unwrap();
        let rows: Vec<&[u8]> = g.rows().collect();
        assert_eq!(rows, vec![&[1, 2, 3][..], &[4, 5, 6][..]]);
        let empty: Grid<u8> = Grid::new(0, 0).unwrap();
        assert_eq!(empty.rows().count(), 0);
    }

    #[test]
    fn view_is_bounds_checked() {
        let g = ramp(6, 5);
        let v = g.view(2, 1, 3, 2).unwrap();
        assert_eq!(v.get(0, 0).unwrap(), g.get(2, 1).unwrap());
        assert_eq!(v.get(2, 1).unwrap(), g.get(4, 2).unwrap());
        assert!(matches!(
            v.get(3, 0),
            Err(GridError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            g.view(4, 0, 3, 1),
            Err(GridError::InvalidRegion { .. })
        ));
        assert!(matches!(
            g.view(-1, 0, 1, 1),
            Err(GridError::InvalidRegion { .. })
        ));
    }

    #[test]
    fn copy_preserves_interior_and_zeroes_border() {
        let g = ramp(7, 6);
        for pad in 0..4 {
            let (x0, y0, w, h) = (1, 2, 4, 3);
            let c = g.copy(x0, y0, w, h, pad).unwrap();
            assert_eq!(c.width(), w + 2 * pad);
            assert_eq!(c.height(), h + 2 * pad);
            for y in 0..c.height() {
                for x in 0..c.width() {
                    let inside = x >= pad && x < pad + w && y >= pad && y < pad + h;
                    let v = c.get(x as i32, y as i32).unwrap();
                    if inside {
                        let sx = x0 + (x - pad) as i32;
                        let sy = y0 + (y - pad) as i32;
                        assert_eq!(v, g.get(sx, sy).unwrap(), "pad {pad} ({x}, {y})");
                    } else {
                        assert_eq!(v, 0, "pad {pad} border ({x}, {y})");
                    }
                }
            }
        }
    }

    #[test]
    fn copy_with_border_uses_given_value() {
        let g = Grid::filled(2, 2, 5u8).unwrap();
        let c = g.copy_with_border(0, 0, 2, 2, 1, 9).unwrap();
        #[rustfmt::skip]
        let expected = [
            9, 9, 9, 9,
            9, 5, 5, 9,
            9, 5, 5, 9,
            9, 9, 9, 9,
        ];
        assert_eq!(c.as_slice(), &expected);
    }

    #[test]
    fn copy_zero_rect_means_whole_grid() {
        let g = ramp(5, 4);
        let whole = g.copy(0, 0, 0, 0, 1).unwrap();
        let explicit = g.copy(0, 0, 5, 4, 1).unwrap();
        assert_eq!(whole, explicit);
    }

    #[test]
    fn copy_rejects_uncontained_rect() {
        let g = ramp(5, 4);
        assert!(matches!(
            g.copy(3, 0, 3, 1, 1),
            Err(GridError::InvalidRegion { .. })
        ));
        assert!(matches!(
            g.copy(0, 2, 1, 3, 0),
            Err(GridError::InvalidRegion { .. })
        ));
        assert!(matches!(
            g.copy(-1, 0, 1, 1, 0),
            Err(GridError::InvalidRegion { .. })
        ));
    }

    #[test]
    fn copy_empty_non_sentinel_rect_is_border_only() {
        let g = ramp(5, 4);
        let c = g.copy(2, 2, 0, 0, 1).unwrap();
        assert_eq!((c.width(), c.height()), (2, 2));
        assert!(c.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn padded_map_lifts_cells() {
        let g = Grid::from_vec(2, 1, vec![0u8, 255]).unwrap();
        let p = g.padded_map(1, None, Some).unwrap();
        assert_eq!(p.width(), 4);
        assert_eq!(p.height(), 3);
        assert_eq!(p.get(1, 1).unwrap(), Some(0));
        assert_eq!(p.get(2, 1).unwrap(), Some(255));
        assert_eq!(p.get(0, 1).unwrap(), None);
        assert_eq!(p.get(3, 2).unwrap(), None);
    }

    #[test]
    fn count_matches_value() {
        let g = Grid::from_vec(2, 2, vec![1u8, 0, 1, 1]).unwrap();
        assert_eq!(g.count(1), 3);
        assert_eq!(g.count(0), 1);
    }
}

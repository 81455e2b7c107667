//! Sliding kernel window
//!
//! [`Window`] caches the `(2r+1)²` grid values around the current cell. At
//! the start of a row it reads the whole window; each step along the row
//! reads only the incoming column, so a sweep costs O(k) grid reads per cell
//! instead of O(k²). Columns live in a ring: the slot of the outgoing column
//! receives the incoming one.

use gwstats_core::{Error, Grid, Result};

/// Read access to the values of a kernel window by offset (p, q)
pub(crate) trait WindowValues {
    /// Value at offset (p, q), `None` for no-data or outside the grid
    fn valid(&self, p: usize, q: usize) -> Option<f64>;
}

/// Offsets (p, q) of a window that fall inside the grid.
///
/// Large kernels on small grids are mostly padding; sums only visit the
/// offsets that can hold data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WindowSpan {
    /// Half-width of the window; (radius, radius) is the centre offset
    pub radius: usize,
    rows: (usize, usize),
    cols: (usize, usize),
}

impl WindowSpan {
    /// Span of the window of half-width `radius` on (row, col) of a grid
    /// shaped `(rows, cols)`
    pub fn clipped(radius: usize, row: usize, col: usize, (rows, cols): (usize, usize)) -> Self {
        let axis = |centre: usize, len: usize| {
            let start = radius.saturating_sub(centre);
            let end = (radius + len.saturating_sub(centre)).min(2 * radius + 1);
            (start, end.max(start))
        };
        Self {
            radius,
            rows: axis(row, rows),
            cols: axis(col, cols),
        }
    }

    /// Offsets in row-major order
    pub fn offsets(self) -> impl Iterator<Item = (usize, usize)> {
        let (q0, q1) = self.cols;
        (self.rows.0..self.rows.1).flat_map(move |p| (q0..q1).map(move |q| (p, q)))
    }
}

/// Cached window of grid values centred on a cell
#[derive(Debug, Clone)]
pub struct Window {
    radius: usize,
    size: usize,
    /// Row-major `size * size` values; logical column q is stored in
    /// physical column `(head + q) % size`
    buf: Vec<f64>,
    head: usize,
    nodata: f64,
    row: usize,
    col: usize,
}

impl Window {
    /// Allocate an empty window of half-width `radius`.
    ///
    /// Fails with [`Error::ResourceExhausted`] when the buffer cannot be
    /// allocated; callers fall back to reading the grid directly.
    pub fn try_new(radius: usize, nodata: f64) -> Result<Self> {
        let size = radius
            .checked_mul(2)
            .and_then(|d| d.checked_add(1))
            .ok_or(Error::ResourceExhausted { what: "kernel window", cells: usize::MAX })?;
        let cells = size
            .checked_mul(size)
            .ok_or(Error::ResourceExhausted { what: "kernel window", cells: usize::MAX })?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(cells)
            .map_err(|_| Error::ResourceExhausted { what: "kernel window", cells })?;
        buf.resize(cells, nodata);

        Ok(Self {
            radius,
            size,
            buf,
            head: 0,
            nodata,
            row: 0,
            col: 0,
        })
    }

    /// Allocate a window and fill it for the first cell of `row`
    pub fn init_row<G: Grid + ?Sized>(grid: &G, radius: usize, row: usize) -> Result<Self> {
        let mut window = Self::try_new(radius, grid.nodata())?;
        window.fill(grid, row, 0);
        Ok(window)
    }

    /// Move the window to (row, col).
    ///
    /// Stepping one column right along the same row reads a single column;
    /// any other move (including the start of a row) refills the window.
    pub fn advance<G: Grid + ?Sized>(&mut self, grid: &G, row: usize, col: usize) {
        if col == 0 || row != self.row || col != self.col + 1 {
            self.fill(grid, row, col);
            return;
        }

        let r = self.radius as isize;
        let incoming = (col + self.radius) as isize;
        let top = row as isize - r;
        for p in 0..self.size {
            self.buf[p * self.size + self.head] = grid.cell(top + p as isize, incoming);
        }
        self.head = (self.head + 1) % self.size;
        self.col = col;
    }

    /// Read the whole window centred on (row, col)
    pub fn fill<G: Grid + ?Sized>(&mut self, grid: &G, row: usize, col: usize) {
        let r = self.radius as isize;
        let top = row as isize - r;
        let left = col as isize - r;
        for p in 0..self.size {
            for q in 0..self.size {
                self.buf[p * self.size + q] = grid.cell(top + p as isize, left + q as isize);
            }
        }
        self.head = 0;
        self.row = row;
        self.col = col;
    }

    /// Raw value at offset (p, q); the sentinel where there is no data
    pub fn get(&self, p: usize, q: usize) -> f64 {
        self.buf[p * self.size + (self.head + q) % self.size]
    }

    /// Half-width of the window
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Side length of the window
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell the window is centred on, as (row, col)
    pub fn centre(&self) -> (usize, usize) {
        (self.row, self.col)
    }
}

impl WindowValues for Window {
    fn valid(&self, p: usize, q: usize) -> Option<f64> {
        let v = self.get(p, q);
        if v.is_nan() || v == self.nodata { None } else { Some(v) }
    }
}

/// Uncached window that reads the grid on every access
pub(crate) struct DirectWindow<'a, G: ?Sized> {
    grid: &'a G,
    top: isize,
    left: isize,
}

impl<'a, G: Grid + ?Sized> DirectWindow<'a, G> {
    pub fn new(grid: &'a G, radius: usize, row: usize, col: usize) -> Self {
        Self {
            grid,
            top: row as isize - radius as isize,
            left: col as isize - radius as isize,
        }
    }
}

impl<G: Grid + ?Sized> WindowValues for DirectWindow<'_, G> {
    fn valid(&self, p: usize, q: usize) -> Option<f64> {
        self.grid.valid(self.top + p as isize, self.left + q as isize)
    }
}

/// Window for one row of a sweep: a cached cursor, or direct grid reads
/// when the cursor cannot be allocated.
pub(crate) struct RowWindow<'a, G: ?Sized> {
    grid: &'a G,
    radius: usize,
    row: usize,
    col: usize,
    cache: Option<Window>,
}

impl<'a, G: Grid + ?Sized> RowWindow<'a, G> {
    /// Window at the first cell of `row`
    pub fn start(grid: &'a G, radius: usize, row: usize) -> Self {
        let cache = match Window::init_row(grid, radius, row) {
            Ok(window) => Some(window),
            Err(e) => {
                tracing::warn!("row {row}: {e}; reading windows directly");
                None
            }
        };
        Self { grid, radius, row, col: 0, cache }
    }

    /// Move to column `col` of the row
    pub fn advance(&mut self, col: usize) {
        self.col = col;
        if let Some(window) = &mut self.cache {
            window.advance(self.grid, self.row, col);
        }
    }
}

impl<G: Grid + ?Sized> WindowValues for RowWindow<'_, G> {
    fn valid(&self, p: usize, q: usize) -> Option<f64> {
        match &self.cache {
            Some(window) => window.valid(p, q),
            None => DirectWindow::new(self.grid, self.radius, self.row, self.col).valid(p, q),
        }
    }
}

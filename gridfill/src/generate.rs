#[cfg(feature = "parallel")]
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::tile::{partition, Tile, DEFAULT_TILE_EDGE};

/// Value written to cells whose predicate holds.
pub const ACTIVE: u8 = 255;
/// Value written to cells whose predicate fails.
pub const INACTIVE: u8 = 0;

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneratorConfig {
    /// Edge length of a square work tile.
    pub tile_edge: usize,
    /// Maximum number of tiles evaluated at once. 0 uses all available cores.
    pub workers: usize,
    pub active: u8,
    pub inactive: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tile_edge: DEFAULT_TILE_EDGE,
            workers: 0,
            active: ACTIVE,
            inactive: INACTIVE,
        }
    }
}

impl GeneratorConfig {
    /// Parse a TOML config; missing keys take their default.
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: GeneratorConfig =
            toml::from_str(toml_str).map_err(|e| GridError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_edge == 0 {
            return Err(GridError::InvalidConfig("tile_edge must be positive".into()));
        }
        Ok(())
    }

    /// Worker count with 0 resolved to the available parallelism.
    pub fn resolved_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// Fills grids tile by tile on a bounded worker pool.
pub struct Generator {
    config: GeneratorConfig,
    workers: usize,
    #[cfg(feature = "parallel")]
    pool: Option<ThreadPool>,
}

impl Generator {
    /// Validate `config` and start its worker pool.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let workers = config.resolved_workers();

        #[cfg(feature = "parallel")]
        let pool = if workers > 1 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("gridfill-tile-{i}"))
                    .build()
                    .map_err(|e| GridError::WorkerPool(e.to_string()))?,
            )
        } else {
            None
        };

        Ok(Self {
            config,
            workers,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Number of tiles that may be in flight at once.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Build a `width × height` grid whose cell `(x, y)` is active iff
    /// `predicate(x, y)` holds.
    ///
    /// Returns only after every tile has been written. The result does not
    /// depend on the worker count or tile size.
    pub fn generate<F>(&self, width: i32, height: i32, predicate: F) -> Result<Grid<u8>>
    where
        F: Fn(i32, i32) -> bool + Sync,
    {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        let (w, h) = (width as usize, height as usize);
        let edge = self.config.tile_edge;
        let tiles = partition(w, h, edge);
        debug!(
            width = w,
            height = h,
            tile_edge = edge,
            tiles = tiles.len(),
            workers = self.workers,
            "generating grid"
        );

        let mut buf = vec![self.config.inactive; w * h];
        let jobs = split_tiles(&mut buf, w, edge, &tiles);
        let (active, inactive) = (self.config.active, self.config.inactive);
        let predicate = &predicate;

        #[cfg(feature = "parallel")]
        if let Some(pool) = &self.pool {
            pool.scope_fifo(|s| {
                for job in jobs {
                    s.spawn_fifo(move |_| job.run(predicate, active, inactive));
                }
            });
            return Grid::from_vec(w, h, buf);
        }

        for job in jobs {
            job.run(predicate, active, inactive);
        }
        Grid::from_vec(w, h, buf)
    }
}

/// Build a grid with the default configuration.
pub fn generate<F>(width: i32, height: i32, predicate: F) -> Result<Grid<u8>>
where
    F: Fn(i32, i32) -> bool + Sync,
{
    Generator::new(GeneratorConfig::default())?.generate(width, height, predicate)
}

/// Exclusive write access to the cells of one tile.
struct TileJob<'a> {
    tile: Tile,
    rows: Vec<&'a mut [u8]>,
}

impl TileJob<'_> {
    fn run<F>(self, predicate: &F, active: u8, inactive: u8)
    where
        F: Fn(i32, i32) -> bool,
    {
        let Tile { x0, y0, .. } = self.tile;
        for (dy, row) in self.rows.into_iter().enumerate() {
            let y = (y0 + dy) as i32;
            for (dx, cell) in row.iter_mut().enumerate() {
                *cell = if predicate((x0 + dx) as i32, y) {
                    active
                } else {
                    inactive
                };
            }
        }
        trace!(x0, y0, x1 = self.tile.x1, y1 = self.tile.y1, "tile done");
    }
}

/// Split a row-major buffer into one job per tile of a row-major
/// `partition(width, _, edge)`.
///
/// Every cell ends up in exactly one job, as a disjoint `&mut` borrow.
fn split_tiles<'a>(
    buf: &'a mut [u8],
    width: usize,
    edge: usize,
    tiles: &[Tile],
) -> Vec<TileJob<'a>> {
    let cols = width.div_ceil(edge);
    let bands = buf.chunks_mut(width.saturating_mul(edge));
    let mut jobs = Vec::with_capacity(tiles.len());
    for (band, band_tiles) in bands.zip(tiles.chunks(cols)) {
        let mut band_jobs: Vec<TileJob<'a>> = band_tiles
            .iter()
            .map(|&tile| TileJob {
                tile,
                rows: Vec::with_capacity(tile.height()),
            })
            .collect();
        for row in band.chunks_mut(width) {
            for (job, segment) in band_jobs.iter_mut().zip(row.chunks_mut(edge)) {
                debug_assert_eq!(segment.len(), job.tile.width());
                job.rows.push(segment);
            }
        }
        jobs.append(&mut band_jobs);
    }
    debug_assert_eq!(jobs.len(), tiles.len());
    jobs
}

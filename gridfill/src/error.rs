use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: i64, height: i64 },

    #[error(
        "region {width}x{height} at ({x}, {y}) is not contained in {grid_width}x{grid_height} grid"
    )]
    InvalidRegion {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
        grid_width: usize,
        grid_height: usize,
    },

    #[error("cell ({x}, {y}) is outside {width}x{height} grid")]
    IndexOutOfRange {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("seed ({x}, {y}) is outside {width}x{height} grid")]
    SeedOutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("grid of {width}x{height} cells does not fit in memory")]
    SizeOverflow { width: usize, height: usize },

    #[error("buffer holds {actual} cells, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    #[error("invalid generator config: {0}")]
    InvalidConfig(String),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, GridError>;

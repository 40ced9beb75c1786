/// Rejected configuration. These are caller bugs and are reported before any
/// octree work starts.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid resolution must be positive")]
    ZeroResolution,
    #[error("grid resolution {resolution} exceeds the maximum of {max}")]
    ResolutionTooLarge { resolution: u32, max: u32 },
    #[error("chunk resolution {found} differs from the configured resolution {expected}")]
    ResolutionMismatch { expected: u32, found: u32 },
    #[error("chunk size must be positive and finite, got {size}")]
    InvalidChunkSize { size: f32 },
}

/// Hermite data that does not describe a consistent surface.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum HermiteDataError {
    #[error("expected {expected} material indices, got {found}")]
    MaterialCountMismatch { expected: usize, found: usize },
    #[error("edge arrays of axis {axis} differ in length")]
    EdgeArrayMismatch { axis: usize },
    #[error("edge {index} on axis {axis} starts outside the grid")]
    EdgeOutOfBounds { axis: usize, index: u32 },
    #[error("edge {index} on axis {axis} has zero crossing {t} outside [0, 1]")]
    InvalidZeroCrossing { axis: usize, index: u32, t: f32 },
    #[error("edge {index} on axis {axis} has no material change")]
    NoSignChange { axis: usize, index: u32 },
    #[error("edge {index} on axis {axis} is stored twice")]
    DuplicateEdge { axis: usize, index: u32 },
    #[error("axis {axis} stores {found} edges but the materials change on {expected}")]
    MissingEdges {
        axis: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    HermiteData(#[from] HermiteDataError),
}

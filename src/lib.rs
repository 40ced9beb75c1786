//! Dual Contouring of Hermite Data
//!
//! Turns the Hermite data of a volume chunk (per grid point materials plus
//! per edge surface crossings) into a sparse octree of surface voxels,
//! simplifies that octree by QEF error, and contours it into an indexed
//! triangle mesh.
//!
//! ```text
//! HermiteData -> VoxelBlock::build -> VoxelBlock::simplify -> VoxelBlock::dual_contour
//! ```
//!
//! [`extract_surface`] runs the whole pipeline for one [`Chunk`];
//! [`extract_surfaces`] runs it for many chunks in parallel.
//!
//! # References
//!
//! - Tao Ju, Frank Losasso, Scott Schaefer, Joe Warren ["Dual Contouring of
//!   Hermite Data"](https://www.cs.rice.edu/~jwarren/papers/dualcontour.pdf)
//!
//! # Limitations
//!
//! - chunks are contoured independently; seams between chunks are not stitched
//! - meshes are limited to 65536 vertices so they can use 16-bit indices

mod config;
mod contour_octree;
mod error;
mod extract;
mod hermite;
mod mesh;
mod qef;
mod sdf;
mod simplify;
mod tables;
mod voxel;
mod voxel_octree;

pub mod sdf_primitives;

pub use config::*;
pub use error::*;
pub use extract::*;
pub use hermite::*;
pub use mesh::*;
pub use qef::Qef;
pub use sdf::*;
pub use voxel::*;
pub use voxel_octree::*;

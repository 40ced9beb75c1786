use crate::{
    tables::{AXIS_OFFSETS, CORNER_OFFSETS},
    ConfigError, HermiteDataError, Resolution,
};
use glam::{Vec3, Vec3A};
use ilattice::extent::Extent;

/// Material index of empty space.
pub const AIR: u8 = 0;
/// Material index of the default solid. Any index at or above it is solid.
pub const SOLID: u8 = 1;

/// Surface crossings along the grid edges of one axis, stored as parallel
/// arrays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeList {
    /// Linear index of the grid point each edge starts at.
    pub indices: Vec<u32>,
    /// Position of the crossing along the edge, in `[0, 1]`.
    pub zero_crossings: Vec<f32>,
    pub normals: Vec<Vec3>,
}

impl EdgeList {
    pub fn push(&mut self, index: u32, t: f32, normal: Vec3) {
        self.indices.push(index);
        self.zero_crossings.push(t);
        self.normals.push(normal);
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f32, Vec3)> + '_ {
        self.indices
            .iter()
            .zip(&self.zero_crossings)
            .zip(&self.normals)
            .map(|((&i, &t), &n)| (i, t, n))
    }
}

/// Sparse crossings for the X, Y and Z grid edges. Only edges whose material
/// changes are stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeData {
    pub axes: [EdgeList; 3],
}

impl EdgeData {
    pub fn edge_count(&self) -> usize {
        self.axes.iter().map(EdgeList::len).sum()
    }
}

/// Per grid point materials plus per edge surface crossings of one chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct HermiteData {
    resolution: Resolution,
    lod: u8,
    solid_count: usize,
    material_indices: Vec<u8>,
    edge_data: EdgeData,
}

impl HermiteData {
    /// Validates that `edge_data` stores exactly the edges on which the
    /// binarized materials change.
    pub fn new(
        resolution: Resolution,
        material_indices: Vec<u8>,
        edge_data: EdgeData,
    ) -> Result<Self, HermiteDataError> {
        let expected = resolution.point_count();
        if material_indices.len() != expected {
            return Err(HermiteDataError::MaterialCountMismatch {
                expected,
                found: material_indices.len(),
            });
        }

        let solid_count = material_indices.iter().filter(|&&m| m >= SOLID).count();
        let data = Self {
            resolution,
            lod: 0,
            solid_count,
            material_indices,
            edge_data,
        };
        data.validate_edges()?;

        Ok(data)
    }

    pub fn with_lod(mut self, lod: u8) -> Self {
        self.lod = lod;
        self
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn lod(&self) -> u8 {
        self.lod
    }

    pub fn material_indices(&self) -> &[u8] {
        &self.material_indices
    }

    pub fn edge_data(&self) -> &EdgeData {
        &self.edge_data
    }

    /// No grid point is solid.
    pub fn is_empty(&self) -> bool {
        self.solid_count == 0
    }

    /// Every grid point is solid.
    pub fn is_full(&self) -> bool {
        self.solid_count == self.material_indices.len()
    }

    #[inline]
    pub fn is_solid(&self, index: usize) -> bool {
        self.material_indices[index] >= SOLID
    }

    /// Packs the binarized materials of the 8 corners of a grid cell into one
    /// byte, corner `i` in bit `i`.
    pub fn corner_code(&self, [x, y, z]: [u32; 3]) -> u8 {
        let mut code = 0;
        for (i, [ox, oy, oz]) in CORNER_OFFSETS.into_iter().enumerate() {
            let index = self.resolution.linear_index([x + ox, y + oy, z + oz]);
            code |= (self.material_indices[index].min(SOLID)) << i;
        }
        code
    }

    fn validate_edges(&self) -> Result<(), HermiteDataError> {
        let n = self.resolution.cells();
        let point_count = self.resolution.point_count();
        let mut seen = vec![false; point_count];

        for (axis, list) in self.edge_data.axes.iter().enumerate() {
            if list.zero_crossings.len() != list.len() || list.normals.len() != list.len() {
                return Err(HermiteDataError::EdgeArrayMismatch { axis });
            }

            seen.fill(false);
            for (index, t, _) in list.iter() {
                let start = index as usize;
                if start >= point_count || self.resolution.grid_point(start)[axis] >= n {
                    return Err(HermiteDataError::EdgeOutOfBounds { axis, index });
                }
                if !(0.0..=1.0).contains(&t) {
                    return Err(HermiteDataError::InvalidZeroCrossing { axis, index, t });
                }
                if self.is_solid(start) == self.is_solid(self.edge_end(start, axis)) {
                    return Err(HermiteDataError::NoSignChange { axis, index });
                }
                if std::mem::replace(&mut seen[start], true) {
                    return Err(HermiteDataError::DuplicateEdge { axis, index });
                }
            }

            let expected = self.count_sign_changes(axis);
            if expected != list.len() {
                return Err(HermiteDataError::MissingEdges {
                    axis,
                    expected,
                    found: list.len(),
                });
            }
        }

        Ok(())
    }

    fn edge_end(&self, start: usize, axis: usize) -> usize {
        let [x, y, z] = self.resolution.grid_point(start);
        let [ox, oy, oz] = AXIS_OFFSETS[axis];
        self.resolution.linear_index([x + ox, y + oy, z + oz])
    }

    fn count_sign_changes(&self, axis: usize) -> usize {
        let n = self.resolution.cells();
        (0..self.resolution.point_count())
            .filter(|&start| {
                self.resolution.grid_point(start)[axis] < n
                    && self.is_solid(start) != self.is_solid(self.edge_end(start, axis))
            })
            .count()
    }
}

/// A cube of volume data.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    min: Vec3A,
    size: f32,
    data: HermiteData,
}

impl Chunk {
    pub fn new(min: Vec3A, size: f32, data: HermiteData) -> Result<Self, ConfigError> {
        if !(size.is_finite() && size > 0.0) {
            return Err(ConfigError::InvalidChunkSize { size });
        }
        Ok(Self { min, size, data })
    }

    pub fn min(&self) -> Vec3A {
        self.min
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn resolution(&self) -> Resolution {
        self.data.resolution
    }

    pub fn data(&self) -> &HermiteData {
        &self.data
    }

    pub fn extent(&self) -> Extent<Vec3A> {
        Extent::from_min_and_shape(self.min, Vec3A::splat(self.size))
    }

    /// Distance between adjacent grid points.
    pub fn cell_size(&self) -> f32 {
        self.size / self.resolution().cells() as f32
    }
}

use crate::{
    hermite::{EdgeData, HermiteData, AIR, SOLID},
    tables::AXIS_OFFSETS,
    Chunk, HermiteDataError, Resolution,
};
use glam::{Vec3, Vec3A};

pub fn central_gradient(sdf: impl Fn(Vec3A) -> f32, p: Vec3A, delta: f32) -> Vec3A {
    let h = 0.5 * delta;
    let dx = Vec3A::new(h, 0.0, 0.0);
    let dy = Vec3A::new(0.0, h, 0.0);
    let dz = Vec3A::new(0.0, 0.0, h);
    Vec3A::new(
        sdf(p + dx) - sdf(p - dx),
        sdf(p + dy) - sdf(p - dy),
        sdf(p + dz) - sdf(p - dz),
    ) / h
}

/// Samples `sdf` on the grid of a chunk and builds its Hermite data.
///
/// Negative samples become [`SOLID`]. Each grid edge with a material change
/// stores its linearly interpolated zero crossing and the normalized gradient
/// there.
pub fn sample_hermite_data(
    resolution: Resolution,
    min: Vec3A,
    size: f32,
    sdf: impl Fn(Vec3A) -> f32,
) -> Result<HermiteData, HermiteDataError> {
    let n = resolution.cells();
    let cell_size = size / n as f32;
    let grid_position =
        |[x, y, z]: [u32; 3]| min + Vec3A::new(x as f32, y as f32, z as f32) * cell_size;

    let samples: Vec<f32> = (0..resolution.point_count())
        .map(|i| sdf(grid_position(resolution.grid_point(i))))
        .collect();
    let materials = samples
        .iter()
        .map(|&d| if d < 0.0 { SOLID } else { AIR })
        .collect();

    // Central differences over a hundredth of a cell.
    let delta = 1e-2 * cell_size;

    let mut edge_data = EdgeData::default();
    for (axis, edges) in edge_data.axes.iter_mut().enumerate() {
        for start in 0..resolution.point_count() {
            let p0 = resolution.grid_point(start);
            if p0[axis] >= n {
                continue;
            }
            let p1 = [0, 1, 2].map(|i| p0[i] + AXIS_OFFSETS[axis][i]);

            let d0 = samples[start];
            let d1 = samples[resolution.linear_index(p1)];
            if (d0 < 0.0) == (d1 < 0.0) {
                continue;
            }

            let t = (d0 / (d0 - d1)).clamp(0.0, 1.0);
            let a = grid_position(p0);
            let crossing = a + (grid_position(p1) - a) * t;
            let normal = central_gradient(&sdf, crossing, delta).normalize_or_zero();

            edges.push(start as u32, t, Vec3::from(normal));
        }
    }

    HermiteData::new(resolution, materials, edge_data)
}

impl Chunk {
    /// Samples `sdf` over the cube `[min, min + size]`.
    pub fn from_sdf(
        resolution: Resolution,
        min: Vec3A,
        size: f32,
        sdf: impl Fn(Vec3A) -> f32,
    ) -> Result<Self, crate::Error> {
        let data = sample_hermite_data(resolution, min, size, sdf)?;
        Ok(Self::new(min, size, data)?)
    }
}

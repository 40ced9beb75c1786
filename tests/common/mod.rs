#![allow(dead_code)]

use glam::{Vec3, Vec3A};
use hermite_dual_contour::{
    sdf_primitives::sphere, Chunk, EdgeData, HermiteData, Resolution, SOLID,
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A sphere of radius 0.3 in the middle of the unit chunk.
pub fn unit_sphere_chunk(resolution: u32) -> Chunk {
    let center = Vec3A::splat(0.5);
    Chunk::from_sdf(Resolution::new(resolution).unwrap(), Vec3A::ZERO, 1.0, |p| {
        sphere(0.3, p - center)
    })
    .unwrap()
}

/// Hermite data for a material grid, with every crossing half way along its
/// edge and normals pointing from solid to air along the edge.
pub fn hermite_from_materials(resolution: Resolution, materials: Vec<u8>) -> HermiteData {
    let n = resolution.cells();
    let mut edges = EdgeData::default();
    for (axis, list) in edges.axes.iter_mut().enumerate() {
        for start in 0..resolution.point_count() {
            let mut p = resolution.grid_point(start);
            if p[axis] >= n {
                continue;
            }
            p[axis] += 1;
            let end = resolution.linear_index(p);

            let solid_start = materials[start] >= SOLID;
            if solid_start == (materials[end] >= SOLID) {
                continue;
            }

            let mut normal = Vec3::ZERO;
            normal[axis] = if solid_start { 1.0 } else { -1.0 };
            list.push(start as u32, 0.5, normal);
        }
    }
    HermiteData::new(resolution, materials, edges).unwrap()
}

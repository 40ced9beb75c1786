use crate::{
    mesh::{MeshVertexId, NULL_MESH_VERTEX_ID},
    qef::Qef,
    tables::EDGES,
};
use glam::Vec3;

/// Surface sample of one octree leaf.
#[derive(Clone, Debug)]
pub struct Voxel {
    /// Bit `i` is set if corner `i` is solid.
    pub materials: u8,
    /// Number of cube edges with a material change. Voxels built from Hermite
    /// data are complete once their QEF holds this many points.
    pub edge_count: u8,
    pub qef: Qef,

    // We don't use `Vec3A` because it's 16-byte-aligned.
    pub position: Vec3,
    pub normal: Vec3,

    pub(crate) mesh_vertex_id: MeshVertexId,
}

impl Voxel {
    pub fn new(materials: u8) -> Self {
        Self {
            materials,
            edge_count: count_sign_changes(materials),
            qef: Qef::default(),
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            mesh_vertex_id: NULL_MESH_VERTEX_ID,
        }
    }

    #[inline]
    pub fn is_solid(&self, corner: u8) -> bool {
        (self.materials >> corner) & 1 != 0
    }

    pub fn is_complete(&self) -> bool {
        self.qef.num_points() == self.edge_count as u32
    }

    pub fn mesh_vertex_id(&self) -> MeshVertexId {
        self.mesh_vertex_id
    }
}

pub fn count_sign_changes(materials: u8) -> u8 {
    EDGES
        .iter()
        .filter(|&&[c0, c1]| (materials >> c0) & 1 != (materials >> c1) & 1)
        .count() as u8
}

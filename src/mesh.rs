pub type MeshVertexId = u32;
pub const NULL_MESH_VERTEX_ID: MeshVertexId = MeshVertexId::MAX;

/// Vertices addressable by 16-bit indices.
pub const MAX_VERTEX_COUNT: usize = 1 << 16;

/// Triangle mesh of one chunk, as flat buffers.
///
/// Vertex `i` has position `positions[3i..3i + 3]` and normal
/// `normals[3i..3i + 3]`; every 3 `indices` form a triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub indices: Vec<u16>,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
}

impl MeshData {
    pub(crate) fn with_vertex_count(vertex_count: usize) -> Self {
        Self {
            indices: Vec::new(),
            positions: vec![0.0; 3 * vertex_count],
            normals: vec![0.0; 3 * vertex_count],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn position(&self, vertex: usize) -> [f32; 3] {
        let p = &self.positions[3 * vertex..3 * vertex + 3];
        [p[0], p[1], p[2]]
    }

    pub fn normal(&self, vertex: usize) -> [f32; 3] {
        let n = &self.normals[3 * vertex..3 * vertex + 3];
        [n[0], n[1], n[2]]
    }
}

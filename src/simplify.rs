use crate::{
    qef::Qef,
    voxel::Voxel,
    voxel_octree::{extent_contains, CellId, VoxelBlock},
};
use glam::Vec3;

impl VoxelBlock {
    /// Merges sibling leaves into their parent wherever the QEF error of the
    /// merged constraints is at most `threshold`.
    ///
    /// Returns the number of removed voxels. A non-positive threshold leaves
    /// the tree untouched.
    pub fn simplify(&mut self, threshold: f32) -> usize {
        if !(threshold > 0.0) {
            return 0;
        }

        let removed = self.collapse(self.root_id, threshold);
        self.voxel_count -= removed;

        log::debug!(
            "collapsed {removed} voxels with threshold {threshold}, {} remain",
            self.voxel_count
        );

        removed
    }

    // Recursive because collapsing is a post-order traversal.
    fn collapse(&mut self, cell_id: CellId, threshold: f32) -> usize {
        let Some(children) = self.all_cells[cell_id as usize].children else {
            return 0;
        };

        let mut removed = 0;
        let mut collapsible = true;

        let mut qef = Qef::default();
        let mut signs: [Option<u8>; 8] = [None; 8];
        let mut mid_sign = None;
        let mut num_voxels = 0;

        for (octant, &child_id) in children.iter().enumerate() {
            // Recurse first so the child gets a chance to become a leaf.
            removed += self.collapse(child_id, threshold);

            let child = &self.all_cells[child_id as usize];
            if !child.is_leaf() {
                collapsible = false;
            } else if let Some(voxel) = &child.voxel {
                qef += &voxel.qef;

                // Corner `7 - octant` of every child is the center of this cell.
                mid_sign = Some((voxel.materials >> (7 - octant)) & 1);
                signs[octant] = Some((voxel.materials >> octant) & 1);

                num_voxels += 1;
            }
        }

        let Some(mid_sign) = mid_sign else {
            return removed;
        };
        if !collapsible {
            return removed;
        }

        let p = qef.minimizer();
        if qef.error(p) > threshold {
            return removed;
        }

        let cell = &self.all_cells[cell_id as usize];
        let position = if extent_contains(&cell.extent, p) {
            p
        } else {
            qef.mass_point()
        };

        let mut materials = 0;
        let mut normal = Vec3::ZERO;
        for (octant, (sign, &child_id)) in signs.iter().zip(&children).enumerate() {
            match sign {
                Some(sign) => {
                    materials |= sign << octant;
                    if let Some(voxel) = &self.all_cells[child_id as usize].voxel {
                        normal += voxel.normal;
                    }
                }
                // Undetermined, use the sign at the center instead.
                None => materials |= mid_sign << octant,
            }
        }

        let mut voxel = Voxel::new(materials);
        voxel.position = position.into();
        voxel.normal = normal.normalize_or_zero();
        voxel.qef = qef;

        let cell = &mut self.all_cells[cell_id as usize];
        cell.voxel = Some(voxel);
        cell.children = None;

        // Removed the existing voxels and created a new one.
        removed + num_voxels - 1
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        hermite::{EdgeData, HermiteData, AIR, SOLID},
        sdf_primitives::{plane, sphere},
        Chunk, Resolution,
    };
    use glam::Vec3A;

    fn sphere_chunk(resolution: u32) -> Chunk {
        let center = Vec3A::splat(0.5);
        Chunk::from_sdf(Resolution::new(resolution).unwrap(), Vec3A::ZERO, 1.0, |p| {
            sphere(0.3, p - center)
        })
        .unwrap()
    }

    fn leaf_count(block: &VoxelBlock) -> usize {
        block.leaves().count()
    }

    /// Only grid point `(1, 1, 1)` of a resolution 2 grid is solid, so all 8
    /// cells hold a voxel.
    fn center_point_chunk() -> Chunk {
        let resolution = Resolution::new(2).unwrap();
        let mut materials = vec![AIR; resolution.point_count()];
        let center = resolution.linear_index([1, 1, 1]);
        materials[center] = SOLID;

        let mut edges = EdgeData::default();
        for axis in 0..3 {
            let mut before = [1, 1, 1];
            before[axis] = 0;
            let mut dir = Vec3::ZERO;
            dir[axis] = 1.0;
            edges.axes[axis].push(resolution.linear_index(before) as u32, 0.5, -dir);
            edges.axes[axis].push(center as u32, 0.5, dir);
        }
        let data = HermiteData::new(resolution, materials, edges).unwrap();
        Chunk::new(Vec3A::ZERO, 2.0, data).unwrap()
    }

    #[test]
    fn zero_threshold_changes_nothing() {
        let mut block = VoxelBlock::build(&sphere_chunk(8));
        let voxels = block.voxel_count();
        let leaves = leaf_count(&block);

        assert_eq!(block.simplify(0.0), 0);
        assert_eq!(block.voxel_count(), voxels);
        assert_eq!(leaf_count(&block), leaves);
    }

    #[test]
    fn huge_threshold_merges_all_eight_children() {
        let mut block = VoxelBlock::build(&center_point_chunk());
        assert_eq!(block.voxel_count(), 8);

        assert_eq!(block.simplify(f32::MAX), 7);
        assert_eq!(block.voxel_count(), 1);

        let root = block.root();
        assert!(root.is_leaf());
        let voxel = root.voxel().unwrap();
        // Each parent corner is the air corner of the child in that octant.
        assert_eq!(voxel.materials, 0x00);
        assert_eq!(voxel.edge_count, 0);
        assert_eq!(voxel.qef.num_points(), 24);
        assert!(root.contains(Vec3A::from(voxel.position)));
    }

    #[test]
    fn planar_region_collapses_under_small_threshold() {
        // x + y + z = 2.5 crosses every cell of a resolution 2 grid but (1, 1, 1).
        let normal = Vec3A::ONE.normalize();
        let origin = Vec3A::splat(2.5 / 3.0);
        let chunk = Chunk::from_sdf(Resolution::new(2).unwrap(), Vec3A::ZERO, 2.0, |p| {
            plane(origin, normal, p)
        })
        .unwrap();

        let mut block = VoxelBlock::build(&chunk);
        assert_eq!(block.voxel_count(), 7);

        assert_eq!(block.simplify(0.01), 6);
        assert_eq!(block.voxel_count(), 1);

        let voxel = block.root().voxel().unwrap();
        // Corners 0, 1, 2 and 4 lie below the plane. Corner 7 has no child
        // voxel and takes the (air) sign at the center of the chunk.
        assert_eq!(voxel.materials, 0b0001_0111);
        let p = Vec3A::from(voxel.position);
        assert!(plane(origin, normal, p).abs() < 1e-3);
        assert!((Vec3A::from(voxel.normal) - normal).length() < 1e-3);
    }

    #[test]
    fn collapse_never_increases_voxel_count() {
        for threshold in [1e-4, 1e-3, 1e-2, 1.0, 100.0] {
            let mut block = VoxelBlock::build(&sphere_chunk(16));
            let before = block.voxel_count();
            let removed = block.simplify(threshold);

            assert_eq!(block.voxel_count(), before - removed);
            assert_eq!(
                block.leaves().filter(|c| c.voxel().is_some()).count(),
                block.voxel_count()
            );
            for cell in block.leaves() {
                if let Some(voxel) = cell.voxel() {
                    assert!(cell.contains(Vec3A::from(voxel.position)));
                }
            }
        }
    }
}

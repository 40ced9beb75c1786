use crate::{
    config::BIAS,
    tables::{AXIS_OFFSETS, CORNER_OFFSETS, EDGE_CELL_CORNERS},
    voxel::Voxel,
    Chunk,
};
use glam::{Vec3, Vec3A};
use ilattice::extent::Extent;

pub type CellId = u32;

/// Sparse octree of surface voxels for one chunk.
///
/// Cells live in an arena and refer to their children by [`CellId`]. Cells
/// detached by simplification stay in the arena but are unreachable from the
/// root.
#[derive(Debug)]
pub struct VoxelBlock {
    pub(crate) root_id: CellId,
    pub(crate) all_cells: Vec<VoxelCell>,
    pub(crate) voxel_count: usize,
}

impl VoxelBlock {
    /// Builds leaves for exactly the grid cells the surface passes through.
    ///
    /// Every stored edge crossing is added to the voxels of the up to 4 grid
    /// cells sharing that edge. A voxel is solved as soon as it has received
    /// one crossing per sign-changing cube edge.
    pub fn build(chunk: &Chunk) -> Self {
        let mut me = Self {
            root_id: 0,
            all_cells: vec![VoxelCell::new(chunk.extent(), 0)],
            voxel_count: 0,
        };

        let data = chunk.data();
        let resolution = chunk.resolution();
        let n = resolution.cells();
        let cell_size = chunk.cell_size();
        let grid_position = |[x, y, z]: [u32; 3]| {
            chunk.min() + Vec3A::new(x as f32, y as f32, z as f32) * cell_size
        };

        for (axis, edges) in data.edge_data().axes.iter().enumerate() {
            for (index, t, normal) in edges.iter() {
                let start = resolution.grid_point(index as usize);
                let end = [0, 1, 2].map(|i| start[i] + AXIS_OFFSETS[axis][i]);
                let a = grid_position(start);
                let crossing = a + (grid_position(end) - a) * t;
                let normal = Vec3A::from(normal);

                // Each edge can belong to up to four cells.
                for corner in EDGE_CELL_CORNERS[axis] {
                    let offset = CORNER_OFFSETS[corner];
                    let mut cell = [0; 3];
                    let mut inside = true;
                    for i in 0..3 {
                        match start[i].checked_sub(offset[i]) {
                            Some(c) if c < n => cell[i] = c,
                            _ => inside = false,
                        }
                    }
                    if !inside {
                        continue;
                    }

                    let cell_id = me.get_or_split_leaf(n, cell);
                    let leaf = &mut me.all_cells[cell_id as usize];
                    let extent = leaf.extent;

                    let mut created = false;
                    let voxel = leaf.voxel.get_or_insert_with(|| {
                        created = true;
                        Voxel::new(data.corner_code(cell))
                    });
                    if created {
                        me.voxel_count += 1;
                    }

                    voxel.normal += Vec3::from(normal);
                    voxel.qef.add_point(crossing, normal);

                    assert!(
                        voxel.qef.num_points() <= voxel.edge_count as u32,
                        "voxel at {cell:?} received more crossings than it has sign changes"
                    );

                    if voxel.is_complete() {
                        let p = voxel.qef.minimizer();
                        let p = if extent_contains(&extent, p) {
                            p
                        } else {
                            voxel.qef.mass_point()
                        };
                        voxel.position = p.into();
                        voxel.normal = voxel.normal.normalize_or_zero();
                    }
                }
            }
        }

        log::debug!(
            "built voxel block at {} with {} voxels in {} cells",
            chunk.min(),
            me.voxel_count,
            me.all_cells.len()
        );

        me
    }

    /// Number of voxels reachable from the root.
    pub fn voxel_count(&self) -> usize {
        self.voxel_count
    }

    pub fn root(&self) -> &VoxelCell {
        self.cell(self.root_id)
    }

    #[inline]
    pub fn cell(&self, id: CellId) -> &VoxelCell {
        &self.all_cells[id as usize]
    }

    /// Leaf cells in depth-first child order, including leaves without a
    /// voxel.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            block: self,
            stack: vec![self.root_id],
        }
    }

    /// Descends from the root to the leaf of grid cell `[x, y, z]`, splitting
    /// cells on the way.
    fn get_or_split_leaf(&mut self, n: u32, [x, y, z]: [u32; 3]) -> CellId {
        let mut cell_id = self.root_id;
        let mut half = n >> 1;
        while half > 0 {
            let octant = ((x & half != 0) as usize) << 2
                | ((y & half != 0) as usize) << 1
                | (z & half != 0) as usize;

            let children = match self.all_cells[cell_id as usize].children {
                Some(children) => children,
                None => self.split(cell_id),
            };
            cell_id = children[octant];
            half >>= 1;
        }
        cell_id
    }

    fn split(&mut self, cell_id: CellId) -> [CellId; 8] {
        let parent = &self.all_cells[cell_id as usize];
        debug_assert!(parent.voxel.is_none());

        let depth = parent.depth + 1;
        let half = 0.5 * parent.extent.shape;
        let min = parent.extent.minimum;

        let first_child = self.all_cells.len() as CellId;
        for [ox, oy, oz] in CORNER_OFFSETS {
            let offset = Vec3A::new(ox as f32, oy as f32, oz as f32);
            let extent = Extent::from_min_and_shape(min + offset * half, half);
            self.all_cells.push(VoxelCell::new(extent, depth));
        }

        let children = [0, 1, 2, 3, 4, 5, 6, 7].map(|i| first_child + i);
        self.all_cells[cell_id as usize].children = Some(children);
        children
    }
}

/// Cubic octree node. Either split into 8 children, or a leaf that may hold a
/// voxel.
#[derive(Clone, Debug)]
pub struct VoxelCell {
    pub(crate) extent: Extent<Vec3A>,
    pub(crate) children: Option<[CellId; 8]>,
    pub(crate) voxel: Option<Voxel>,
    pub(crate) depth: u8,
}

impl VoxelCell {
    fn new(extent: Extent<Vec3A>, depth: u8) -> Self {
        Self {
            extent,
            children: None,
            voxel: None,
            depth,
        }
    }

    pub fn extent(&self) -> &Extent<Vec3A> {
        &self.extent
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn children(&self) -> Option<&[CellId; 8]> {
        self.children.as_ref()
    }

    pub fn voxel(&self) -> Option<&Voxel> {
        self.voxel.as_ref()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Checks whether `p` lies inside this cell, with a small tolerance.
    pub fn contains(&self, p: Vec3A) -> bool {
        extent_contains(&self.extent, p)
    }
}

pub(crate) fn extent_contains(extent: &Extent<Vec3A>, p: Vec3A) -> bool {
    let min = extent.minimum - Vec3A::splat(BIAS);
    let max = extent.minimum + extent.shape + Vec3A::splat(BIAS);
    p.cmpge(min).all() && p.cmple(max).all()
}

pub struct Leaves<'a> {
    block: &'a VoxelBlock,
    stack: Vec<CellId>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a VoxelCell;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let cell = self.block.cell(id);
            match &cell.children {
                Some(children) => self.stack.extend(children.iter().rev()),
                None => return Some(cell),
            }
        }
        None
    }
}

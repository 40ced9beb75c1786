use crate::{Chunk, ConfigError, ExtractionSettings, MeshData, VoxelBlock};
use rayon::prelude::*;

/// Builds, simplifies and contours one chunk.
///
/// `Ok(None)` means the chunk produced no geometry: either it has no surface or
/// it needs more than 65536 vertices and must be subdivided.
pub fn extract_surface(
    chunk: &Chunk,
    settings: &ExtractionSettings,
) -> Result<Option<MeshData>, ConfigError> {
    if chunk.resolution() != settings.resolution {
        return Err(ConfigError::ResolutionMismatch {
            expected: settings.resolution.cells(),
            found: chunk.resolution().cells(),
        });
    }

    if chunk.data().edge_data().edge_count() == 0 {
        log::trace!("chunk at {} has no surface", chunk.min());
        return Ok(None);
    }

    let mut block = VoxelBlock::build(chunk);

    // Increase the error threshold based on the LOD.
    let lod = chunk.data().lod();
    block.simplify(settings.error_threshold(lod));

    Ok(block.dual_contour())
}

/// Extracts independent chunks in parallel. Results are in input order.
pub fn extract_surfaces(
    chunks: &[Chunk],
    settings: &ExtractionSettings,
) -> Vec<Result<Option<MeshData>, ConfigError>> {
    chunks
        .par_iter()
        .map(|chunk| extract_surface(chunk, settings))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{sdf_primitives::sphere, Resolution};
    use glam::Vec3A;

    fn sphere_chunk(min: Vec3A, resolution: Resolution) -> Chunk {
        let center = Vec3A::splat(0.5);
        Chunk::from_sdf(resolution, min, 1.0, |p| sphere(0.3, p - center)).unwrap()
    }

    #[test]
    fn mismatched_resolution_is_rejected() {
        let chunk = sphere_chunk(Vec3A::ZERO, Resolution::new(8).unwrap());
        let settings = ExtractionSettings::new(Resolution::new(16).unwrap());
        assert_eq!(
            extract_surface(&chunk, &settings),
            Err(ConfigError::ResolutionMismatch {
                expected: 16,
                found: 8
            })
        );
    }

    #[test]
    fn parallel_results_match_sequential() {
        let resolution = Resolution::new(8).unwrap();
        let settings = ExtractionSettings::new(resolution);
        let chunks: Vec<_> = (0..4)
            .map(|i| sphere_chunk(Vec3A::new(i as f32 * 0.25 - 0.5, 0.0, 0.0), resolution))
            .collect();

        let parallel = extract_surfaces(&chunks, &settings);
        assert_eq!(parallel.len(), chunks.len());
        for (chunk, result) in chunks.iter().zip(parallel) {
            assert_eq!(result, extract_surface(chunk, &settings));
        }
    }

    #[test]
    fn coarser_lod_never_adds_vertices() {
        let resolution = Resolution::new(16).unwrap();
        let settings = ExtractionSettings::new(resolution);
        let chunk = sphere_chunk(Vec3A::ZERO, resolution);
        let coarse = Chunk::new(
            chunk.min(),
            chunk.size(),
            chunk.data().clone().with_lod(2),
        )
        .unwrap();

        let fine = extract_surface(&chunk, &settings).unwrap().unwrap();
        let coarse = extract_surface(&coarse, &settings).unwrap();
        let coarse_vertices = coarse.map_or(0, |m| m.vertex_count());
        assert!(coarse_vertices <= fine.vertex_count());
    }
}

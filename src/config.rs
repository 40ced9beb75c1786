use crate::ConfigError;

/// Grid resolutions are capped so that indices and octree depth stay small.
pub const MAX_RESOLUTION: u32 = 256;

/// Tolerance for cell boundary checks.
pub const BIAS: f32 = 1e-6;

/// Number of cells along each edge of a chunk.
///
/// Always a power of two in `1..=256`, so the per-chunk octree has depth
/// `log2(n)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution(u32);

impl Resolution {
    /// Rounds `n` up to the next power of two.
    pub fn new(n: u32) -> Result<Self, ConfigError> {
        if n == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if n > MAX_RESOLUTION {
            return Err(ConfigError::ResolutionTooLarge {
                resolution: n,
                max: MAX_RESOLUTION,
            });
        }
        Ok(Self(n.next_power_of_two()))
    }

    #[inline]
    pub fn cells(&self) -> u32 {
        self.0
    }

    /// Grid points along each edge, `n + 1`.
    #[inline]
    pub fn points(&self) -> u32 {
        self.0 + 1
    }

    /// Total number of grid points, `(n + 1)^3`.
    #[inline]
    pub fn point_count(&self) -> usize {
        let m = self.points() as usize;
        m * m * m
    }

    #[inline]
    pub fn max_depth(&self) -> u8 {
        self.0.trailing_zeros() as u8
    }

    /// Linear index of a grid point, `z * (n + 1)^2 + y * (n + 1) + x`.
    #[inline]
    pub fn linear_index(&self, [x, y, z]: [u32; 3]) -> usize {
        let m = self.points() as usize;
        (z as usize * m + y as usize) * m + x as usize
    }

    /// Inverse of [`Self::linear_index`].
    #[inline]
    pub fn grid_point(&self, index: usize) -> [u32; 3] {
        let m = self.points() as usize;
        [
            (index % m) as u32,
            ((index % (m * m)) / m) as u32,
            (index / (m * m)) as u32,
        ]
    }
}

/// Parameters shared by every extraction in a session.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractionSettings {
    pub resolution: Resolution,
    /// QEF error tolerated when collapsing at LOD 0.
    pub base_error_threshold: f32,
    /// Added to the threshold for every LOD step.
    pub lod_threshold_step: f32,
}

impl ExtractionSettings {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            base_error_threshold: 0.01,
            lod_threshold_step: 4.0,
        }
    }

    /// Coarser LODs collapse more aggressively.
    pub fn error_threshold(&self, lod: u8) -> f32 {
        self.base_error_threshold + lod as f32 * self.lod_threshold_step
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolution_rounds_up_to_power_of_two() {
        assert_eq!(Resolution::new(1).unwrap().cells(), 1);
        assert_eq!(Resolution::new(5).unwrap().cells(), 8);
        assert_eq!(Resolution::new(32).unwrap().cells(), 32);
        assert_eq!(Resolution::new(200).unwrap().cells(), 256);
        assert_eq!(Resolution::new(8).unwrap().max_depth(), 3);
        assert_eq!(Resolution::new(8).unwrap().point_count(), 729);
    }

    #[test]
    fn grid_point_inverts_linear_index() {
        let resolution = Resolution::new(4).unwrap();
        assert_eq!(resolution.linear_index([1, 0, 0]), 1);
        assert_eq!(resolution.linear_index([0, 1, 0]), 5);
        assert_eq!(resolution.linear_index([0, 0, 1]), 25);
        for index in [0, 7, 31, 124] {
            assert_eq!(resolution.linear_index(resolution.grid_point(index)), index);
        }
    }

    #[test]
    fn invalid_resolutions_are_rejected() {
        assert_eq!(Resolution::new(0), Err(ConfigError::ZeroResolution));
        assert_eq!(
            Resolution::new(257),
            Err(ConfigError::ResolutionTooLarge {
                resolution: 257,
                max: MAX_RESOLUTION
            })
        );
    }

    #[test]
    fn threshold_grows_with_lod() {
        let settings = ExtractionSettings::new(Resolution::new(16).unwrap());
        assert_eq!(settings.error_threshold(0), 0.01);
        assert!(settings.error_threshold(1) > settings.error_threshold(0));
        assert!(settings.error_threshold(3) > settings.error_threshold(2));
    }
}

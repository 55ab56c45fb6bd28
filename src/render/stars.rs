//! The persistent star catalog painted into the sky band.
//!
//! Stars live on the unit sphere's upper hemisphere as (azimuth, elevation)
//! pairs. The catalog is built lazily from a seed, so the same seed always
//! yields the same sky, and it is only rebuilt on [`StarCatalog::regenerate`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::colors;
use crate::error::RenderError;
use crate::math::vec3::Vec3;

pub const MAX_STARS: usize = 8000;
pub const DEFAULT_SEED: u64 = 0x5EED_0F_57A2;

/// Brightest footprint in pixels.
pub const MAX_BRIGHTNESS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Radians clockwise from world +Y.
    pub azimuth: f32,
    /// Radians above the horizontal plane, in `[0, π/2)`.
    pub elevation: f32,
    pub color: u32,
    /// Pixel footprint, `1..=MAX_BRIGHTNESS`.
    pub brightness: u8,
}

impl Star {
    /// World-space unit direction, Z-up.
    pub fn direction(&self) -> Vec3 {
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        Vec3::new(cos_el * sin_az, cos_el * cos_az, sin_el)
    }
}

#[derive(Debug, Clone)]
pub struct StarCatalog {
    seed: u64,
    stars: Option<Vec<Star>>,
}

impl Default for StarCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl StarCatalog {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed, stars: None }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_generated(&self) -> bool {
        self.stars.is_some()
    }

    /// Drops the current catalog; the next [`stars`](Self::stars) call
    /// builds a new one from `seed`.
    pub fn regenerate(&mut self, seed: u64) {
        self.seed = seed;
        self.stars = None;
    }

    /// The full catalog, generating it on first use.
    pub fn stars(&mut self) -> Result<&[Star], RenderError> {
        if self.stars.is_none() {
            self.stars = Some(generate(self.seed)?);
        }
        Ok(self.stars.as_deref().unwrap_or_default())
    }
}

fn generate(seed: u64) -> Result<Vec<Star>, RenderError> {
    let mut stars = Vec::new();
    stars
        .try_reserve_exact(MAX_STARS)
        .map_err(|_| RenderError::Allocation {
            what: "star catalog",
            count: MAX_STARS,
        })?;

    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..MAX_STARS {
        let azimuth = rng.random_range(0.0..std::f32::consts::TAU);
        // Uniform over the hemisphere's area, not its elevation angle.
        let elevation = rng.random_range(0.0f32..1.0).asin();
        let tint = rng.random_range(0..=2u8);
        let base = rng.random_range(160..=255u8);
        let color = match tint {
            0 => colors::rgb(base, base, 255),
            1 => colors::rgb(255, base, base),
            _ => colors::rgb(base, base, base),
        };
        // Most stars are faint.
        let u: f32 = rng.random_range(0.0..1.0);
        let brightness = 1 + (u * u * u * MAX_BRIGHTNESS as f32) as u8;
        stars.push(Star {
            azimuth,
            elevation,
            color,
            brightness: brightness.min(MAX_BRIGHTNESS),
        });
    }
    log::debug!("generated star catalog: {} stars, seed {:#x}", stars.len(), seed);
    Ok(stars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn catalog_is_lazy_and_full() {
        let mut catalog = StarCatalog::new();
        assert!(!catalog.is_generated());
        assert_eq!(catalog.stars().unwrap().len(), MAX_STARS);
        assert!(catalog.is_generated());
    }

    #[test]
    fn same_seed_same_sky() {
        let a = StarCatalog::with_seed(7).stars().unwrap().to_vec();
        let b = StarCatalog::with_seed(7).stars().unwrap().to_vec();
        assert_eq!(a, b);
    }

    #[test]
    fn regenerate_changes_the_sky() {
        let mut catalog = StarCatalog::with_seed(1);
        let first = catalog.stars().unwrap()[0];
        catalog.regenerate(2);
        assert!(!catalog.is_generated());
        assert_ne!(catalog.stars().unwrap()[0], first);
    }

    #[test]
    fn stars_are_in_the_upper_hemisphere() {
        let mut catalog = StarCatalog::new();
        for star in catalog.stars().unwrap() {
            assert!((1..=MAX_BRIGHTNESS).contains(&star.brightness));
            let dir = star.direction();
            assert!(dir.z >= 0.0);
            assert_relative_eq!(dir.magnitude(), 1.0, epsilon = 1e-5);
        }
    }
}

//! Sky pointings and the RA/Dec boxes used to query the catalog.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Highest declination DECam can point at.
pub const DECAM_MAX_DEC: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointing {
    pub ra: f64,
    pub dec: f64,
}

impl Pointing {
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }

    /// Uniform draw over the DECam-accessible sky.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            ra: rng.gen_range(0.0..360.0 - 1e-5),
            dec: rng.gen_range(-90.0..DECAM_MAX_DEC),
        }
    }
}

/// RA/Dec box in degrees. `ra_min > ra_max` means the box wraps through RA = 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyBox {
    pub ra_min: f64,
    pub ra_max: f64,
    pub dec_min: f64,
    pub dec_max: f64,
}

impl SkyBox {
    /// Box of half-width `margin` degrees around a pointing.
    pub fn around(pointing: Pointing, margin: f64) -> Self {
        Self {
            ra_min: (pointing.ra - margin).rem_euclid(360.0),
            ra_max: (pointing.ra + margin).rem_euclid(360.0),
            dec_min: (pointing.dec - margin).max(-90.0),
            dec_max: (pointing.dec + margin).min(90.0),
        }
    }

    pub fn wraps(&self) -> bool {
        self.ra_min > self.ra_max
    }

    pub fn contains(&self, ra: f64, dec: f64) -> bool {
        let ra_ok = if self.wraps() {
            ra >= self.ra_min || ra <= self.ra_max
        } else {
            ra >= self.ra_min && ra <= self.ra_max
        };
        ra_ok && dec >= self.dec_min && dec <= self.dec_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_pointing_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = Pointing::random(&mut rng);
            assert!((0.0..360.0).contains(&p.ra));
            assert!((-90.0..DECAM_MAX_DEC).contains(&p.dec));
        }
    }

    #[test]
    fn test_box_contains() {
        let sky = SkyBox::around(Pointing::new(60.0, -30.0), 1.0);
        assert!(!sky.wraps());
        assert!(sky.contains(60.5, -30.5));
        assert!(!sky.contains(62.0, -30.0));
        assert!(!sky.contains(60.0, -28.0));
    }

    #[test]
    fn test_box_wraps_through_zero() {
        let sky = SkyBox::around(Pointing::new(0.5, 0.0), 1.0);
        assert!(sky.wraps());
        assert!((sky.ra_min - 359.5).abs() < 1e-9);
        assert!(sky.contains(359.8, 0.0));
        assert!(sky.contains(1.2, 0.0));
        assert!(!sky.contains(180.0, 0.0));
    }

    #[test]
    fn test_dec_is_clamped() {
        let sky = SkyBox::around(Pointing::new(10.0, -89.5), 1.0);
        assert_eq!(sky.dec_min, -90.0);
    }
}

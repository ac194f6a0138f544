use std::f64::consts::FRAC_1_SQRT_2;

use nalgebra::Point2;
use serde::{
    Deserialize,
    Serialize,
};

/// Upper bound for the geometric factor of [`MaterialModel::LossyDispersive`].
pub const GEOMETRIC_FACTOR_LIMIT: f64 = 1000.0;

/// Bulk properties of the background medium.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Medium {
    /// Free-space impedance (eta_0, in ohms).
    pub impedance: f64,

    /// Courant number `c * delta_t / delta_x`.
    pub courant: f64,

    /// Attenuation per time step. Only used by [`MaterialModel::LossyDispersive`].
    pub loss: f64,
}

impl Medium {
    /// Largest stable Courant number for square cells in 2-D.
    pub const MAX_STABLE_COURANT: f64 = FRAC_1_SQRT_2;

    pub const VACUUM: Self = Self {
        impedance: 377.0,
        courant: Self::MAX_STABLE_COURANT,
        loss: 0.0,
    };
}

impl Default for Medium {
    fn default() -> Self {
        Self::VACUUM
    }
}

/// Circular scatterer in the 2-D grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scatterer {
    pub center: Point2<usize>,
    pub radius: f64,
}

impl Default for Scatterer {
    fn default() -> Self {
        Self {
            center: Point2::new(150, 100),
            radius: 40.0,
        }
    }
}

impl Scatterer {
    pub fn distance(&self, point: &Point2<usize>) -> f64 {
        let dx = point.x.abs_diff(self.center.x) as f64;
        let dy = point.y.abs_diff(self.center.y) as f64;
        dx.hypot(dy)
    }

    pub fn contains(&self, point: &Point2<usize>) -> bool {
        self.distance(point) < self.radius
    }
}

/// How the scatterer region is turned into update coefficients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialModel {
    /// All coefficients are zero inside the scatterer.
    #[default]
    SimpleVoid,

    /// Permittivity and permeability inside the scatterer are scaled by a
    /// radial geometric factor, and all cells are attenuated by
    /// [`Medium::loss`].
    LossyDispersive,
}

/// Radial scaling of the material parameters at `distance` from the center of a
/// scatterer with `radius`.
///
/// Values that are NaN or larger than [`GEOMETRIC_FACTOR_LIMIT`] in magnitude
/// (e.g. at the center, where `radius / distance` is infinite) are clamped to
/// the limit.
pub fn geometric_factor(radius: f64, distance: f64) -> f64 {
    let ratio = radius / distance;
    let q = (-ratio + (ratio * ratio + 1.0 / 27.0).sqrt()).cbrt();
    let factor = (q - 1.0 / (3.0 * q)).powi(2);

    if factor.is_nan() || factor.abs() > GEOMETRIC_FACTOR_LIMIT {
        GEOMETRIC_FACTOR_LIMIT
    }
    else {
        factor
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use crate::fdtd::material::{
        GEOMETRIC_FACTOR_LIMIT,
        Scatterer,
        geometric_factor,
    };

    #[test]
    fn distance_is_euclidean() {
        let scatterer = Scatterer {
            center: Point2::new(10, 10),
            radius: 5.0,
        };
        assert_eq!(scatterer.distance(&Point2::new(13, 14)), 5.0);
        assert_eq!(scatterer.distance(&Point2::new(7, 6)), 5.0);
        assert!(scatterer.contains(&Point2::new(13, 13)));
        assert!(!scatterer.contains(&Point2::new(13, 14)));
    }

    #[test]
    fn geometric_factor_is_clamped_at_center() {
        assert_eq!(geometric_factor(40.0, 0.0), GEOMETRIC_FACTOR_LIMIT);
    }

    #[test]
    fn geometric_factor_is_finite_off_center() {
        for distance in [1.0, 10.0, 39.0] {
            let factor = geometric_factor(40.0, distance);
            assert!(factor.is_finite());
            assert!(factor > 0.0);
            assert!(factor <= GEOMETRIC_FACTOR_LIMIT);
        }
    }
}

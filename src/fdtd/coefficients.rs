use std::ops::Index;

use nalgebra::Point2;

use crate::fdtd::{
    lattice::{
        Lattice,
        Strider,
    },
    material::{
        MaterialModel,
        Medium,
        Scatterer,
        geometric_factor,
    },
};

/// Per-cell coefficients of the 2-D update equations.
///
/// The suffix names the field a coefficient multiplies: `ez_e` scales the
/// previous Ez, `ez_h` the curl of H.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UpdateCoefficients {
    pub ez_e: f64,
    pub ez_h: f64,
    pub hx_e: f64,
    pub hx_h: f64,
    pub hy_e: f64,
    pub hy_h: f64,
}

impl UpdateCoefficients {
    /// Fully absorbing cell. Fields in it are zeroed on the next update.
    pub const VOID: Self = Self {
        ez_e: 0.0,
        ez_h: 0.0,
        hx_e: 0.0,
        hx_h: 0.0,
        hy_e: 0.0,
        hy_h: 0.0,
    };

    pub fn vacuum(medium: &Medium) -> Self {
        Self {
            ez_e: 1.0,
            ez_h: medium.courant * medium.impedance,
            hx_e: medium.courant / medium.impedance,
            hx_h: 1.0,
            hy_e: medium.courant / medium.impedance,
            hy_h: 1.0,
        }
    }

    /// Lossy cell with permittivity and permeability scaled by
    /// `1 / geometric_factor^2`.
    pub fn lossy(medium: &Medium, geometric_factor: f64) -> Self {
        let scale = 1.0 / (geometric_factor * geometric_factor);
        let permittivity = medium.impedance * scale;
        let permeability = scale;
        let attenuation = (1.0 - medium.loss) / (1.0 + medium.loss);
        let h_e = medium.courant * (permeability / medium.impedance) / (1.0 + medium.loss);

        Self {
            ez_e: attenuation,
            ez_h: medium.courant * permittivity / (1.0 + medium.loss),
            hx_e: h_e,
            hx_h: attenuation,
            hy_e: h_e,
            hy_h: attenuation,
        }
    }

    pub fn for_cell(
        medium: &Medium,
        scatterer: &Scatterer,
        model: MaterialModel,
        point: &Point2<usize>,
    ) -> Self {
        let distance = scatterer.distance(point);
        let inside = distance < scatterer.radius;

        match model {
            MaterialModel::SimpleVoid => {
                if inside {
                    Self::VOID
                }
                else {
                    Self::vacuum(medium)
                }
            }
            MaterialModel::LossyDispersive => {
                let factor = if inside {
                    geometric_factor(scatterer.radius, distance)
                }
                else {
                    1.0
                };
                Self::lossy(medium, factor)
            }
        }
    }
}

/// Coefficients for every cell of the 2-D grid. Built once before time
/// stepping.
#[derive(Clone, derive_more::Debug)]
pub struct CoefficientMap {
    strider: Strider,
    #[debug(ignore)]
    coefficients: Lattice<UpdateCoefficients>,
}

impl CoefficientMap {
    pub fn new(
        strider: &Strider,
        medium: &Medium,
        scatterer: &Scatterer,
        model: MaterialModel,
    ) -> Self {
        let coefficients = Lattice::from_fn(strider, |_index, point| {
            UpdateCoefficients::for_cell(medium, scatterer, model, &point)
        });

        tracing::debug!(
            size = ?strider.size(),
            ?model,
            void_cells = coefficients
                .as_slice()
                .iter()
                .filter(|cell| **cell == UpdateCoefficients::VOID)
                .count(),
            "built coefficient map"
        );

        Self {
            strider: *strider,
            coefficients,
        }
    }

    /// Same coefficients everywhere.
    pub fn uniform(strider: &Strider, coefficients: UpdateCoefficients) -> Self {
        Self {
            strider: *strider,
            coefficients: Lattice::from_value(strider, coefficients),
        }
    }

    pub fn strider(&self) -> &Strider {
        &self.strider
    }

    pub fn at(&self, point: &Point2<usize>) -> Option<&UpdateCoefficients> {
        self.coefficients.get_point(&self.strider, point)
    }

    pub fn as_slice(&self) -> &[UpdateCoefficients] {
        self.coefficients.as_slice()
    }
}

impl Index<usize> for CoefficientMap {
    type Output = UpdateCoefficients;

    fn index(&self, index: usize) -> &Self::Output {
        &self.coefficients[index]
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use crate::fdtd::{
        coefficients::{
            CoefficientMap,
            UpdateCoefficients,
        },
        lattice::Strider,
        material::{
            MaterialModel,
            Medium,
            Scatterer,
        },
    };

    fn default_map(model: MaterialModel, medium: &Medium) -> CoefficientMap {
        CoefficientMap::new(
            &Strider::square(300),
            medium,
            &Scatterer::default(),
            model,
        )
    }

    #[test]
    fn void_inside_vacuum_outside() {
        let medium = Medium::default();
        let scatterer = Scatterer::default();
        let map = default_map(MaterialModel::SimpleVoid, &medium);

        let courant = medium.courant;
        for (index, point) in map.strider().iter(..) {
            let cell = map[index];
            if scatterer.distance(&point) < scatterer.radius {
                assert_eq!(cell, UpdateCoefficients::VOID, "at {point:?}");
            }
            else {
                assert_eq!(cell.ez_h, courant * 377.0);
                assert_eq!(cell.ez_e, 1.0);
                assert_eq!(cell.hy_h, 1.0);
                assert_eq!(cell.hy_e, courant / 377.0);
                assert_eq!(cell.hx_e, courant / 377.0);
                assert_eq!(cell.hx_h, 1.0);
            }
        }
    }

    #[test]
    fn circle_boundary_is_exclusive() {
        let map = default_map(MaterialModel::SimpleVoid, &Medium::default());

        // exactly `radius` away from (150, 100)
        let on_circle = map.at(&Point2::new(190, 100)).unwrap();
        assert_ne!(*on_circle, UpdateCoefficients::VOID);

        let inside = map.at(&Point2::new(189, 100)).unwrap();
        assert_eq!(*inside, UpdateCoefficients::VOID);

        let center = map.at(&Point2::new(150, 100)).unwrap();
        assert_eq!(*center, UpdateCoefficients::VOID);
    }

    #[test]
    fn lossy_model_without_loss_is_vacuum_outside() {
        let medium = Medium::default();
        let map = default_map(MaterialModel::LossyDispersive, &medium);

        let corner = map.at(&Point2::new(0, 0)).unwrap();
        let vacuum = UpdateCoefficients::vacuum(&medium);
        assert!((corner.ez_h - vacuum.ez_h).abs() < 1e-12);
        assert!((corner.hy_e - vacuum.hy_e).abs() < 1e-15);
        assert_eq!(corner.ez_e, 1.0);
        assert_eq!(corner.hx_h, 1.0);
    }

    #[test]
    fn lossy_model_is_finite_inside() {
        let medium = Medium {
            loss: 0.01,
            ..Medium::default()
        };
        let map = default_map(MaterialModel::LossyDispersive, &medium);

        for cell in map.as_slice() {
            assert!(cell.ez_e.is_finite() && cell.ez_h.is_finite());
            assert!(cell.hx_e.is_finite() && cell.hx_h.is_finite());
            assert!(cell.hy_e.is_finite() && cell.hy_h.is_finite());
        }

        let center = map.at(&Point2::new(150, 100)).unwrap();
        assert!(center.ez_h > 0.0);
        assert!(center.ez_e < 1.0);
    }
}

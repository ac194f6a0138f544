//! 1-D FDTD line producing the incident plane wave for the TFSF boundary.

use crate::fdtd::{
    material::Medium,
    source::SourceKind,
};

/// Update coefficients at one position of the line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineCoefficients {
    pub ez_e: f64,
    pub ez_h: f64,
    pub hy_e: f64,
    pub hy_h: f64,
}

impl LineCoefficients {
    pub fn vacuum(medium: &Medium) -> Self {
        Self {
            ez_e: 1.0,
            ez_h: medium.courant * medium.impedance,
            hy_e: medium.courant / medium.impedance,
            hy_h: 1.0,
        }
    }
}

/// Ez and Hy of the incident-wave line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineField {
    ez: Box<[f64]>,
    hy: Box<[f64]>,
}

impl LineField {
    pub fn new(len: usize) -> Self {
        Self {
            ez: vec![0.0; len].into_boxed_slice(),
            hy: vec![0.0; len].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.ez.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ez.is_empty()
    }

    pub fn ez(&self) -> &[f64] {
        &self.ez
    }

    pub fn hy(&self) -> &[f64] {
        &self.hy
    }

    pub fn ez_mut(&mut self) -> &mut [f64] {
        &mut self.ez
    }

    pub fn hy_mut(&mut self) -> &mut [f64] {
        &mut self.hy
    }

    /// Sum of squared field values. Not scaled to physical units.
    pub fn energy(&self) -> f64 {
        self.ez.iter().chain(self.hy.iter()).map(|x| x * x).sum()
    }

    pub fn update_magnetic(&mut self, coefficients: &[LineCoefficients]) {
        let n = self.len();
        for x in 1..n.saturating_sub(1) {
            let c = &coefficients[x];
            self.hy[x] = c.hy_h * self.hy[x] + c.hy_e * (self.ez[x + 1] - self.ez[x]);
        }
    }

    pub fn update_electric(&mut self, coefficients: &[LineCoefficients]) {
        let n = self.len();
        for x in 1..n.saturating_sub(1) {
            let c = &coefficients[x];
            self.ez[x] = c.ez_e * self.ez[x] + c.ez_h * (self.hy[x] - self.hy[x - 1]);
        }
    }
}

/// The auxiliary line: its coefficients and the hard source driving it.
#[derive(Clone, derive_more::Debug)]
pub struct AuxiliaryLine {
    #[debug(ignore)]
    coefficients: Box<[LineCoefficients]>,
    medium: Medium,
    source: SourceKind,
    source_position: usize,
}

impl AuxiliaryLine {
    pub fn new(len: usize, medium: &Medium, source: SourceKind, source_position: usize) -> Self {
        Self {
            coefficients: vec![LineCoefficients::vacuum(medium); len].into_boxed_slice(),
            medium: *medium,
            source,
            source_position,
        }
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn coefficients(&self) -> &[LineCoefficients] {
        &self.coefficients
    }

    pub fn source(&self) -> &SourceKind {
        &self.source
    }

    pub fn source_position(&self) -> usize {
        self.source_position
    }

    /// Advances the line by one step and sets the source cell to the source
    /// value at `tick`.
    pub fn advance(&self, field: &mut LineField, tick: usize) {
        field.update_magnetic(&self.coefficients);
        field.update_electric(&self.coefficients);
        field.ez_mut()[self.source_position] =
            self.source.evaluate(tick as f64, self.medium.courant);
    }
}

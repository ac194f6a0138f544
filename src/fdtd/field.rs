use nalgebra::Point2;
use serde::{
    Deserialize,
    Serialize,
};

use crate::fdtd::{
    lattice::{
        Lattice,
        Strider,
    },
    line::LineField,
};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum FieldComponent {
    Ez,
    Hx,
    Hy,
}

/// A field value that is not finite or exceeds the divergence threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Divergence {
    pub component: FieldComponent,
    pub point: Point2<usize>,
    pub value: f64,
}

/// All time-dependent field values of a run.
#[derive(Clone, derive_more::Debug)]
pub struct FieldState {
    strider: Strider,
    #[debug(ignore)]
    ez: Lattice<f64>,
    #[debug(ignore)]
    hx: Lattice<f64>,
    #[debug(ignore)]
    hy: Lattice<f64>,
    #[debug(ignore)]
    line: LineField,
    tick: usize,
}

/// Mutable borrows of the individual field arrays.
#[derive(Debug)]
pub struct FieldPartsMut<'a> {
    pub strider: &'a Strider,
    pub ez: &'a mut [f64],
    pub hx: &'a mut [f64],
    pub hy: &'a mut [f64],
    pub line: &'a mut LineField,
}

impl FieldState {
    /// All fields zero at tick 0. The incident-wave line has as many cells as
    /// a grid row.
    pub fn new(strider: &Strider) -> Self {
        Self {
            strider: *strider,
            ez: Lattice::from_default(strider),
            hx: Lattice::from_default(strider),
            hy: Lattice::from_default(strider),
            line: LineField::new(strider.row_len()),
            tick: 0,
        }
    }

    pub fn strider(&self) -> &Strider {
        &self.strider
    }

    pub fn tick(&self) -> usize {
        self.tick
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    pub fn component(&self, component: FieldComponent) -> &[f64] {
        match component {
            FieldComponent::Ez => self.ez.as_slice(),
            FieldComponent::Hx => self.hx.as_slice(),
            FieldComponent::Hy => self.hy.as_slice(),
        }
    }

    pub fn component_mut(&mut self, component: FieldComponent) -> &mut [f64] {
        match component {
            FieldComponent::Ez => self.ez.as_mut_slice(),
            FieldComponent::Hx => self.hx.as_mut_slice(),
            FieldComponent::Hy => self.hy.as_mut_slice(),
        }
    }

    pub fn at(&self, component: FieldComponent, point: &Point2<usize>) -> Option<f64> {
        let index = self.strider.index(point)?;
        Some(self.component(component)[index])
    }

    pub fn set(&mut self, component: FieldComponent, point: &Point2<usize>, value: f64) -> bool {
        if let Some(index) = self.strider.index(point) {
            self.component_mut(component)[index] = value;
            true
        }
        else {
            false
        }
    }

    pub fn ez(&self) -> &[f64] {
        self.ez.as_slice()
    }

    pub fn hx(&self) -> &[f64] {
        self.hx.as_slice()
    }

    pub fn hy(&self) -> &[f64] {
        self.hy.as_slice()
    }

    pub fn line(&self) -> &LineField {
        &self.line
    }

    pub fn line_mut(&mut self) -> &mut LineField {
        &mut self.line
    }

    pub fn parts_mut(&mut self) -> FieldPartsMut<'_> {
        FieldPartsMut {
            strider: &self.strider,
            ez: self.ez.as_mut_slice(),
            hx: self.hx.as_mut_slice(),
            hy: self.hy.as_mut_slice(),
            line: &mut self.line,
        }
    }

    /// Sum of squared 2-D field values. Not scaled to physical units.
    pub fn energy(&self) -> f64 {
        [&self.ez, &self.hx, &self.hy]
            .into_iter()
            .flat_map(|lattice| lattice.as_slice())
            .map(|x| x * x)
            .sum()
    }

    /// Returns the first value (Ez, then Hx, then Hy) that is not finite or
    /// whose magnitude exceeds `threshold`.
    pub fn find_divergence(&self, threshold: f64) -> Option<Divergence> {
        [
            (FieldComponent::Ez, &self.ez),
            (FieldComponent::Hx, &self.hx),
            (FieldComponent::Hy, &self.hy),
        ]
        .into_iter()
        .find_map(|(component, lattice)| {
            lattice
                .as_slice()
                .iter()
                .position(|value| !value.is_finite() || value.abs() > threshold)
                .map(|index| {
                    Divergence {
                        component,
                        point: self.strider.point_unchecked(index),
                        value: lattice[index],
                    }
                })
        })
    }
}

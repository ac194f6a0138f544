//! Total-field/scattered-field boundary.
//!
//! The incident wave travels along +x on the auxiliary line. Inside the box
//! spanned by [`Bound`] the grid holds the total field, outside only the
//! scattered field.

use nalgebra::Point2;
use serde::{
    Deserialize,
    Serialize,
};

use crate::fdtd::{
    coefficients::CoefficientMap,
    field::{
        FieldPartsMut,
        FieldState,
    },
    line::AuxiliaryLine,
};

/// Corners of the total-field region, both inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bound {
    pub first: Point2<usize>,
    pub last: Point2<usize>,
}

impl Default for Bound {
    fn default() -> Self {
        Self {
            first: Point2::new(10, 10),
            last: Point2::new(290, 290),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TfsfBoundary {
    bound: Bound,
    line: AuxiliaryLine,
}

impl TfsfBoundary {
    /// `bound.first` must be at least 1 in both coordinates, `bound.last` must
    /// be inside the grid and the line must be as long as a grid row.
    pub fn new(bound: Bound, line: AuxiliaryLine) -> Self {
        Self { bound, line }
    }

    pub fn bound(&self) -> &Bound {
        &self.bound
    }

    pub fn line(&self) -> &AuxiliaryLine {
        &self.line
    }

    /// Runs the whole injection for one step: magnetic correction, advancing
    /// the incident-wave line to `tick`, electric correction.
    pub fn inject(&self, field: &mut FieldState, coefficients: &CoefficientMap, tick: usize) {
        self.correct_magnetic(field, coefficients);
        self.line.advance(field.line_mut(), tick);
        self.correct_electric(field, coefficients);
    }

    /// Corrects Hy on the left and right edges and Hx on the bottom and top
    /// edges with the incident Ez.
    pub fn correct_magnetic(&self, field: &mut FieldState, coefficients: &CoefficientMap) {
        let FieldPartsMut {
            strider,
            hx,
            hy,
            line,
            ..
        } = field.parts_mut();
        let n = strider.row_len();
        let Bound { first, last } = self.bound;
        let incident = line.ez();

        // right
        let x = last.x;
        for y in first.y..=last.y {
            let index = x + y * n;
            hy[index] += coefficients[index].hy_e * incident[x];
        }

        // left
        let x = first.x - 1;
        for y in first.y..=last.y {
            let index = x + y * n;
            hy[index] -= coefficients[index].hy_e * incident[x + 1];
        }

        // top
        let y = last.y;
        for x in first.x..=last.x {
            let index = x + y * n;
            hx[index] -= coefficients[index].hx_e * incident[x];
        }

        // bottom
        let y = first.y - 1;
        for x in first.x..=last.x {
            let index = x + y * n;
            hx[index] += coefficients[index].hx_e * incident[x];
        }
    }

    /// Corrects Ez on the left and right edges with the incident Hy.
    pub fn correct_electric(&self, field: &mut FieldState, coefficients: &CoefficientMap) {
        let FieldPartsMut {
            strider, ez, line, ..
        } = field.parts_mut();
        let n = strider.row_len();
        let Bound { first, last } = self.bound;
        let incident = line.hy();

        // right
        let x = last.x;
        for y in first.y..=last.y {
            let index = x + y * n;
            ez[index] += coefficients[index].ez_h * incident[x];
        }

        // left
        let x = first.x;
        for y in first.y..=last.y {
            let index = x + y * n;
            ez[index] -= coefficients[index].ez_h * incident[x - 1];
        }
    }
}

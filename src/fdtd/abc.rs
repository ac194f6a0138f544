//! Second-order Mur absorbing boundary on the four grid edges.
//!
//! Each edge remembers Ez at the three outermost cells of the two previous
//! steps. The new edge value is extrapolated from those and the current
//! interior values.

use serde::{
    Deserialize,
    Serialize,
};
use strum::IntoEnumIterator;

use crate::fdtd::{
    coefficients::UpdateCoefficients,
    field::{
        FieldComponent,
        FieldState,
    },
    lattice::Strider,
};

/// Number of cells from the edge inward that are remembered.
pub const HISTORY_DEPTH: usize = 3;

/// The edges in the order they are processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum Edge {
    Top,
    Bottom,
    Right,
    Left,
}

impl Edge {
    /// Buffer index of the cell at `position` along the edge and `offset`
    /// cells inward.
    pub fn cell(&self, strider: &Strider, position: usize, offset: usize) -> usize {
        let size = strider.size();
        let (x, y) = match self {
            Edge::Top => (position, size.y - 1 - offset),
            Edge::Bottom => (position, offset),
            Edge::Right => (size.x - 1 - offset, position),
            Edge::Left => (offset, position),
        };
        x + y * strider.row_len()
    }

    pub fn len(&self, strider: &Strider) -> usize {
        let size = strider.size();
        match self {
            Edge::Top | Edge::Bottom => size.x,
            Edge::Right | Edge::Left => size.y,
        }
    }
}

/// How the four corner cells, which lie on two edges each, are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerTreatment {
    /// Every edge covers its full length. Corners are updated by the top or
    /// bottom pass first and overwritten by the right or left pass.
    #[default]
    Sequential,

    /// Corners are left out of all edge passes and keep their value.
    Skip,
}

/// Mur coefficients, derived from the medium at the reference cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MurCoefficients {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
}

impl MurCoefficients {
    /// `None` if the reference cell does not propagate waves (e.g. void).
    pub fn new(reference: &UpdateCoefficients) -> Option<Self> {
        let s = (reference.ez_h * reference.hy_e).sqrt();
        if !s.is_finite() || s <= 0.0 {
            return None;
        }

        let denominator = 1.0 / s + 2.0 + s;
        Some(Self {
            c1: -(1.0 / s - 2.0 + s) / denominator,
            c2: -2.0 * (s - 1.0 / s) / denominator,
            c3: 4.0 * (s + 1.0 / s) / denominator,
        })
    }
}

/// Past Ez values along one edge, indexed `[position][offset][level]`, where
/// level 0 is the previous step and level 1 the one before.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeHistory {
    values: Box<[[[f64; 2]; HISTORY_DEPTH]]>,
}

impl EdgeHistory {
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![[[0.0; 2]; HISTORY_DEPTH]; len].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, position: usize, offset: usize, level: usize) -> f64 {
        self.values[position][offset][level]
    }

    pub fn fill(&mut self, value: f64) {
        self.values.fill([[value; 2]; HISTORY_DEPTH]);
    }
}

/// History buffers of all four edges.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryHistory {
    top: EdgeHistory,
    bottom: EdgeHistory,
    right: EdgeHistory,
    left: EdgeHistory,
}

impl BoundaryHistory {
    pub fn new(strider: &Strider) -> Self {
        Self {
            top: EdgeHistory::new(Edge::Top.len(strider)),
            bottom: EdgeHistory::new(Edge::Bottom.len(strider)),
            right: EdgeHistory::new(Edge::Right.len(strider)),
            left: EdgeHistory::new(Edge::Left.len(strider)),
        }
    }

    pub fn edge(&self, edge: Edge) -> &EdgeHistory {
        match edge {
            Edge::Top => &self.top,
            Edge::Bottom => &self.bottom,
            Edge::Right => &self.right,
            Edge::Left => &self.left,
        }
    }

    pub fn edge_mut(&mut self, edge: Edge) -> &mut EdgeHistory {
        match edge {
            Edge::Top => &mut self.top,
            Edge::Bottom => &mut self.bottom,
            Edge::Right => &mut self.right,
            Edge::Left => &mut self.left,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AbsorbingBoundary {
    strider: Strider,
    coefficients: MurCoefficients,
    corner_treatment: CornerTreatment,
    history: BoundaryHistory,
}

impl AbsorbingBoundary {
    /// The grid must be at least [`HISTORY_DEPTH`] cells wide in both
    /// directions.
    pub fn new(
        strider: &Strider,
        coefficients: MurCoefficients,
        corner_treatment: CornerTreatment,
    ) -> Self {
        Self {
            strider: *strider,
            coefficients,
            corner_treatment,
            history: BoundaryHistory::new(strider),
        }
    }

    pub fn coefficients(&self) -> &MurCoefficients {
        &self.coefficients
    }

    pub fn history(&self) -> &BoundaryHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut BoundaryHistory {
        &mut self.history
    }

    /// Updates Ez on all edges and records the new history. Must run once
    /// per step, after the E-update.
    pub fn apply(&mut self, field: &mut FieldState) {
        for edge in Edge::iter() {
            self.apply_edge(edge, field);
        }
    }

    fn apply_edge(&mut self, edge: Edge, field: &mut FieldState) {
        let MurCoefficients { c1, c2, c3 } = self.coefficients;
        let strider = self.strider;
        let len = edge.len(&strider);
        let positions = match self.corner_treatment {
            CornerTreatment::Sequential => 0..len,
            CornerTreatment::Skip => 1..len.saturating_sub(1),
        };

        let ez = field.component_mut(FieldComponent::Ez);
        let history = &mut self.history.edge_mut(edge).values;

        for position in positions {
            let cell = |offset| edge.cell(&strider, position, offset);
            let h = &mut history[position];

            ez[cell(0)] = c1 * (ez[cell(2)] + h[0][1])
                + c2 * (h[0][0] + h[2][0] - ez[cell(1)] - h[1][1])
                + c3 * h[1][0]
                - h[2][1];

            for (offset, h) in h.iter_mut().enumerate() {
                h[1] = h[0];
                h[0] = ez[cell(offset)];
            }
        }
    }
}

//! 2-D TM finite-difference time-domain solver with a total-field/scattered-field
//! plane-wave source and a second-order Mur absorbing boundary.

pub mod abc;
pub mod coefficients;
pub mod field;
pub mod lattice;
pub mod line;
pub mod material;
pub mod simulation;
pub mod source;
pub mod tfsf;
pub mod update;

pub use self::{
    abc::CornerTreatment,
    field::{
        FieldComponent,
        FieldState,
    },
    material::{
        MaterialModel,
        Medium,
        Scatterer,
    },
    simulation::Simulation,
    source::SourceKind,
    tfsf::Bound,
};

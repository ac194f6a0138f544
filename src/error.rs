use std::path::PathBuf;

use nalgebra::Point2;

use crate::fdtd::{
    field::FieldComponent,
    tfsf::Bound,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration")]
    Config(#[from] ConfigError),

    #[error("Could not read config file: {path}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file")]
    ParseConfig(#[from] toml::de::Error),

    #[error("Simulation diverged at tick {tick}: {component} = {value} at {point:?}")]
    Instability {
        tick: usize,
        component: FieldComponent,
        point: Point2<usize>,
        value: f64,
    },

    #[error("IO error")]
    Io(#[from] std::io::Error),
}

/// Run parameters that can not produce a valid simulation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid size {size} is too small, need at least {min}")]
    GridTooSmall { size: usize, min: usize },

    #[error("TFSF box {bound:?} does not fit into a grid of size {size}")]
    TfsfOutsideGrid { bound: Bound, size: usize },

    #[error("TFSF box {bound:?} is inverted")]
    TfsfInverted { bound: Bound },

    #[error("Scatterer radius {radius} must be positive and less than grid size {size}")]
    InvalidRadius { radius: f64, size: usize },

    #[error("Scatterer center {center:?} is outside of a grid of size {size}")]
    ScattererOutsideGrid { center: Point2<usize>, size: usize },

    #[error("Scatterer covers the absorbing boundary's reference cell (0, 0)")]
    ScattererCoversReferenceCell,

    #[error("Source position {position} is outside of the incident-wave line of length {len}")]
    SourceOutsideLine { position: usize, len: usize },

    #[error("Invalid courant number: {value}")]
    InvalidCourant { value: f64 },

    #[error("Invalid impedance: {value}")]
    InvalidImpedance { value: f64 },

    #[error("Loss {value} must be in [0, 1)")]
    InvalidLoss { value: f64 },

    #[error("Sample stride must not be 0")]
    ZeroSampleStride,

    #[error("Invalid divergence threshold: {value}")]
    InvalidDivergenceThreshold { value: f64 },
}

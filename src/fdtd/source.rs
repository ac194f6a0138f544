use std::f64::consts::{
    PI,
    TAU,
};

use serde::{
    Deserialize,
    Serialize,
};

/// Waveform driving the incident-wave line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    Ricker {
        /// Delay in cells.
        location: f64,
        points_per_wavelength: f64,
    },
    SinusoidalPlaneWave {
        /// Phase offset in cells.
        location: f64,
        points_per_wavelength: f64,
    },
}

impl Default for SourceKind {
    fn default() -> Self {
        Self::Ricker {
            location: 0.0,
            points_per_wavelength: 20.0,
        }
    }
}

impl SourceKind {
    pub fn evaluate(&self, time: f64, courant: f64) -> f64 {
        match *self {
            Self::Ricker {
                location,
                points_per_wavelength,
            } => ricker_wavelet(time, location, courant, points_per_wavelength),
            Self::SinusoidalPlaneWave {
                location,
                points_per_wavelength,
            } => plane_wave(time, location, courant, points_per_wavelength),
        }
    }
}

/// Ricker wavelet with 20 points per wavelength at its peak frequency.
pub fn ricker(time: f64, location: f64, courant: f64) -> f64 {
    ricker_wavelet(time, location, courant, 20.0)
}

/// Ricker wavelet peaking with value 1 at
/// `time = (points_per_wavelength + location) / courant`.
pub fn ricker_wavelet(time: f64, location: f64, courant: f64, points_per_wavelength: f64) -> f64 {
    let argument = PI * ((courant * time - location) / points_per_wavelength - 1.0);
    let argument = argument * argument;
    (1.0 - 2.0 * argument) * (-argument).exp()
}

pub fn plane_wave(time: f64, location: f64, courant: f64, points_per_wavelength: f64) -> f64 {
    (TAU / points_per_wavelength * (courant * time - location)).sin()
}

use std::path::Path;

use nalgebra::Point2;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    error::{
        ConfigError,
        Error,
    },
    fdtd::{
        abc::{
            CornerTreatment,
            HISTORY_DEPTH,
        },
        coefficients::UpdateCoefficients,
        line::LineCoefficients,
        material::{
            MaterialModel,
            Medium,
            Scatterer,
        },
        source::SourceKind,
        tfsf::Bound,
    },
};

/// Smallest grid side for which the boundary histories of opposite edges do
/// not overlap.
pub const MIN_GRID_SIZE: usize = 2 * HISTORY_DEPTH;

/// Parameters of a single run. Missing fields take their default value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Side length of the square grid in cells.
    pub size: usize,

    /// Number of time steps to run.
    pub steps: usize,

    pub impedance: f64,
    pub courant: f64,
    pub loss: f64,

    /// A sample block is written every `sample_stride` steps, containing
    /// every `sample_stride`-th cell in both directions.
    pub sample_stride: usize,

    /// Field magnitude above which the run is aborted.
    pub divergence_threshold: f64,

    pub material_model: MaterialModel,
    pub scatterer: Scatterer,
    pub source: SourceConfig,
    pub tfsf: TfsfConfig,
    pub abc: AbcConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            size: 300,
            steps: 3000,
            impedance: Medium::VACUUM.impedance,
            courant: Medium::VACUUM.courant,
            loss: Medium::VACUUM.loss,
            sample_stride: 5,
            divergence_threshold: 1e6,
            material_model: MaterialModel::default(),
            scatterer: Scatterer::default(),
            source: SourceConfig::default(),
            tfsf: TfsfConfig::default(),
            abc: AbcConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Cell of the incident-wave line that is driven by the source.
    pub position: usize,
    pub waveform: SourceKind,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            position: 10,
            waveform: SourceKind::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfsfConfig {
    pub enabled: bool,
    pub first: Point2<usize>,
    pub last: Point2<usize>,
}

impl TfsfConfig {
    pub fn bound(&self) -> Bound {
        Bound {
            first: self.first,
            last: self.last,
        }
    }
}

impl Default for TfsfConfig {
    fn default() -> Self {
        let Bound { first, last } = Bound::default();
        Self {
            enabled: true,
            first,
            last,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbcConfig {
    pub enabled: bool,
    pub corners: CornerTreatment,
}

impl Default for AbcConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            corners: CornerTreatment::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML config.
    pub fn from_toml_str(toml: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Reading config file");

        let toml = std::fs::read_to_string(path).map_err(|source| {
            Error::ReadConfig {
                path: path.to_owned(),
                source,
            }
        })?;
        Self::from_toml_str(&toml)
    }

    pub fn medium(&self) -> Medium {
        Medium {
            impedance: self.impedance,
            courant: self.courant,
            loss: self.loss,
        }
    }

    /// Bytes needed for the field state, the coefficients and the boundary
    /// histories.
    pub fn memory_usage_estimate(&self) -> usize {
        let cells = self.size * self.size;
        let fields = 3 * cells * std::mem::size_of::<f64>();
        let coefficients = cells * std::mem::size_of::<UpdateCoefficients>();
        let line = 2 * self.size * std::mem::size_of::<f64>()
            + self.size * std::mem::size_of::<LineCoefficients>();
        let history = 4 * self.size * HISTORY_DEPTH * 2 * std::mem::size_of::<f64>();
        fields + coefficients + line + history
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.size;
        if size < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall {
                size,
                min: MIN_GRID_SIZE,
            });
        }

        if !(self.courant.is_finite() && self.courant > 0.0) {
            return Err(ConfigError::InvalidCourant {
                value: self.courant,
            });
        }
        if !(self.impedance.is_finite() && self.impedance > 0.0) {
            return Err(ConfigError::InvalidImpedance {
                value: self.impedance,
            });
        }
        if !(0.0..1.0).contains(&self.loss) {
            return Err(ConfigError::InvalidLoss { value: self.loss });
        }

        let radius = self.scatterer.radius;
        if !(radius > 0.0 && radius < size as f64) {
            return Err(ConfigError::InvalidRadius { radius, size });
        }
        let center = self.scatterer.center;
        if center.x >= size || center.y >= size {
            return Err(ConfigError::ScattererOutsideGrid { center, size });
        }
        if self.abc.enabled && self.scatterer.contains(&Point2::origin()) {
            return Err(ConfigError::ScattererCoversReferenceCell);
        }

        if self.tfsf.enabled {
            let bound = self.tfsf.bound();
            if bound.first.x > bound.last.x || bound.first.y > bound.last.y {
                return Err(ConfigError::TfsfInverted { bound });
            }
            // the outer corrections touch the cells at `first - 1`, and the
            // box must stay inside the interior updated by the E-update.
            if bound.first.x < 1
                || bound.first.y < 1
                || bound.last.x > size - 2
                || bound.last.y > size - 2
            {
                return Err(ConfigError::TfsfOutsideGrid { bound, size });
            }
            if self.source.position >= size {
                return Err(ConfigError::SourceOutsideLine {
                    position: self.source.position,
                    len: size,
                });
            }
        }

        if self.sample_stride == 0 {
            return Err(ConfigError::ZeroSampleStride);
        }
        if !(self.divergence_threshold > 0.0) {
            return Err(ConfigError::InvalidDivergenceThreshold {
                value: self.divergence_threshold,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_1_SQRT_2;

    use nalgebra::Point2;

    use crate::{
        config::SimulationConfig,
        error::{
            ConfigError,
            Error,
        },
        fdtd::{
            abc::CornerTreatment,
            material::MaterialModel,
            source::SourceKind,
            tfsf::Bound,
        },
    };

    #[test]
    fn defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.size, 300);
        assert_eq!(config.steps, 3000);
        assert_eq!(config.impedance, 377.0);
        assert_eq!(config.courant, FRAC_1_SQRT_2);
        assert_eq!(config.scatterer.center, Point2::new(150, 100));
        assert_eq!(config.scatterer.radius, 40.0);
        assert_eq!(config.source.position, 10);
        assert_eq!(config.tfsf.bound(), Bound::default());
        assert_eq!(config.sample_stride, 5);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn empty_toml_is_default() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn parses_partial_toml() {
        let config = SimulationConfig::from_toml_str(
            r#"
            size = 100
            steps = 50
            material_model = "lossy_dispersive"
            loss = 0.01

            [scatterer]
            center = [50, 60]
            radius = 10.0

            [source.waveform]
            kind = "sinusoidal_plane_wave"
            location = 0.0
            points_per_wavelength = 40.0

            [tfsf]
            first = [5, 5]
            last = [90, 90]

            [abc]
            corners = "skip"
            "#,
        )
        .unwrap();

        assert_eq!(config.size, 100);
        assert_eq!(config.steps, 50);
        assert_eq!(config.material_model, MaterialModel::LossyDispersive);
        assert_eq!(config.scatterer.center, Point2::new(50, 60));
        assert_eq!(
            config.source.waveform,
            SourceKind::SinusoidalPlaneWave {
                location: 0.0,
                points_per_wavelength: 40.0
            }
        );
        assert_eq!(config.source.position, 10);
        assert!(config.tfsf.enabled);
        assert_eq!(config.tfsf.last, Point2::new(90, 90));
        assert_eq!(config.abc.corners, CornerTreatment::Skip);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let result = SimulationConfig::from_toml_str("size = \"large\"");
        assert!(matches!(result, Err(Error::ParseConfig(_))));
    }

    #[test]
    fn rejects_small_grid() {
        let config = SimulationConfig {
            size: 4,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooSmall { size: 4, .. })
        ));
    }

    #[test]
    fn rejects_tfsf_box_outside_grid() {
        let mut config = SimulationConfig {
            size: 200,
            ..Default::default()
        };
        config.scatterer.center = Point2::new(100, 100);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TfsfOutsideGrid { size: 200, .. })
        ));

        config.tfsf.enabled = false;
        assert_eq!(config.validate(), Ok(()));

        config.tfsf.enabled = true;
        config.tfsf.last = Point2::new(190, 190);
        config.tfsf.first = Point2::new(0, 10);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TfsfOutsideGrid { .. })
        ));
    }

    #[test]
    fn rejects_inverted_tfsf_box() {
        let mut config = SimulationConfig::default();
        config.tfsf.first = Point2::new(100, 10);
        config.tfsf.last = Point2::new(50, 290);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TfsfInverted { .. })
        ));
    }

    #[test]
    fn rejects_bad_radius() {
        for radius in [0.0, -1.0, 300.0, f64::NAN] {
            let mut config = SimulationConfig::default();
            config.scatterer.radius = radius;
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidRadius { .. })),
                "radius {radius}"
            );
        }
    }

    #[test]
    fn rejects_scatterer_outside_grid() {
        let mut config = SimulationConfig::default();
        config.scatterer.center = Point2::new(150, 300);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ScattererOutsideGrid { .. })
        ));
    }

    #[test]
    fn rejects_scatterer_covering_reference_cell() {
        let mut config = SimulationConfig::default();
        config.scatterer.center = Point2::new(20, 20);
        config.scatterer.radius = 30.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ScattererCoversReferenceCell)
        );

        config.abc.enabled = false;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_source_outside_line() {
        let mut config = SimulationConfig::default();
        config.source.position = 300;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SourceOutsideLine { position: 300, .. })
        ));
    }

    #[test]
    fn rejects_bad_medium() {
        let config = SimulationConfig {
            courant: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCourant { .. })
        ));

        let config = SimulationConfig {
            impedance: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidImpedance { .. })
        ));

        let config = SimulationConfig {
            loss: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLoss { .. })
        ));
    }

    #[test]
    fn rejects_zero_stride() {
        let config = SimulationConfig {
            sample_stride: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSampleStride));
    }

    #[test]
    fn memory_estimate_covers_fields_and_coefficients() {
        let config = SimulationConfig {
            size: 100,
            ..Default::default()
        };
        // 3 field components and 6 coefficients per cell
        assert!(config.memory_usage_estimate() >= 100 * 100 * 9 * 8);
    }

    #[test]
    fn unstable_courant_is_accepted() {
        let config = SimulationConfig {
            courant: 0.9,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }
}

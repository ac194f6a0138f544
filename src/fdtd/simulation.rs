use std::time::Instant;

use nalgebra::Point2;

use crate::{
    config::SimulationConfig,
    error::{
        ConfigError,
        Error,
    },
    fdtd::{
        abc::{
            AbsorbingBoundary,
            MurCoefficients,
        },
        coefficients::CoefficientMap,
        field::FieldState,
        lattice::Strider,
        line::AuxiliaryLine,
        material::Medium,
        tfsf::TfsfBoundary,
        update::{
            RowForEach,
            SingleThreaded,
            update_electric,
            update_magnetic,
        },
    },
    output::SampleSink,
    util::format_size,
};

/// A complete 2-D run: field state, material and boundaries.
///
/// Each [`step`](Self::step) runs H-update, TFSF injection, E-update and the
/// absorbing boundary, then advances the tick.
#[derive(Debug)]
pub struct Simulation<Threading = SingleThreaded> {
    medium: Medium,
    field: FieldState,
    coefficients: CoefficientMap,
    tfsf: Option<TfsfBoundary>,
    abc: Option<AbsorbingBoundary>,
    steps: usize,
    sample_stride: usize,
    divergence_threshold: f64,
    threading: Threading,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Result<Self, Error> {
        config.validate()?;

        let medium = config.medium();
        if medium.courant > Medium::MAX_STABLE_COURANT {
            tracing::warn!(
                courant = medium.courant,
                max = Medium::MAX_STABLE_COURANT,
                "courant number is above the stability limit"
            );
        }

        tracing::debug!(
            size = config.size,
            memory_required = %format_size(config.memory_usage_estimate()),
            "creating fdtd simulation"
        );

        let strider = Strider::square(config.size);
        let coefficients = CoefficientMap::new(
            &strider,
            &medium,
            &config.scatterer,
            config.material_model,
        );

        let tfsf = config.tfsf.enabled.then(|| {
            let line = AuxiliaryLine::new(
                config.size,
                &medium,
                config.source.waveform,
                config.source.position,
            );
            TfsfBoundary::new(config.tfsf.bound(), line)
        });

        let abc = if config.abc.enabled {
            let reference = coefficients
                .at(&Point2::origin())
                .and_then(MurCoefficients::new)
                .ok_or(ConfigError::ScattererCoversReferenceCell)?;
            Some(AbsorbingBoundary::new(
                &strider,
                reference,
                config.abc.corners,
            ))
        }
        else {
            None
        };

        Ok(Self {
            medium,
            field: FieldState::new(&strider),
            coefficients,
            tfsf,
            abc,
            steps: config.steps,
            sample_stride: config.sample_stride,
            divergence_threshold: config.divergence_threshold,
            threading: SingleThreaded,
        })
    }
}

impl<Threading> Simulation<Threading> {
    pub fn with_threading<T: RowForEach>(self, threading: T) -> Simulation<T> {
        Simulation {
            medium: self.medium,
            field: self.field,
            coefficients: self.coefficients,
            tfsf: self.tfsf,
            abc: self.abc,
            steps: self.steps,
            sample_stride: self.sample_stride,
            divergence_threshold: self.divergence_threshold,
            threading,
        }
    }

    pub fn medium(&self) -> &Medium {
        &self.medium
    }

    pub fn field(&self) -> &FieldState {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut FieldState {
        &mut self.field
    }

    pub fn coefficients(&self) -> &CoefficientMap {
        &self.coefficients
    }

    pub fn tick(&self) -> usize {
        self.field.tick()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl<Threading: RowForEach> Simulation<Threading> {
    /// Advances the simulation by one time step.
    ///
    /// Returns [`Error::Instability`] if any 2-D field value is not finite or
    /// exceeds the divergence threshold afterwards. Field values are not
    /// modified in that case.
    pub fn step(&mut self) -> Result<(), Error> {
        let tick = self.field.tick();

        update_magnetic(&self.threading, &mut self.field, &self.coefficients);

        if let Some(tfsf) = &self.tfsf {
            tfsf.inject(&mut self.field, &self.coefficients, tick);
        }

        update_electric(&self.threading, &mut self.field, &self.coefficients);

        if let Some(abc) = &mut self.abc {
            abc.apply(&mut self.field);
        }

        self.field.advance_tick();

        if let Some(divergence) = self.field.find_divergence(self.divergence_threshold) {
            tracing::error!(tick, ?divergence, "simulation diverged");
            return Err(Error::Instability {
                tick,
                component: divergence.component,
                point: divergence.point,
                value: divergence.value,
            });
        }

        Ok(())
    }

    /// Runs all remaining steps, writing a sample block to `sink` whenever the
    /// tick before the step is a multiple of the sample stride.
    pub fn run<S: SampleSink>(&mut self, sink: &mut S) -> Result<(), Error> {
        let start = self.field.tick();
        let time = Instant::now();
        tracing::info!(start, steps = self.steps, "running simulation");

        while self.field.tick() < self.steps {
            let tick = self.field.tick();
            self.step()?;
            if tick % self.sample_stride == 0 {
                sink.write_block(tick, &self.field)?;
            }
        }
        sink.finish()?;

        tracing::info!(
            ticks = self.field.tick() - start,
            elapsed = ?time.elapsed(),
            energy = self.field.energy(),
            "simulation finished"
        );

        Ok(())
    }
}

pub mod config;
pub mod error;
pub mod fdtd;
pub mod output;
pub mod util;

pub use self::{
    config::SimulationConfig,
    error::{
        ConfigError,
        Error,
    },
    fdtd::Simulation,
};

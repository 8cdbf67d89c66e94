//! Configuration management for the trajectory intersection solver

pub mod settings;

pub use settings::{
    CliOverrides, InputConfig, OutputConfig, OutputFormat, Settings, SolverBackend, SolverConfig,
};

//! Observed-point domain types and file I/O

pub mod io;
pub mod point;

pub use io::{
    create_example_observations, load_observations_from_file, observations_to_string,
    parse_observation, parse_observations, save_observations_to_file,
};
pub use point::{ObservedPoint, Trajectory, Vec3};

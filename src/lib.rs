pub mod azimuth;
pub mod constants;
pub mod distribution_function;
pub mod energy_split;
pub mod eta;
pub mod galmock_errors;
pub mod kde;
pub mod linear_algebra;
pub mod mock_sampler;
pub mod orbit_integration;
pub mod params;
pub mod phase_space;
pub mod potential;
pub mod progress_bar;
pub mod sample_cache;
pub mod sample_generator;
mod special;
pub mod uniformity;

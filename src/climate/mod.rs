pub mod error;
pub mod grid;
pub mod netcdf;
pub mod sampler;
pub mod time_units;

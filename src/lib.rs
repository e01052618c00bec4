//! The `cosmoprop` crate simulates the propagation of ultra-high-energy
//! cosmic rays through the photon backgrounds of an expanding universe.

pub mod constants;
pub mod cosmology;
pub mod error;
pub mod interactions;
pub mod interpolation;
pub mod io;
pub mod losses;
pub mod math;
pub mod particle;
pub mod photon_field;
pub mod propagation;
pub mod random;
pub mod simulation;
pub mod units;

#[cfg(feature = "cli")]
pub mod cli;

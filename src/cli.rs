//! Command line interface.

pub mod build;
pub mod completions;
pub mod photon_fields;
pub mod propagate;
pub mod rates;
pub mod run;
pub mod utils;

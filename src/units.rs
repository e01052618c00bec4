//! Astrophysical units expressed in cgs.

/// Floating-point precision to use for units.
#[allow(non_camel_case_types)]
pub type fun = f64;

/// Kilometer [cm].
pub const U_KM: fun = 1e5;
/// Megaparsec [cm].
pub const U_MPC: fun = 3.085_677_581_491_367e24;
/// Gigayear (Julian) [s].
pub const U_GYR: fun = 3.155_76e16;
/// Unit of the Hubble constant, km/s/Mpc [1/s].
pub const U_HUBBLE: fun = U_KM / U_MPC;

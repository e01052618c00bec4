//! Physical and mathematical constants in cgs units.

/// Floating-point precision to use for constants.
#[allow(non_camel_case_types)]
pub type fcn = f64;

// Mathematical constants

pub const PI: fcn = std::f64::consts::PI;
/// Riemann zeta function evaluated at 3.
pub const ZETA_3: fcn = 1.202_056_903_159_594_2;

// Physical constants

/// Speed of light in vacuum [cm/s].
pub const CLIGHT: fcn = 2.997_924_58e10;
/// Planck constant [erg s].
pub const HPLANCK: fcn = 6.626_070_15e-27;
/// Reduced Planck constant [erg s].
pub const HBAR: fcn = HPLANCK / (2.0 * PI);
/// Reduced Planck constant times the speed of light [erg cm].
pub const HBAR_C: fcn = HBAR * CLIGHT;
/// Boltzmann constant [erg/K].
pub const KBOLTZMANN: fcn = 1.380_649e-16;
/// Radiation density constant [erg/(cm^3 K^4)].
pub const RADIATION_CONSTANT: fcn = 7.565_733e-15;
/// Fine structure constant.
pub const ALPHA_FINE: fcn = 1.0 / 137.035_999_084;
/// Classical electron radius [cm].
pub const R_ELECTRON: fcn = 2.817_940_326_2e-13;
/// Electron mass [g].
pub const M_ELECTRON: fcn = 9.109_383_701_5e-28;
/// Proton mass [g].
pub const M_PROTON: fcn = 1.672_621_923_69e-24;
/// Neutron mass [g].
pub const M_NEUTRON: fcn = 1.674_927_498_04e-24;
/// Mean nucleon mass [g].
pub const M_NUCLEON: fcn = 0.5 * (M_PROTON + M_NEUTRON);
/// Electron rest energy [erg].
pub const MC2_ELECTRON: fcn = M_ELECTRON * CLIGHT * CLIGHT;
/// Proton rest energy [erg].
pub const MC2_PROTON: fcn = M_PROTON * CLIGHT * CLIGHT;
/// Mean nucleon rest energy [erg].
pub const MC2_NUCLEON: fcn = M_NUCLEON * CLIGHT * CLIGHT;
/// Neutral pion rest energy [erg].
pub const MC2_PION_NEUTRAL: fcn = 134.976_8 * MEV_TO_ERG;
/// Charged pion rest energy [erg].
pub const MC2_PION_CHARGED: fcn = 139.570_39 * MEV_TO_ERG;
/// Temperature of the cosmic microwave background today [K].
pub const T_CMB: fcn = 2.725_5;

// Unit conversion factors

/// Conversion factor from electron volts to ergs.
pub const EV_TO_ERG: fcn = 1.602_176_634e-12;
/// Conversion factor from mega electron volts to ergs.
pub const MEV_TO_ERG: fcn = EV_TO_ERG * 1e6;
/// Conversion factor from giga electron volts to ergs.
pub const GEV_TO_ERG: fcn = EV_TO_ERG * 1e9;
/// Conversion factor from exa electron volts to ergs.
pub const EEV_TO_ERG: fcn = EV_TO_ERG * 1e18;
/// Conversion factor from microbarns to square centimeters.
pub const MICROBARN_TO_CM2: fcn = 1e-30;
/// Conversion factor from gigahertz to hertz.
pub const GHZ_TO_HZ: fcn = 1e9;
/// Conversion factor from nW/m^2 to erg/(s cm^2).
pub const NW_M2_TO_ERG_S_CM2: fcn = 1e-6;

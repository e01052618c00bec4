//! Photon backgrounds that propagating particles interact with.
//!
//! All quantities refer to the present epoch (redshift zero). Fields are
//! treated as comovingly constant, so the density at redshift `z` follows from
//! `n_z(ε) = (1+z)^2 n((1+z)^-1 ε)`, which the loss and rate models apply by
//! evaluating their present-day integrals at the Lorentz factor `(1+z)Γ` and
//! scaling by `(1+z)^3`.

pub mod tabulated;

use self::tabulated::TabulatedPhotonField;
use crate::{
    constants::{CLIGHT, EV_TO_ERG, GHZ_TO_HZ, HBAR_C, HPLANCK, KBOLTZMANN, NW_M2_TO_ERG_S_CM2, PI, T_CMB},
    math::{integrate_simpson, log_space},
};
use std::io::{self, Write};

/// Floating-point precision to use for photon fields.
#[allow(non_camel_case_types)]
pub type fph = f64;

/// A photon background.
#[derive(Clone, Debug)]
pub enum PhotonField {
    /// The cosmic microwave background.
    Cmb,
    /// Extragalactic background light modelled as a sum of diluted blackbodies.
    Greybody(GreybodyConfig),
    /// A field read from a table.
    Tabulated(TabulatedPhotonField),
}

impl PhotonField {
    pub const CMB_MIN_PHOTON_ENERGY: fph = 1e-6 * EV_TO_ERG;
    pub const CMB_MAX_PHOTON_ENERGY: fph = 1e-2 * EV_TO_ERG;

    const INTEGRATION_INTERVALS: usize = 1000;

    /// Creates the default extragalactic background light field.
    pub fn default_ebl() -> Self {
        Self::Greybody(GreybodyConfig::default())
    }

    /// Returns a short name identifying the field.
    pub fn name(&self) -> &str {
        match self {
            Self::Cmb => "cmb",
            Self::Greybody(_) => "ebl",
            Self::Tabulated(field) => field.name(),
        }
    }

    /// Computes the number density of photons per unit photon energy
    /// [1/(erg cm^3)] at the given photon energy [erg].
    ///
    /// Returns zero outside the energy bounds of the field.
    pub fn density(&self, photon_energy: fph) -> fph {
        if !(photon_energy >= self.min_photon_energy() && photon_energy <= self.max_photon_energy()) {
            return 0.0;
        }
        match self {
            Self::Cmb => blackbody_density(photon_energy, T_CMB),
            Self::Greybody(config) => config
                .components
                .iter()
                .map(|component| {
                    component.dilution * blackbody_density(photon_energy, component.temperature)
                })
                .sum(),
            Self::Tabulated(field) => field.density(photon_energy),
        }
    }

    /// Returns the smallest photon energy with non-zero density [erg].
    pub fn min_photon_energy(&self) -> fph {
        match self {
            Self::Cmb => Self::CMB_MIN_PHOTON_ENERGY,
            Self::Greybody(config) => config.min_photon_energy,
            Self::Tabulated(field) => field.min_photon_energy(),
        }
    }

    /// Returns the largest photon energy with non-zero density [erg].
    pub fn max_photon_energy(&self) -> fph {
        match self {
            Self::Cmb => Self::CMB_MAX_PHOTON_ENERGY,
            Self::Greybody(config) => config.max_photon_energy,
            Self::Tabulated(field) => field.max_photon_energy(),
        }
    }

    /// Computes the brightness `νI_ν` [erg/(s cm^2 sr)] at the given photon energy [erg].
    pub fn brightness(&self, photon_energy: fph) -> fph {
        photon_energy * photon_energy * self.density(photon_energy) * CLIGHT / (4.0 * PI)
    }

    /// Computes the total number density of photons [1/cm^3].
    pub fn number_density(&self) -> fph {
        self.integrate_over_ln_energy(|photon_energy| photon_energy * self.density(photon_energy))
    }

    /// Computes the total energy density of photons [erg/cm^3].
    pub fn energy_density(&self) -> fph {
        self.integrate_over_ln_energy(|photon_energy| {
            photon_energy * photon_energy * self.density(photon_energy)
        })
    }

    fn integrate_over_ln_energy<F: Fn(fph) -> fph>(&self, integrand: F) -> fph {
        integrate_simpson(
            |ln_energy| integrand(fph::exp(ln_energy)),
            fph::ln(self.min_photon_energy()),
            fph::ln(self.max_photon_energy()),
            Self::INTEGRATION_INTERVALS,
        )
    }

    /// Writes a table of photon energy [eV], frequency [GHz] and brightness
    /// [nW/(m^2 sr)] at `n_points` logarithmically spaced energies.
    pub fn write_brightness_table<W: Write>(&self, writer: &mut W, n_points: usize) -> io::Result<()> {
        writeln!(writer, "# {}: energy [eV] - frequency [GHz] - brightness [nW/m^2/sr]", self.name())?;
        for photon_energy in log_space(self.min_photon_energy(), self.max_photon_energy(), n_points) {
            writeln!(
                writer,
                "{:e} {:e} {:e}",
                photon_energy / EV_TO_ERG,
                photon_energy / HPLANCK / GHZ_TO_HZ,
                self.brightness(photon_energy) / NW_M2_TO_ERG_S_CM2
            )?;
        }
        Ok(())
    }
}

/// A single diluted blackbody component of a greybody field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GreybodyComponent {
    /// Temperature [K].
    pub temperature: fph,
    /// Factor multiplying the blackbody density.
    pub dilution: fph,
}

/// Configuration parameters for a greybody photon field.
#[derive(Clone, Debug, PartialEq)]
pub struct GreybodyConfig {
    pub components: Vec<GreybodyComponent>,
    /// Smallest photon energy with non-zero density [erg].
    pub min_photon_energy: fph,
    /// Largest photon energy with non-zero density [erg].
    pub max_photon_energy: fph,
}

impl GreybodyConfig {
    /// Stellar component of the extragalactic background light.
    pub const DEFAULT_STELLAR_COMPONENT: GreybodyComponent = GreybodyComponent {
        temperature: 5000.0,
        dilution: 2.1e-15,
    };
    /// Dust component of the extragalactic background light.
    pub const DEFAULT_DUST_COMPONENT: GreybodyComponent = GreybodyComponent {
        temperature: 40.0,
        dilution: 5.2e-7,
    };
    pub const DEFAULT_MIN_PHOTON_ENERGY: fph = 1e-4 * EV_TO_ERG;
    pub const DEFAULT_MAX_PHOTON_ENERGY: fph = 12.0 * EV_TO_ERG;

    /// Panics if any of the configuration parameter values are invalid.
    pub fn validate(&self) {
        assert!(
            !self.components.is_empty(),
            "Greybody field must have at least one component."
        );
        for component in &self.components {
            assert!(
                component.temperature > 0.0,
                "Greybody temperature must be larger than zero."
            );
            assert!(
                component.dilution >= 0.0,
                "Greybody dilution must be larger than or equal to zero."
            );
        }
        assert!(
            self.min_photon_energy > 0.0,
            "Minimum photon energy must be larger than zero."
        );
        assert!(
            self.max_photon_energy > self.min_photon_energy,
            "Maximum photon energy must be larger than minimum photon energy."
        );
    }
}

impl Default for GreybodyConfig {
    fn default() -> Self {
        Self {
            components: vec![
                Self::DEFAULT_STELLAR_COMPONENT,
                Self::DEFAULT_DUST_COMPONENT,
            ],
            min_photon_energy: Self::DEFAULT_MIN_PHOTON_ENERGY,
            max_photon_energy: Self::DEFAULT_MAX_PHOTON_ENERGY,
        }
    }
}

/// Computes the blackbody photon number density per unit photon energy
/// [1/(erg cm^3)] at the given photon energy [erg] and temperature [K].
pub fn blackbody_density(photon_energy: fph, temperature: fph) -> fph {
    let x = photon_energy / (KBOLTZMANN * temperature);
    photon_energy * photon_energy / (PI * PI * HBAR_C * HBAR_C * HBAR_C * fph::exp_m1(x))
}

//! Energy losses from electron-positron pair production on photon backgrounds.

use super::flo;
use crate::{
    constants::{ALPHA_FINE, CLIGHT, MC2_ELECTRON, M_ELECTRON, M_PROTON, PI, R_ELECTRON},
    math::integrate_simpson,
    particle::Pid,
    photon_field::PhotonField,
};

/// Configuration parameters for pair production losses.
#[derive(Clone, Debug, PartialEq)]
pub struct PairProductionConfig {
    /// Number of Simpson subintervals used for the integral over photon energy.
    pub integration_intervals: usize,
}

impl PairProductionConfig {
    pub const DEFAULT_INTEGRATION_INTERVALS: usize = 200;

    /// Panics if any of the configuration parameter values are invalid.
    pub fn validate(&self) {
        assert!(
            self.integration_intervals >= 2,
            "Number of integration intervals must be at least two."
        );
    }
}

impl Default for PairProductionConfig {
    fn default() -> Self {
        Self {
            integration_intervals: Self::DEFAULT_INTEGRATION_INTERVALS,
        }
    }
}

/// Pair production losses on a set of photon fields.
#[derive(Clone, Debug)]
pub struct PairProductionLosses {
    config: PairProductionConfig,
    photon_fields: Vec<PhotonField>,
}

impl PairProductionLosses {
    const RATE_FACTOR: flo =
        ALPHA_FINE * R_ELECTRON * R_ELECTRON * CLIGHT * MC2_ELECTRON * (M_ELECTRON / M_PROTON);

    pub fn new(config: PairProductionConfig, photon_fields: Vec<PhotonField>) -> Self {
        config.validate();
        Self {
            config,
            photon_fields,
        }
    }

    pub fn photon_fields(&self) -> &[PhotonField] {
        &self.photon_fields
    }

    /// Computes the present-day relative loss rate `b(Γ)` [1/s] of a proton
    /// with the given Lorentz factor.
    pub fn proton_loss_rate(&self, lorentz_factor: flo) -> flo {
        let two_gamma_over_mc2 = 2.0 * lorentz_factor / MC2_ELECTRON;
        let ln_threshold = flo::ln(2.0);

        let integral: flo = self
            .photon_fields
            .iter()
            .map(|field| {
                let ln_k_min = flo::max(
                    flo::ln(two_gamma_over_mc2 * field.min_photon_energy()),
                    ln_threshold,
                );
                let ln_k_max = flo::ln(two_gamma_over_mc2 * field.max_photon_energy());
                if ln_k_max <= ln_k_min {
                    return 0.0;
                }
                integrate_simpson(
                    |ln_k| {
                        let k = flo::exp(ln_k);
                        phi(k) / k * field.density(k / two_gamma_over_mc2)
                    },
                    ln_k_min,
                    ln_k_max,
                    self.config.integration_intervals,
                )
            })
            .sum();

        Self::RATE_FACTOR * integral / lorentz_factor
    }

    /// Computes `d(lnΓ)/dt` [1/s] for the given species, Lorentz factor and redshift.
    ///
    /// Particles that are not charged nuclei do not lose energy this way.
    pub fn dln_gamma_dt(&self, pid: Pid, lorentz_factor: flo, redshift: flo) -> flo {
        let charge = pid.nucleus_charge() as flo;
        let mass_number = pid.nucleus_mass_number() as flo;
        if charge == 0.0 || mass_number == 0.0 {
            return 0.0;
        }
        let scale = 1.0 + redshift;
        let rate = scale * scale * scale * self.proton_loss_rate(scale * lorentz_factor) * charge
            * charge
            / mass_number;
        flo::max(rate, 0.0)
    }
}

/// Fit to the function `φ(k)` of Blumenthal (1970) as given by Chodorowski
/// et al. (1992), where `k` is the photon energy in the nucleus rest frame in
/// units of the electron rest energy.
pub fn phi(k: flo) -> flo {
    const C: [flo; 4] = [0.8048, 0.1459, 1.137e-3, -3.879e-6];
    const D: [flo; 4] = [-86.07, 50.96, -14.45, 8.0 / 3.0];
    const F: [flo; 3] = [2.910, 78.35, 1837.0];

    if k < 2.0 {
        0.0
    } else if k < 25.0 {
        let sum_c: flo = C
            .iter()
            .enumerate()
            .map(|(i, c)| c * flo::powi(k - 2.0, i as i32 + 1))
            .sum();
        PI / 12.0 * flo::powi(k - 2.0, 4) / (1.0 + sum_c)
    } else {
        let ln_k = flo::ln(k);
        let sum_d: flo = D
            .iter()
            .enumerate()
            .map(|(i, d)| d * flo::powi(ln_k, i as i32))
            .sum();
        let sum_f: flo = F
            .iter()
            .enumerate()
            .map(|(i, f)| f / flo::powi(k, i as i32 + 1))
            .sum();
        k * sum_d / (1.0 - sum_f)
    }
}

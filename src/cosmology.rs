//! Background cosmology.

use crate::{
    math::integrate_simpson,
    units::{fun, U_HUBBLE},
};

/// Floating-point precision to use for cosmological quantities.
#[allow(non_camel_case_types)]
pub type fco = f64;

/// Configuration parameters for a flat ΛCDM cosmology.
#[derive(Clone, Debug, PartialEq)]
pub struct CosmologyConfig {
    /// Hubble constant [km/s/Mpc].
    pub hubble_constant: fco,
    /// Matter density parameter today.
    pub omega_matter: fco,
    /// Dark energy density parameter today.
    pub omega_lambda: fco,
}

impl CosmologyConfig {
    pub const DEFAULT_HUBBLE_CONSTANT: fco = 67.4;
    pub const DEFAULT_OMEGA_MATTER: fco = 0.315;
    pub const DEFAULT_OMEGA_LAMBDA: fco = 0.685;

    /// Parameters from the Planck 2018 results (TT,TE,EE+lowE+lensing).
    pub fn planck_2018() -> Self {
        Self {
            hubble_constant: Self::DEFAULT_HUBBLE_CONSTANT,
            omega_matter: Self::DEFAULT_OMEGA_MATTER,
            omega_lambda: Self::DEFAULT_OMEGA_LAMBDA,
        }
    }

    /// Panics if any of the configuration parameter values are invalid.
    pub fn validate(&self) {
        assert!(
            self.hubble_constant > 0.0,
            "Hubble constant must be larger than zero."
        );
        assert!(
            self.omega_matter >= 0.0,
            "Matter density parameter must be larger than or equal to zero."
        );
        assert!(
            self.omega_lambda >= 0.0,
            "Dark energy density parameter must be larger than or equal to zero."
        );
        assert!(
            self.omega_matter + self.omega_lambda > 0.0,
            "Total density parameter must be larger than zero."
        );
    }
}

impl Default for CosmologyConfig {
    fn default() -> Self {
        Self::planck_2018()
    }
}

/// Expansion history of a flat ΛCDM universe.
#[derive(Clone, Debug)]
pub struct Cosmology {
    config: CosmologyConfig,
    hubble_constant: fco,
}

impl Cosmology {
    const LOOKBACK_TIME_INTERVALS_PER_UNIT_REDSHIFT: usize = 200;

    pub fn new(config: CosmologyConfig) -> Self {
        config.validate();
        let hubble_constant = config.hubble_constant * (U_HUBBLE as fco);
        Self {
            config,
            hubble_constant,
        }
    }

    pub fn config(&self) -> &CosmologyConfig {
        &self.config
    }

    /// Returns the Hubble rate at the given redshift [1/s].
    pub fn hubble_rate(&self, redshift: fco) -> fco {
        let scale = 1.0 + redshift;
        self.hubble_constant
            * fco::sqrt(self.config.omega_matter * scale * scale * scale + self.config.omega_lambda)
    }

    /// Returns the magnitude of the cosmic time elapsed per unit redshift [s].
    pub fn dtdz(&self, redshift: fco) -> fco {
        1.0 / (self.hubble_rate(redshift) * (1.0 + redshift))
    }

    /// Returns the factor by which a Lorentz factor shrinks from adiabatic
    /// expansion when going from `old_redshift` to `new_redshift`.
    pub fn adiabatic_relative_loss(&self, old_redshift: fco, new_redshift: fco) -> fco {
        (1.0 + new_redshift) / (1.0 + old_redshift)
    }

    /// Returns the time elapsed between the given redshift and today [s].
    pub fn lookback_time(&self, redshift: fco) -> fco {
        if redshift <= 0.0 {
            return 0.0;
        }
        let n_intervals = usize::max(
            2,
            (fun::ceil(redshift) as usize) * Self::LOOKBACK_TIME_INTERVALS_PER_UNIT_REDSHIFT,
        );
        integrate_simpson(|z| self.dtdz(z), 0.0, redshift, n_intervals)
    }
}

impl Default for Cosmology {
    fn default() -> Self {
        Self::new(CosmologyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::U_GYR;
    use approx::assert_relative_eq;

    #[test]
    fn hubble_rate_today_equals_hubble_constant() {
        let cosmology = Cosmology::default();
        assert_relative_eq!(
            cosmology.hubble_rate(0.0),
            67.4 * U_HUBBLE,
            max_relative = 1e-12
        );
    }

    #[test]
    fn dtdz_decreases_with_redshift() {
        let cosmology = Cosmology::default();
        assert!(cosmology.dtdz(0.0) > cosmology.dtdz(1.0));
        assert!(cosmology.dtdz(1.0) > cosmology.dtdz(5.0));
        assert!(cosmology.dtdz(5.0) > 0.0);
    }

    #[test]
    fn adiabatic_loss_follows_scale_factor() {
        let cosmology = Cosmology::default();
        assert_relative_eq!(cosmology.adiabatic_relative_loss(1.0, 0.0), 0.5);
        assert_relative_eq!(cosmology.adiabatic_relative_loss(3.0, 1.0), 0.5);
    }

    #[test]
    fn lookback_time_to_redshift_one_is_about_eight_gyr() {
        let cosmology = Cosmology::default();
        let lookback_time = cosmology.lookback_time(1.0) / U_GYR;
        assert!(lookback_time > 7.8 && lookback_time < 8.1);
    }

    #[test]
    #[should_panic]
    fn negative_hubble_constant_is_rejected() {
        Cosmology::new(CosmologyConfig {
            hubble_constant: -1.0,
            ..CosmologyConfig::default()
        });
    }
}

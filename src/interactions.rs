//! Stochastic interactions of propagating particles.

pub mod cross_section;

use self::cross_section::{ChannelPair, CrossSection};
use crate::{
    constants::{CLIGHT, MC2_NUCLEON, MC2_PION_CHARGED, MC2_PION_NEUTRAL},
    math::integrate_simpson,
    particle::{Particle, Pid},
    photon_field::PhotonField,
    random::RandomNumberGenerator,
};

/// Floating-point precision to use for interactions.
#[allow(non_camel_case_types)]
pub type fxs = f64;

/// Configuration parameters for photo-pion production.
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoPionConfig {
    /// Number of Simpson subintervals used for the integral over photon energy.
    pub integration_intervals: usize,
    /// Probability that the struck nucleon changes isospin.
    pub charge_exchange_probability: fxs,
}

impl PhotoPionConfig {
    pub const DEFAULT_INTEGRATION_INTERVALS: usize = 200;
    pub const DEFAULT_CHARGE_EXCHANGE_PROBABILITY: fxs = 1.0 / 3.0;

    /// Panics if any of the configuration parameter values are invalid.
    pub fn validate(&self) {
        assert!(
            self.integration_intervals >= 2,
            "Number of integration intervals must be at least two."
        );
        assert!(
            (0.0..=1.0).contains(&self.charge_exchange_probability),
            "Charge exchange probability must be in the range [0, 1]."
        );
    }
}

impl Default for PhotoPionConfig {
    fn default() -> Self {
        Self {
            integration_intervals: Self::DEFAULT_INTEGRATION_INTERVALS,
            charge_exchange_probability: Self::DEFAULT_CHARGE_EXCHANGE_PROBABILITY,
        }
    }
}

/// Pion production in collisions between nuclei and background photons.
#[derive(Clone, Debug)]
pub struct PhotoPionProduction {
    config: PhotoPionConfig,
    cross_section: CrossSection,
    photon_fields: Vec<PhotonField>,
}

impl PhotoPionProduction {
    pub fn new(
        config: PhotoPionConfig,
        cross_section: CrossSection,
        photon_fields: Vec<PhotonField>,
    ) -> Self {
        config.validate();
        Self {
            config,
            cross_section,
            photon_fields,
        }
    }

    pub fn cross_section(&self) -> &CrossSection {
        &self.cross_section
    }

    pub fn photon_fields(&self) -> &[PhotonField] {
        &self.photon_fields
    }

    /// Computes the present-day interaction rate [1/s] of a single nucleon
    /// with the given Lorentz factor, split by channel.
    ///
    /// `R(Γ) = c/(2Γ^2) ∫ dlnε n(ε)/ε Φ(2Γε)`
    pub fn nucleon_partial_rates(&self, lorentz_factor: fxs) -> ChannelPair {
        let threshold_photon_energy =
            self.cross_section.threshold_energy() / (2.0 * lorentz_factor);
        let prefactor = CLIGHT / (2.0 * lorentz_factor * lorentz_factor);

        self.photon_fields
            .iter()
            .fold(ChannelPair::default(), |sum, field| {
                let ln_min_energy =
                    fxs::ln(fxs::max(field.min_photon_energy(), threshold_photon_energy));
                let ln_max_energy = fxs::ln(field.max_photon_energy());
                if ln_max_energy <= ln_min_energy {
                    return sum;
                }
                let integrate_channel = |select: fn(&ChannelPair) -> fxs| {
                    integrate_simpson(
                        |ln_energy| {
                            let photon_energy = fxs::exp(ln_energy);
                            let phi = self.cross_section.phi(2.0 * lorentz_factor * photon_energy);
                            field.density(photon_energy) / photon_energy * select(&phi)
                        },
                        ln_min_energy,
                        ln_max_energy,
                        self.config.integration_intervals,
                    )
                };
                let resonance = integrate_channel(|phi: &ChannelPair| phi.resonance);
                let multi_pion = integrate_channel(|phi: &ChannelPair| phi.multi_pion);
                ChannelPair {
                    resonance: sum.resonance + prefactor * resonance,
                    multi_pion: sum.multi_pion + prefactor * multi_pion,
                }
            })
    }

    /// Computes the interaction rate [1/s] for the given species, Lorentz factor
    /// and redshift, split by channel.
    ///
    /// Each nucleon in a nucleus is assumed to interact independently.
    pub fn partial_rates(&self, pid: Pid, lorentz_factor: fxs, redshift: fxs) -> ChannelPair {
        let mass_number = pid.nucleus_mass_number() as fxs;
        if mass_number == 0.0 {
            return ChannelPair::default();
        }
        let scale = 1.0 + redshift;
        let factor = mass_number * scale * scale * scale;
        let rates = self.nucleon_partial_rates(scale * lorentz_factor);
        ChannelPair {
            resonance: factor * rates.resonance,
            multi_pion: factor * rates.multi_pion,
        }
    }

    /// Computes the total interaction rate [1/s].
    pub fn rate(&self, pid: Pid, lorentz_factor: fxs, redshift: fxs) -> fxs {
        self.partial_rates(pid, lorentz_factor, redshift).total()
    }

    /// Computes the mean distance [cm] travelled before an interaction.
    pub fn interaction_length(&self, pid: Pid, lorentz_factor: fxs, redshift: fxs) -> fxs {
        CLIGHT / self.rate(pid, lorentz_factor, redshift)
    }

    /// Generates the products of an interaction of the given particle, placed
    /// at the given redshift.
    ///
    /// Three random numbers are drawn, selecting in order the channel, the
    /// struck nucleon and whether its isospin is flipped. The residual nucleus
    /// keeps the Lorentz factor of the incoming particle, the struck nucleon
    /// loses the channel inelasticity and the pion carries away the lost
    /// energy. Free neutrons are assumed to decay immediately into protons.
    pub fn final_state(
        &self,
        particle: &Particle,
        new_redshift: fxs,
        rng: &mut RandomNumberGenerator,
    ) -> Vec<Particle> {
        let pid = particle.pid();
        assert!(
            pid.is_nucleus(),
            "Photo-pion production requires a nucleus, got {}",
            pid
        );
        let charge = pid.nucleus_charge();
        let mass_number = pid.nucleus_mass_number();
        let lorentz_factor = particle.lorentz_factor();

        let rates = self.partial_rates(pid, lorentz_factor, particle.redshift());
        let inelasticity = if rng.uniform() * rates.total() < rates.resonance {
            CrossSection::RESONANCE_INELASTICITY
        } else {
            CrossSection::MULTI_PION_INELASTICITY
        };

        let struck_proton = rng.uniform() * (mass_number as fxs) < charge as fxs;
        let charge_exchange = rng.uniform() < self.config.charge_exchange_probability;

        let (outgoing_nucleon, pion) = match (struck_proton, charge_exchange) {
            (true, false) => (Pid::PROTON, Pid::NeutralPion),
            (true, true) => (Pid::NEUTRON, Pid::PositivePion),
            (false, false) => (Pid::NEUTRON, Pid::NeutralPion),
            (false, true) => (Pid::PROTON, Pid::NegativePion),
        };

        let mut products = Vec::with_capacity(3);

        if mass_number > 1 {
            let residual_charge = charge - u32::from(struck_proton);
            let residual_mass_number = mass_number - 1;
            if residual_charge == 0 {
                products.extend(
                    (0..residual_mass_number)
                        .map(|_| Particle::new(Pid::PROTON, new_redshift, lorentz_factor)),
                );
            } else {
                products.push(Particle::new(
                    Pid::nucleus(residual_charge, residual_mass_number),
                    new_redshift,
                    lorentz_factor,
                ));
            }
        }

        let nucleon = if outgoing_nucleon == Pid::NEUTRON {
            Pid::PROTON
        } else {
            outgoing_nucleon
        };
        products.push(Particle::new(
            nucleon,
            new_redshift,
            lorentz_factor * (1.0 - inelasticity),
        ));

        let pion_rest_energy = if pion == Pid::NeutralPion {
            MC2_PION_NEUTRAL
        } else {
            MC2_PION_CHARGED
        };
        products.push(Particle::new(
            pion,
            new_redshift,
            inelasticity * lorentz_factor * MC2_NUCLEON / pion_rest_energy,
        ));

        products
    }
}

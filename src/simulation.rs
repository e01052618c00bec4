//! Convenience object for setting up and running propagation simulations.

use crate::{
    constants::EEV_TO_ERG,
    cosmology::{Cosmology, CosmologyConfig},
    interactions::{cross_section::CrossSection, PhotoPionConfig, PhotoPionProduction},
    io::Verbosity,
    losses::{
        pair_production::{PairProductionConfig, PairProductionLosses},
        ContinuousLoss,
    },
    particle::{ParticleStack, Pid},
    photon_field::PhotonField,
    propagation::{output::StepRecordSink, fpr, PropagationConfig, Propagator, RunSummary},
    random::RandomNumberGenerator,
};
use std::io;

/// How to create the population of particles to propagate.
#[derive(Clone, Debug, PartialEq)]
pub enum InitialPopulation {
    /// Identical particles with the given redshift and Lorentz factor.
    Single {
        pid: Pid,
        redshift: fpr,
        lorentz_factor: fpr,
        n_particles: usize,
    },
    /// Particles with random redshifts and energies [erg].
    Random {
        pid: Pid,
        n_particles: usize,
        max_redshift: fpr,
        redshift_power: fpr,
        min_energy: fpr,
        max_energy: fpr,
    },
}

impl InitialPopulation {
    pub const DEFAULT_REDSHIFT_POWER: fpr = 2.0;
    pub const DEFAULT_MIN_ENERGY: fpr = 1.0 * EEV_TO_ERG;
    pub const DEFAULT_MAX_ENERGY: fpr = 1e3 * EEV_TO_ERG;

    /// Creates the particle stack, drawing from the given generator if the
    /// population is random.
    pub fn build(&self, rng: &mut RandomNumberGenerator) -> ParticleStack {
        match *self {
            Self::Single {
                pid,
                redshift,
                lorentz_factor,
                n_particles,
            } => ParticleStack::single(pid, redshift, lorentz_factor, n_particles),
            Self::Random {
                pid,
                n_particles,
                max_redshift,
                redshift_power,
                min_energy,
                max_energy,
            } => ParticleStack::random(
                pid,
                n_particles,
                max_redshift,
                redshift_power,
                (min_energy, max_energy),
                rng,
            ),
        }
    }
}

/// Aggregates everything needed to run a propagation simulation.
#[derive(Clone, Debug)]
pub struct PropagationSimulator {
    /// Seed for the random number generator.
    pub seed: u64,
    pub initial_population: InitialPopulation,
    pub propagation_config: PropagationConfig,
    pub cosmology_config: CosmologyConfig,
    /// Whether to include energy losses from pair production.
    pub include_pair_production: bool,
    /// Whether to include energy losses from cosmological expansion.
    pub include_adiabatic_losses: bool,
    /// Photon fields causing pair production losses.
    pub loss_photon_fields: Vec<PhotonField>,
    pub pair_production_config: PairProductionConfig,
    /// Photon fields causing photo-pion production.
    pub interaction_photon_fields: Vec<PhotonField>,
    pub photo_pion_config: PhotoPionConfig,
    pub cross_section: CrossSection,
}

impl PropagationSimulator {
    pub const DEFAULT_SEED: u64 = 10;

    /// Creates a simulator for the given population with default settings:
    /// pair production on the CMB and EBL, adiabatic losses and photo-pion
    /// production on the CMB.
    pub fn new(initial_population: InitialPopulation) -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            initial_population,
            propagation_config: PropagationConfig::default(),
            cosmology_config: CosmologyConfig::default(),
            include_pair_production: true,
            include_adiabatic_losses: true,
            loss_photon_fields: vec![PhotonField::Cmb, PhotonField::default_ebl()],
            pair_production_config: PairProductionConfig::default(),
            interaction_photon_fields: vec![PhotonField::Cmb],
            photo_pion_config: PhotoPionConfig::default(),
            cross_section: CrossSection::AtoyanDermer,
        }
    }

    pub fn create_cosmology(&self) -> Cosmology {
        Cosmology::new(self.cosmology_config.clone())
    }

    pub fn create_losses(&self) -> Vec<ContinuousLoss> {
        let mut losses = Vec::with_capacity(2);
        if self.include_pair_production {
            losses.push(ContinuousLoss::PairProduction(PairProductionLosses::new(
                self.pair_production_config.clone(),
                self.loss_photon_fields.clone(),
            )));
        }
        if self.include_adiabatic_losses {
            losses.push(ContinuousLoss::Adiabatic(self.create_cosmology()));
        }
        losses
    }

    pub fn create_interactions(&self) -> PhotoPionProduction {
        PhotoPionProduction::new(
            self.photo_pion_config.clone(),
            self.cross_section.clone(),
            self.interaction_photon_fields.clone(),
        )
    }

    /// Builds the initial population and a propagator owning it.
    pub fn create_propagator(&self) -> Propagator {
        let mut rng = RandomNumberGenerator::new(self.seed);
        let stack = self.initial_population.build(&mut rng);
        Propagator::new(
            self.propagation_config.clone(),
            stack,
            rng,
            self.create_cosmology(),
            self.create_losses(),
            self.create_interactions(),
        )
    }

    /// Runs the simulation, returning the run statistics and the final population.
    pub fn run<S: StepRecordSink>(
        &self,
        sink: &mut S,
        verbosity: &Verbosity,
        max_steps: Option<usize>,
    ) -> io::Result<(RunSummary, ParticleStack)> {
        let mut propagator = self.create_propagator();
        let summary = propagator.run(sink, verbosity, max_steps)?;
        Ok((summary, propagator.into_stack()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::output::StepRecord;

    fn proton_simulator(seed: u64) -> PropagationSimulator {
        let mut simulator = PropagationSimulator::new(InitialPopulation::Single {
            pid: Pid::PROTON,
            redshift: 0.1,
            lorentz_factor: 1e11,
            n_particles: 1,
        });
        simulator.seed = seed;
        simulator
    }

    fn records_for_seed(seed: u64) -> Vec<StepRecord> {
        let mut records = Vec::new();
        proton_simulator(seed)
            .run(&mut records, &Verbosity::Quiet, None)
            .unwrap();
        records
    }

    #[test]
    fn same_seed_reproduces_records() {
        assert_eq!(records_for_seed(3), records_for_seed(3));
    }

    #[test]
    fn losses_can_be_disabled() {
        let mut simulator = proton_simulator(1);
        simulator.include_pair_production = false;
        assert_eq!(simulator.create_losses().len(), 1);
        simulator.include_adiabatic_losses = false;
        assert!(simulator.create_losses().is_empty());
    }

    #[test]
    fn random_population_is_built_from_seed() {
        let population = InitialPopulation::Random {
            pid: Pid::PROTON,
            n_particles: 10,
            max_redshift: 1.0,
            redshift_power: InitialPopulation::DEFAULT_REDSHIFT_POWER,
            min_energy: InitialPopulation::DEFAULT_MIN_ENERGY,
            max_energy: InitialPopulation::DEFAULT_MAX_ENERGY,
        };
        let stack_1 = population.build(&mut RandomNumberGenerator::new(4));
        let stack_2 = population.build(&mut RandomNumberGenerator::new(4));
        assert_eq!(stack_1, stack_2);
        assert_eq!(stack_1.len(), 10);
    }
}

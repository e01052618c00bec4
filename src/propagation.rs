//! Propagation of particle populations through redshift.
//!
//! Each step competes continuous energy losses against a stochastic
//! interaction. The continuous step is the largest redshift interval over
//! which the fractional loss of Lorentz factor stays below a critical value,
//! and the stochastic step is sampled from the exponential waiting time
//! distribution of the interaction. The shorter of the two is taken.

pub mod output;

use self::output::{StepRecord, StepRecordSink};
use crate::{
    cosmology::Cosmology,
    interactions::PhotoPionProduction,
    io::Verbosity,
    losses::{self, ContinuousLoss},
    math::find_root_bisection,
    particle::{Particle, ParticleStack, ParticleState},
    random::RandomNumberGenerator,
};
use indicatif::ProgressBar;
use std::{fmt, io};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Floating-point precision to use for propagation.
#[allow(non_camel_case_types)]
pub type fpr = f64;

/// Configuration parameters for propagation.
#[derive(Clone, Debug, PartialEq)]
pub struct PropagationConfig {
    /// Largest fractional loss of Lorentz factor allowed in a continuous step.
    pub critical_delta_gamma: fpr,
    /// Maximum number of bisections when searching for the continuous step.
    pub max_root_finding_iterations: u32,
    /// Largest acceptable deviation of the fractional loss from the critical value.
    pub root_finding_tolerance: fpr,
    /// Particles at or below this redshift are no longer propagated.
    pub min_redshift: fpr,
    /// Particles at or below this Lorentz factor are no longer propagated.
    pub min_lorentz_factor: fpr,
}

impl PropagationConfig {
    pub const DEFAULT_CRITICAL_DELTA_GAMMA: fpr = 0.1;
    pub const DEFAULT_MAX_ROOT_FINDING_ITERATIONS: u32 = 100;
    pub const DEFAULT_ROOT_FINDING_TOLERANCE: fpr = 1e-5;
    pub const DEFAULT_MIN_REDSHIFT: fpr = 1e-20;
    pub const DEFAULT_MIN_LORENTZ_FACTOR: fpr = 1e7;

    /// Panics if any of the configuration parameter values are invalid.
    pub fn validate(&self) {
        assert!(
            self.critical_delta_gamma > 0.0 && self.critical_delta_gamma < 1.0,
            "Critical fractional loss must be in the range (0, 1)."
        );
        assert!(
            self.max_root_finding_iterations > 0,
            "Maximum number of root finding iterations must be larger than zero."
        );
        assert!(
            self.root_finding_tolerance > 0.0,
            "Root finding tolerance must be larger than zero."
        );
        assert!(
            self.min_redshift >= 0.0,
            "Minimum redshift must be larger than or equal to zero."
        );
        assert!(
            self.min_lorentz_factor > 0.0,
            "Minimum Lorentz factor must be larger than zero."
        );
    }
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            critical_delta_gamma: Self::DEFAULT_CRITICAL_DELTA_GAMMA,
            max_root_finding_iterations: Self::DEFAULT_MAX_ROOT_FINDING_ITERATIONS,
            root_finding_tolerance: Self::DEFAULT_ROOT_FINDING_TOLERANCE,
            min_redshift: Self::DEFAULT_MIN_REDSHIFT,
            min_lorentz_factor: Self::DEFAULT_MIN_LORENTZ_FACTOR,
        }
    }
}

/// Which process a step was taken for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub enum StepBranch {
    Continuous,
    Stochastic,
}

impl StepBranch {
    /// Returns the marker identifying the branch in text output.
    pub fn marker(&self) -> u8 {
        match self {
            Self::Continuous => 0,
            Self::Stochastic => 1,
        }
    }
}

/// Candidate redshift intervals for a step and the resulting choice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepDecision {
    pub stochastic_interval: fpr,
    pub continuous_interval: fpr,
    pub branch: StepBranch,
}

impl StepDecision {
    /// Chooses the continuous branch unless the stochastic interval is both
    /// the shorter one and fits within the remaining redshift.
    pub fn new(stochastic_interval: fpr, continuous_interval: fpr, redshift: fpr) -> Self {
        let branch = if stochastic_interval > continuous_interval || stochastic_interval > redshift
        {
            StepBranch::Continuous
        } else {
            StepBranch::Stochastic
        };
        Self {
            stochastic_interval,
            continuous_interval,
            branch,
        }
    }
}

/// Statistics of a propagation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct RunSummary {
    /// Total number of steps taken.
    pub steps: usize,
    /// Number of steps taken with continuous losses.
    pub continuous_steps: usize,
    /// Number of steps ending in an interaction.
    pub interactions: usize,
    /// Number of particles produced in interactions.
    pub created_particles: usize,
    /// Number of continuous step searches that did not reach the tolerance.
    pub unconverged_root_solves: usize,
    /// Number of particles in the population after the run.
    pub final_population_size: usize,
    /// Whether the run was stopped by the step limit.
    pub step_limit_reached: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} steps ({} continuous, {} interactions), {} particles created, \
             {} unconverged step searches, {} particles in final population{}",
            self.steps,
            self.continuous_steps,
            self.interactions,
            self.created_particles,
            self.unconverged_root_solves,
            self.final_population_size,
            if self.step_limit_reached {
                " (stopped at step limit)"
            } else {
                ""
            }
        )
    }
}

/// Engine advancing a particle population through redshift.
#[derive(Debug)]
pub struct Propagator {
    config: PropagationConfig,
    stack: ParticleStack,
    rng: RandomNumberGenerator,
    cosmology: Cosmology,
    losses: Vec<ContinuousLoss>,
    interactions: PhotoPionProduction,
    summary: RunSummary,
}

impl Propagator {
    pub fn new(
        config: PropagationConfig,
        stack: ParticleStack,
        rng: RandomNumberGenerator,
        cosmology: Cosmology,
        losses: Vec<ContinuousLoss>,
        interactions: PhotoPionProduction,
    ) -> Self {
        config.validate();
        let summary = RunSummary {
            final_population_size: stack.len(),
            ..RunSummary::default()
        };
        Self {
            config,
            stack,
            rng,
            cosmology,
            losses,
            interactions,
            summary,
        }
    }

    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    pub fn stack(&self) -> &ParticleStack {
        &self.stack
    }

    pub fn into_stack(self) -> ParticleStack {
        self.stack
    }

    pub fn cosmology(&self) -> &Cosmology {
        &self.cosmology
    }

    pub fn losses(&self) -> &[ContinuousLoss] {
        &self.losses
    }

    pub fn interactions(&self) -> &PhotoPionProduction {
        &self.interactions
    }

    /// Returns the statistics accumulated so far.
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Whether the given particle should still be propagated.
    pub fn is_active(&self, particle: &Particle) -> bool {
        particle.is_nucleus()
            && particle.redshift() > self.config.min_redshift
            && particle.lorentz_factor() > self.config.min_lorentz_factor
    }

    /// Counts the particles that should still be propagated.
    pub fn count_active(&self) -> usize {
        self.stack.count(|particle| self.is_active(particle))
    }

    /// Estimates the fractional loss of Lorentz factor when the given particle
    /// moves from its current redshift `z` to `z - redshift_interval`.
    ///
    /// The loss rates are evaluated at the current Lorentz factor and
    /// integrated with Simpson's rule.
    pub fn compute_delta_gamma(&self, particle: &Particle, redshift_interval: fpr) -> fpr {
        let pid = particle.pid();
        let redshift = particle.redshift();
        let lorentz_factor = particle.lorentz_factor();
        let dtdz = self.cosmology.dtdz(redshift);

        let rate_at =
            |z: fpr| losses::total_dln_gamma_dt(&self.losses, pid, lorentz_factor, z);

        let now = rate_at(redshift);
        let half = rate_at(redshift - 0.5 * redshift_interval);
        let next = rate_at(redshift - redshift_interval);

        redshift_interval * dtdz * (now + 4.0 * half + next) / 6.0
    }

    /// Computes the redshift interval over which the fractional loss of
    /// Lorentz factor of the given particle reaches the critical value, or the
    /// full remaining redshift if the loss stays below it.
    pub fn compute_losses_redshift_interval(&self, particle: &Particle) -> fpr {
        self.solve_losses_redshift_interval(particle).0
    }

    fn solve_losses_redshift_interval(&self, particle: &Particle) -> (fpr, bool) {
        let redshift = particle.redshift();
        let critical = self.config.critical_delta_gamma;

        if self.compute_delta_gamma(particle, redshift) <= critical {
            return (redshift, true);
        }
        let estimate = find_root_bisection(
            |redshift_interval| self.compute_delta_gamma(particle, redshift_interval) - critical,
            0.0,
            redshift,
            self.config.max_root_finding_iterations,
            self.config.root_finding_tolerance,
        );
        (estimate.root, estimate.converged)
    }

    /// Samples the redshift interval until the next interaction of the given
    /// particle from a uniform random number in `[0, 1)`.
    pub fn compute_stochastic_redshift_interval(
        &self,
        particle: &Particle,
        random_number: fpr,
    ) -> fpr {
        let redshift = particle.redshift();
        let rate = self
            .interactions
            .rate(particle.pid(), particle.lorentz_factor(), redshift);
        let dtdz = self.cosmology.dtdz(redshift);
        debug_assert!(
            rate * dtdz >= 0.0,
            "Interaction rate {} and dt/dz {} have opposite signs",
            rate,
            dtdz
        );
        let mean_interval = fpr::abs(1.0 / rate / dtdz);
        -mean_interval * fpr::ln(1.0 - random_number)
    }

    /// Performs a single step for the first active particle, sending one
    /// record to the given sink.
    ///
    /// Returns `None` without doing anything if no particle is active.
    pub fn step<S: StepRecordSink>(&mut self, sink: &mut S) -> io::Result<Option<StepDecision>> {
        let idx = match self.stack.position(|particle| self.is_active(particle)) {
            Some(idx) => idx,
            None => return Ok(None),
        };

        let random_number = self.rng.uniform_open();

        let particle = &self.stack.particles()[idx];
        let redshift = particle.redshift();
        let lorentz_factor = particle.lorentz_factor();

        let stochastic_interval = self.compute_stochastic_redshift_interval(particle, random_number);
        assert!(
            stochastic_interval > 0.0,
            "Stochastic redshift interval must be positive, got {}",
            stochastic_interval
        );

        let (continuous_interval, converged) = self.solve_losses_redshift_interval(particle);
        assert!(
            continuous_interval > 0.0 && continuous_interval <= redshift,
            "Continuous redshift interval {} outside (0, {}]",
            continuous_interval,
            redshift
        );

        let decision = StepDecision::new(stochastic_interval, continuous_interval, redshift);
        sink.record(&StepRecord::new(particle, decision.branch))?;

        self.summary.steps += 1;
        if !converged {
            self.summary.unconverged_root_solves += 1;
        }

        match decision.branch {
            StepBranch::Continuous => {
                let delta_gamma = self.compute_delta_gamma(particle, continuous_interval);
                let new_state = ParticleState::new(
                    redshift - continuous_interval,
                    lorentz_factor * (1.0 - delta_gamma),
                );
                if let Some(particle) = self.stack.get_mut(idx) {
                    particle.set_now(new_state);
                }
                self.summary.continuous_steps += 1;
            }
            StepBranch::Stochastic => {
                let products = self.interactions.final_state(
                    particle,
                    redshift - stochastic_interval,
                    &mut self.rng,
                );
                self.summary.interactions += 1;
                self.summary.created_particles += products.len();
                self.stack.replace_with_products(idx, products);
            }
        }
        self.summary.final_population_size = self.stack.len();

        Ok(Some(decision))
    }

    /// Propagates until no particle is active or the optional step limit is
    /// reached, sending one record per step to the given sink.
    pub fn run<S: StepRecordSink>(
        &mut self,
        sink: &mut S,
        verbosity: &Verbosity,
        max_steps: Option<usize>,
    ) -> io::Result<RunSummary> {
        let mut n_active = self.count_active();

        if verbosity.print_messages() {
            println!(
                "Propagating {} particles ({} active)",
                self.stack.len(),
                n_active
            );
            if let (Some((min_z, max_z)), Some((min_e, max_e))) =
                (self.stack.redshift_range(), self.stack.energy_range())
            {
                println!(
                    "Redshift range: ({:.3e}, {:.3e}), energy range: ({:.3e}, {:.3e}) GeV",
                    min_z,
                    max_z,
                    min_e / crate::constants::GEV_TO_ERG,
                    max_e / crate::constants::GEV_TO_ERG
                );
            }
        }

        let progress_bar = verbosity.progress_style().map(|style| {
            let progress_bar = ProgressBar::new(self.stack.len() as u64);
            progress_bar.set_style(style.clone());
            progress_bar
        });

        while n_active > 0 {
            if max_steps.map_or(false, |max_steps| self.summary.steps >= max_steps) {
                self.summary.step_limit_reached = true;
                break;
            }
            self.step(sink)?;
            n_active = self.count_active();

            if let Some(progress_bar) = &progress_bar {
                progress_bar.set_length(self.stack.len() as u64);
                progress_bar.set_position((self.stack.len() - n_active) as u64);
            }
        }
        sink.finish()?;

        if let Some(progress_bar) = progress_bar {
            progress_bar.finish();
        }
        if verbosity.print_messages() {
            println!("Finished propagation: {}", self.summary);
        }
        if self.summary.unconverged_root_solves > 0 {
            eprintln!(
                "Warning: {} continuous step searches did not converge",
                self.summary.unconverged_root_solves
            );
        }
        Ok(self.summary.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        interactions::{cross_section::CrossSection, PhotoPionConfig},
        losses::pair_production::{PairProductionConfig, PairProductionLosses},
        particle::Pid,
        photon_field::PhotonField,
    };
    use approx::assert_relative_eq;

    fn create_propagator(stack: ParticleStack, losses: Vec<ContinuousLoss>) -> Propagator {
        Propagator::new(
            PropagationConfig::default(),
            stack,
            RandomNumberGenerator::new(10),
            Cosmology::default(),
            losses,
            PhotoPionProduction::new(
                PhotoPionConfig::default(),
                CrossSection::AtoyanDermer,
                vec![PhotonField::Cmb],
            ),
        )
    }

    fn default_losses() -> Vec<ContinuousLoss> {
        vec![
            ContinuousLoss::PairProduction(PairProductionLosses::new(
                PairProductionConfig::default(),
                vec![PhotonField::Cmb, PhotonField::default_ebl()],
            )),
            ContinuousLoss::Adiabatic(Cosmology::default()),
        ]
    }

    #[test]
    fn activity_requires_nucleus_redshift_and_energy() {
        let propagator = create_propagator(ParticleStack::new(), Vec::new());
        assert!(propagator.is_active(&Particle::new(Pid::PROTON, 1.0, 1e12)));
        assert!(!propagator.is_active(&Particle::new(Pid::NeutralPion, 1.0, 1e12)));
        assert!(!propagator.is_active(&Particle::new(Pid::PROTON, 0.0, 1e12)));
        assert!(!propagator.is_active(&Particle::new(Pid::PROTON, 1.0, 1e7)));
    }

    #[test]
    fn step_decision_prefers_shorter_interval_within_redshift() {
        assert_eq!(
            StepDecision::new(0.1, 0.2, 1.0).branch,
            StepBranch::Stochastic
        );
        assert_eq!(
            StepDecision::new(0.3, 0.2, 1.0).branch,
            StepBranch::Continuous
        );
        assert_eq!(
            StepDecision::new(0.3, 0.3, 0.2).branch,
            StepBranch::Continuous
        );
    }

    #[test]
    fn adiabatic_delta_gamma_matches_scale_factor_change() {
        let cosmology = Cosmology::default();
        let propagator = create_propagator(
            ParticleStack::new(),
            vec![ContinuousLoss::Adiabatic(cosmology.clone())],
        );
        let particle = Particle::new(Pid::PROTON, 0.01, 1e9);
        let delta_gamma = propagator.compute_delta_gamma(&particle, 0.001);
        let exact = 1.0 - cosmology.adiabatic_relative_loss(0.01, 0.009);
        assert_relative_eq!(delta_gamma, exact, max_relative = 1e-3);
    }

    #[test]
    fn zero_losses_give_full_redshift_interval() {
        let propagator = create_propagator(ParticleStack::new(), Vec::new());
        let particle = Particle::new(Pid::PROTON, 0.7, 1e10);
        assert_eq!(propagator.compute_delta_gamma(&particle, 0.7), 0.0);
        assert_eq!(propagator.compute_losses_redshift_interval(&particle), 0.7);
    }

    #[test]
    fn continuous_interval_limits_fractional_loss() {
        let propagator = create_propagator(ParticleStack::new(), default_losses());
        let particle = Particle::new(Pid::PROTON, 3.0, 1e10);
        let interval = propagator.compute_losses_redshift_interval(&particle);
        assert!(interval > 0.0 && interval < 3.0);
        assert_relative_eq!(
            propagator.compute_delta_gamma(&particle, interval),
            0.1,
            epsilon = 1e-5
        );
    }

    #[test]
    fn stochastic_interval_follows_exponential_law() {
        let propagator = create_propagator(ParticleStack::new(), Vec::new());
        let particle = Particle::new(Pid::PROTON, 0.5, 1e12);
        let mean_interval = 1.0
            / (propagator
                .interactions()
                .rate(Pid::PROTON, 1e12, 0.5)
                * propagator.cosmology().dtdz(0.5));

        let mut rng = RandomNumberGenerator::new(123);
        let n_samples = 20000;
        let mean = (0..n_samples)
            .map(|_| propagator.compute_stochastic_redshift_interval(&particle, rng.uniform_open()))
            .sum::<fpr>()
            / (n_samples as fpr);
        assert_relative_eq!(mean, mean_interval, max_relative = 0.03);
        assert_relative_eq!(
            propagator.compute_stochastic_redshift_interval(&particle, 1.0 - (-1.0_f64).exp()),
            mean_interval,
            max_relative = 1e-12
        );
    }

    #[test]
    fn below_threshold_particles_never_interact() {
        let propagator = create_propagator(ParticleStack::new(), Vec::new());
        let particle = Particle::new(Pid::PROTON, 0.5, 1e8);
        let interval = propagator.compute_stochastic_redshift_interval(&particle, 0.5);
        assert!(interval.is_infinite() && interval > 0.0);
    }

    #[test]
    fn step_emits_one_record_and_conserves_population() {
        let mut propagator = create_propagator(
            ParticleStack::single(Pid::PROTON, 1.0, 1e12, 2),
            default_losses(),
        );
        let mut records = Vec::new();
        for _ in 0..12 {
            let n_before = propagator.stack().len();
            let created_before = propagator.summary().created_particles;
            let decision = propagator.step(&mut records).unwrap().unwrap();
            let n_created = propagator.summary().created_particles - created_before;
            match decision.branch {
                StepBranch::Continuous => assert_eq!(propagator.stack().len(), n_before),
                StepBranch::Stochastic => {
                    assert_eq!(propagator.stack().len(), n_before - 1 + n_created)
                }
            }
        }
        assert_eq!(records.len(), 12);
        assert_eq!(propagator.summary().steps, 12);
    }

    #[test]
    fn run_terminates_with_no_active_particles() {
        let mut propagator = create_propagator(
            ParticleStack::single(Pid::PROTON, 0.05, 1e11, 3),
            default_losses(),
        );
        let mut records = Vec::new();
        let summary = propagator
            .run(&mut records, &Verbosity::Quiet, None)
            .unwrap();
        assert_eq!(propagator.count_active(), 0);
        assert_eq!(summary.steps, records.len());
        assert_eq!(
            summary.steps,
            summary.continuous_steps + summary.interactions
        );
        assert_eq!(summary.final_population_size, propagator.stack().len());
        assert!(!summary.step_limit_reached);
    }

    #[test]
    fn run_stops_at_step_limit() {
        let mut propagator = create_propagator(
            ParticleStack::single(Pid::PROTON, 1.0, 1e12, 5),
            default_losses(),
        );
        let mut records = Vec::new();
        let summary = propagator
            .run(&mut records, &Verbosity::Quiet, Some(7))
            .unwrap();
        assert_eq!(summary.steps, 7);
        assert_eq!(records.len(), 7);
        assert!(summary.step_limit_reached);
    }

    #[test]
    fn inactive_population_takes_no_steps() {
        let mut propagator = create_propagator(
            ParticleStack::single(Pid::NeutralPion, 1.0, 1e12, 4),
            default_losses(),
        );
        let mut records = Vec::new();
        assert!(propagator.step(&mut records).unwrap().is_none());
        let summary = propagator
            .run(&mut records, &Verbosity::Quiet, None)
            .unwrap();
        assert_eq!(summary.steps, 0);
        assert!(records.is_empty());
    }
}

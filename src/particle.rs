//! Propagating particles and particle populations.

use crate::{
    constants::{MC2_NUCLEON, MC2_PION_CHARGED, MC2_PION_NEUTRAL, MC2_PROTON},
    io::utils as io_utils,
    random::RandomNumberGenerator,
};
use std::{
    fmt,
    io::{self, Write},
    path::Path,
    str::FromStr,
};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Floating-point precision to use for particle properties.
#[allow(non_camel_case_types)]
pub type fpt = f64;

/// Identifies the species of a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub enum Pid {
    /// A nucleus (or free nucleon) with the given charge and mass number.
    Nucleus { charge: u32, mass_number: u32 },
    NeutralPion,
    PositivePion,
    NegativePion,
}

impl Pid {
    pub const PROTON: Self = Self::Nucleus {
        charge: 1,
        mass_number: 1,
    };
    pub const NEUTRON: Self = Self::Nucleus {
        charge: 0,
        mass_number: 1,
    };

    /// Creates the identifier of the nucleus with the given charge and mass number.
    pub fn nucleus(charge: u32, mass_number: u32) -> Self {
        assert!(mass_number > 0, "Mass number must be larger than zero");
        assert!(
            charge <= mass_number,
            "Nuclear charge {} exceeds mass number {}",
            charge,
            mass_number
        );
        Self::Nucleus {
            charge,
            mass_number,
        }
    }

    pub fn is_nucleus(&self) -> bool {
        matches!(self, Self::Nucleus { .. })
    }

    /// Returns the nuclear charge, or zero for particles that are not nuclei.
    pub fn nucleus_charge(&self) -> u32 {
        match self {
            Self::Nucleus { charge, .. } => *charge,
            _ => 0,
        }
    }

    /// Returns the nuclear mass number, or zero for particles that are not nuclei.
    pub fn nucleus_mass_number(&self) -> u32 {
        match self {
            Self::Nucleus { mass_number, .. } => *mass_number,
            _ => 0,
        }
    }

    /// Returns the rest energy of the particle [erg].
    pub fn rest_energy(&self) -> fpt {
        match *self {
            Self::PROTON => MC2_PROTON,
            Self::Nucleus { mass_number, .. } => (mass_number as fpt) * MC2_NUCLEON,
            Self::NeutralPion => MC2_PION_NEUTRAL,
            Self::PositivePion | Self::NegativePion => MC2_PION_CHARGED,
        }
    }

    /// Returns the Particle Data Group code of the particle.
    ///
    /// Nuclei use the `10LZZZAAAI` scheme, so a proton is `1000010010`.
    pub fn pdg_code(&self) -> i64 {
        match self {
            Self::Nucleus {
                charge,
                mass_number,
            } => 1_000_000_000 + 10_000 * (*charge as i64) + 10 * (*mass_number as i64),
            Self::NeutralPion => 111,
            Self::PositivePion => 211,
            Self::NegativePion => -211,
        }
    }

    /// Creates an identifier from a Particle Data Group code.
    pub fn from_pdg_code(code: i64) -> Option<Self> {
        match code {
            111 => Some(Self::NeutralPion),
            211 => Some(Self::PositivePion),
            -211 => Some(Self::NegativePion),
            2212 => Some(Self::PROTON),
            2112 => Some(Self::NEUTRON),
            1_000_000_000..=1_999_999_999 => {
                let charge = ((code / 10_000) % 1000) as u32;
                let mass_number = ((code / 10) % 1000) as u32;
                if mass_number > 0 && charge <= mass_number {
                    Some(Self::nucleus(charge, mass_number))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl FromStr for Pid {
    type Err = String;

    /// Parses a species name (`proton`, `neutron`, `helium`, `nitrogen`,
    /// `silicon`, `iron`, `pi0`, `pi+`, `pi-`) or a PDG code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proton" | "p" => Ok(Self::PROTON),
            "neutron" | "n" => Ok(Self::NEUTRON),
            "helium" | "he" => Ok(Self::nucleus(2, 4)),
            "nitrogen" | "n14" => Ok(Self::nucleus(7, 14)),
            "silicon" | "si" => Ok(Self::nucleus(14, 28)),
            "iron" | "fe" => Ok(Self::nucleus(26, 56)),
            "pi0" => Ok(Self::NeutralPion),
            "pi+" => Ok(Self::PositivePion),
            "pi-" => Ok(Self::NegativePion),
            other => other
                .parse::<i64>()
                .ok()
                .and_then(Self::from_pdg_code)
                .ok_or_else(|| format!("Unknown particle species {}", s)),
        }
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Nucleus {
                charge,
                mass_number,
            } => write!(f, "nucleus(Z={}, A={})", charge, mass_number),
            Self::NeutralPion => write!(f, "pi0"),
            Self::PositivePion => write!(f, "pi+"),
            Self::NegativePion => write!(f, "pi-"),
        }
    }
}

/// Kinematic state of a particle at a given redshift.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct ParticleState {
    pub redshift: fpt,
    pub lorentz_factor: fpt,
}

impl ParticleState {
    pub fn new(redshift: fpt, lorentz_factor: fpt) -> Self {
        Self {
            redshift,
            lorentz_factor,
        }
    }
}

/// A propagating particle, remembering the state it was created with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Particle {
    pid: Pid,
    initial: ParticleState,
    now: ParticleState,
}

impl Particle {
    /// Creates a new particle with the given species, redshift and Lorentz factor.
    pub fn new(pid: Pid, redshift: fpt, lorentz_factor: fpt) -> Self {
        assert!(
            redshift >= 0.0,
            "Particle redshift must be non-negative, got {}",
            redshift
        );
        let state = ParticleState::new(redshift, lorentz_factor);
        Self {
            pid,
            initial: state,
            now: state,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn is_nucleus(&self) -> bool {
        self.pid.is_nucleus()
    }

    pub fn initial(&self) -> &ParticleState {
        &self.initial
    }

    pub fn now(&self) -> &ParticleState {
        &self.now
    }

    pub fn redshift(&self) -> fpt {
        self.now.redshift
    }

    pub fn lorentz_factor(&self) -> fpt {
        self.now.lorentz_factor
    }

    /// Returns the current total energy of the particle [erg].
    pub fn energy(&self) -> fpt {
        self.now.lorentz_factor * self.pid.rest_energy()
    }

    /// Moves the particle to the given state.
    pub fn set_now(&mut self, state: ParticleState) {
        self.now = state;
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {:e} {:e} {:e} {:e}",
            self.pid.pdg_code(),
            self.initial.redshift,
            self.initial.lorentz_factor,
            self.now.redshift,
            self.now.lorentz_factor
        )
    }
}

/// An ordered population of particles.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct ParticleStack {
    particles: Vec<Particle>,
}

impl ParticleStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stack of `n_particles` identical particles.
    pub fn single(pid: Pid, redshift: fpt, lorentz_factor: fpt, n_particles: usize) -> Self {
        Self {
            particles: vec![Particle::new(pid, redshift, lorentz_factor); n_particles],
        }
    }

    /// Creates a stack of `n_particles` particles with random initial states.
    ///
    /// Redshifts are drawn as `max_redshift*r^(1/redshift_power)`, giving a
    /// density proportional to `z^(redshift_power - 1)`. Energies [erg] are drawn
    /// uniformly in the logarithm between the given bounds.
    pub fn random(
        pid: Pid,
        n_particles: usize,
        max_redshift: fpt,
        redshift_power: fpt,
        energy_range: (fpt, fpt),
        rng: &mut RandomNumberGenerator,
    ) -> Self {
        assert!(max_redshift > 0.0, "Maximum redshift must be positive");
        assert!(redshift_power > 0.0, "Redshift power must be positive");
        let (min_energy, max_energy) = energy_range;
        assert!(
            min_energy > 0.0 && max_energy >= min_energy,
            "Invalid energy range ({}, {})",
            min_energy,
            max_energy
        );
        let ln_energy_ratio = fpt::ln(max_energy / min_energy);
        let rest_energy = pid.rest_energy();

        let particles = (0..n_particles)
            .map(|_| {
                let redshift = max_redshift * fpt::powf(rng.uniform(), 1.0 / redshift_power);
                let energy = min_energy * fpt::exp(ln_energy_ratio * rng.uniform());
                Particle::new(pid, redshift, energy / rest_energy)
            })
            .collect();
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Particle> {
        self.particles.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Particle> {
        self.particles.get_mut(idx)
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Returns the index of the first particle satisfying the given predicate.
    pub fn position<P: Fn(&Particle) -> bool>(&self, predicate: P) -> Option<usize> {
        self.particles.iter().position(predicate)
    }

    /// Counts the particles satisfying the given predicate.
    pub fn count<P: Fn(&Particle) -> bool>(&self, predicate: P) -> usize {
        self.particles.iter().filter(|&p| predicate(p)).count()
    }

    /// Removes the particle at the given index and inserts the given products
    /// at the front of the stack, returning the removed particle.
    pub fn replace_with_products(&mut self, idx: usize, products: Vec<Particle>) -> Particle {
        let removed = self.particles.remove(idx);
        self.particles.splice(0..0, products);
        removed
    }

    /// Returns the smallest and largest current redshift, or `None` if empty.
    pub fn redshift_range(&self) -> Option<(fpt, fpt)> {
        Self::range_of(self.particles.iter().map(Particle::redshift))
    }

    /// Returns the smallest and largest current energy [erg], or `None` if empty.
    pub fn energy_range(&self) -> Option<(fpt, fpt)> {
        Self::range_of(self.particles.iter().map(Particle::energy))
    }

    fn range_of<I: Iterator<Item = fpt>>(values: I) -> Option<(fpt, fpt)> {
        values.fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((fpt::min(min, value), fpt::max(max, value))),
        })
    }

    /// Writes one line per particle to the given writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "# pid - initial redshift - initial Lorentz factor - redshift - Lorentz factor"
        )?;
        for particle in &self.particles {
            writeln!(writer, "{}", particle)?;
        }
        Ok(())
    }

    /// Writes one line per particle to the given file.
    pub fn dump_to_file<P: AsRef<Path>>(&self, file_path: P) -> io::Result<()> {
        let mut writer = io_utils::create_file_and_map_err(file_path)?;
        self.write_to(&mut writer)?;
        writer.flush()
    }

    /// Serializes the particles into JSON format and saves them at the given path.
    #[cfg(feature = "json")]
    pub fn save_as_json<P: AsRef<Path>>(&self, file_path: P) -> io::Result<()> {
        io_utils::save_data_as_json(file_path, self)
    }
}

impl From<Vec<Particle>> for ParticleStack {
    fn from(particles: Vec<Particle>) -> Self {
        Self { particles }
    }
}

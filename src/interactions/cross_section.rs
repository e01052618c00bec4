//! Photo-pion production cross sections.
//!
//! Photon energies here are measured in the rest frame of the struck nucleon.
//! Every cross section is split into a resonance part and a multi-pion part,
//! each with its own inelasticity.

use super::fxs;
use crate::{
    constants::{GEV_TO_ERG, MEV_TO_ERG, MICROBARN_TO_CM2},
    interpolation::LookupTable1,
    math::integrate_five_point_gauss_legendre,
};
use std::{io, path::Path};

/// Pair of values for the resonance and multi-pion channels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelPair {
    pub resonance: fxs,
    pub multi_pion: fxs,
}

impl ChannelPair {
    pub fn total(&self) -> fxs {
        self.resonance + self.multi_pion
    }
}

/// A photo-pion production cross section.
#[derive(Clone, Debug)]
pub enum CrossSection {
    /// Step-function approximation of Atoyan & Dermer (2003).
    AtoyanDermer,
    /// Cross section read from a table.
    Tabulated(TabulatedCrossSection),
}

impl CrossSection {
    /// Threshold photon energy for pion production [erg].
    pub const THRESHOLD_ENERGY: fxs = 200.0 * MEV_TO_ERG;
    /// Photon energy separating the resonance and multi-pion regimes [erg].
    pub const MULTI_PION_ENERGY: fxs = 500.0 * MEV_TO_ERG;
    /// Cross section in the resonance regime of the step approximation [cm^2].
    pub const RESONANCE_CROSS_SECTION: fxs = 340.0 * MICROBARN_TO_CM2;
    /// Cross section in the multi-pion regime of the step approximation [cm^2].
    pub const MULTI_PION_CROSS_SECTION: fxs = 120.0 * MICROBARN_TO_CM2;
    /// Fraction of the nucleon energy lost in a resonance interaction.
    pub const RESONANCE_INELASTICITY: fxs = 0.2;
    /// Fraction of the nucleon energy lost in a multi-pion interaction.
    pub const MULTI_PION_INELASTICITY: fxs = 0.6;

    pub fn name(&self) -> &'static str {
        match self {
            Self::AtoyanDermer => "Atoyan-Dermer",
            Self::Tabulated(_) => "tabulated",
        }
    }

    /// Returns the cross section [cm^2] at the given photon energy [erg].
    pub fn evaluate(&self, photon_energy: fxs) -> fxs {
        match self {
            Self::AtoyanDermer => {
                if photon_energy < Self::THRESHOLD_ENERGY {
                    0.0
                } else if photon_energy < Self::MULTI_PION_ENERGY {
                    Self::RESONANCE_CROSS_SECTION
                } else {
                    Self::MULTI_PION_CROSS_SECTION
                }
            }
            Self::Tabulated(table) => table.evaluate(photon_energy),
        }
    }

    /// Computes `Φ(ε) = ∫ ε'σ(ε') dε'` from zero up to the given photon energy
    /// [erg^2 cm^2], split into the resonance and multi-pion contributions.
    pub fn phi(&self, photon_energy: fxs) -> ChannelPair {
        match self {
            Self::AtoyanDermer => {
                let resonance_end = fxs::min(photon_energy, Self::MULTI_PION_ENERGY);
                let resonance = if resonance_end > Self::THRESHOLD_ENERGY {
                    0.5 * Self::RESONANCE_CROSS_SECTION
                        * (resonance_end * resonance_end
                            - Self::THRESHOLD_ENERGY * Self::THRESHOLD_ENERGY)
                } else {
                    0.0
                };
                let multi_pion = if photon_energy > Self::MULTI_PION_ENERGY {
                    0.5 * Self::MULTI_PION_CROSS_SECTION
                        * (photon_energy * photon_energy
                            - Self::MULTI_PION_ENERGY * Self::MULTI_PION_ENERGY)
                } else {
                    0.0
                };
                ChannelPair {
                    resonance,
                    multi_pion,
                }
            }
            Self::Tabulated(table) => {
                let resonance = table.cumulative(fxs::min(photon_energy, Self::MULTI_PION_ENERGY));
                let multi_pion = if photon_energy > Self::MULTI_PION_ENERGY {
                    table.cumulative(photon_energy) - table.cumulative(Self::MULTI_PION_ENERGY)
                } else {
                    0.0
                };
                ChannelPair {
                    resonance,
                    multi_pion,
                }
            }
        }
    }

    /// Smallest photon energy with non-zero cross section [erg].
    pub fn threshold_energy(&self) -> fxs {
        match self {
            Self::AtoyanDermer => Self::THRESHOLD_ENERGY,
            Self::Tabulated(table) => table.table.min_coord(),
        }
    }
}

/// A cross section given by a table, with a precomputed cumulative `Φ`.
#[derive(Clone, Debug)]
pub struct TabulatedCrossSection {
    table: LookupTable1,
    cumulative: Vec<fxs>,
}

impl TabulatedCrossSection {
    /// Reads a cross section from a text file with two columns: photon energy
    /// in the nucleon rest frame [GeV] and cross section [μb].
    ///
    /// The cross section is interpolated linearly inside the table, vanishes
    /// below it and keeps its last value above it.
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> io::Result<Self> {
        let file_path = file_path.as_ref();
        let table = LookupTable1::from_text_file(file_path, GEV_TO_ERG, MICROBARN_TO_CM2)?;
        if table.min_coord() <= 0.0 || table.values().iter().any(|&value| value < 0.0) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Cross section table {} must have positive energies and non-negative values",
                    file_path.display()
                ),
            ));
        }
        Ok(Self::from_table(table))
    }

    pub fn from_table(table: LookupTable1) -> Self {
        let coords = table.coords();
        let mut cumulative = Vec::with_capacity(coords.len());
        let mut sum = 0.0;
        cumulative.push(sum);
        for idx in 1..coords.len() {
            sum += integrate_five_point_gauss_legendre(
                |energy| energy * table.linear(energy).unwrap_or(0.0),
                coords[idx - 1],
                coords[idx],
            );
            cumulative.push(sum);
        }
        Self { table, cumulative }
    }

    pub fn evaluate(&self, photon_energy: fxs) -> fxs {
        if photon_energy < self.table.min_coord() {
            0.0
        } else {
            self.table
                .linear(photon_energy)
                .unwrap_or_else(|| self.last_value())
        }
    }

    fn last_value(&self) -> fxs {
        let values = self.table.values();
        values[values.len() - 1]
    }

    /// Computes `∫ ε'σ(ε') dε'` from zero up to the given photon energy [erg^2 cm^2].
    pub fn cumulative(&self, photon_energy: fxs) -> fxs {
        let coords = self.table.coords();
        if photon_energy <= self.table.min_coord() {
            return 0.0;
        }
        let max_coord = self.table.max_coord();
        if photon_energy >= max_coord {
            let total = self.cumulative[self.cumulative.len() - 1];
            return total
                + 0.5 * self.last_value() * (photon_energy * photon_energy - max_coord * max_coord);
        }
        let lower_idx = coords
            .iter()
            .rposition(|&coord| coord <= photon_energy)
            .unwrap_or(0);
        self.cumulative[lower_idx]
            + integrate_five_point_gauss_legendre(
                |energy| energy * self.evaluate(energy),
                coords[lower_idx],
                photon_energy,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn step_cross_section_has_expected_regimes() {
        let cross_section = CrossSection::AtoyanDermer;
        assert_eq!(cross_section.evaluate(100.0 * MEV_TO_ERG), 0.0);
        assert_relative_eq!(
            cross_section.evaluate(300.0 * MEV_TO_ERG),
            340.0 * MICROBARN_TO_CM2
        );
        assert_relative_eq!(
            cross_section.evaluate(1000.0 * MEV_TO_ERG),
            120.0 * MICROBARN_TO_CM2
        );
    }

    #[test]
    fn step_phi_is_split_at_multi_pion_energy() {
        let cross_section = CrossSection::AtoyanDermer;
        assert_eq!(cross_section.phi(150.0 * MEV_TO_ERG).total(), 0.0);

        let below = cross_section.phi(400.0 * MEV_TO_ERG);
        assert_eq!(below.multi_pion, 0.0);
        assert_relative_eq!(
            below.resonance,
            0.5 * 340.0 * MICROBARN_TO_CM2 * (400.0_f64.powi(2) - 200.0_f64.powi(2))
                * MEV_TO_ERG
                * MEV_TO_ERG,
            max_relative = 1e-12
        );

        let above = cross_section.phi(800.0 * MEV_TO_ERG);
        assert_relative_eq!(
            above.resonance,
            cross_section.phi(500.0 * MEV_TO_ERG).resonance
        );
        assert!(above.multi_pion > 0.0);
    }

    #[test]
    fn tabulated_step_reproduces_analytical_phi() {
        let energies = vec![0.2, 0.5 - 1e-9, 0.5, 10.0];
        let values = vec![340.0, 340.0, 120.0, 120.0];
        let table = LookupTable1::new(
            energies.iter().map(|e| e * GEV_TO_ERG).collect(),
            values.iter().map(|v| v * MICROBARN_TO_CM2).collect(),
        )
        .unwrap();
        let tabulated = CrossSection::Tabulated(TabulatedCrossSection::from_table(table));
        let analytical = CrossSection::AtoyanDermer;

        for energy in [0.3, 0.7, 5.0, 20.0] {
            let photon_energy = energy * GEV_TO_ERG;
            assert_relative_eq!(
                tabulated.phi(photon_energy).total(),
                analytical.phi(photon_energy).total(),
                max_relative = 1e-6
            );
        }
    }
}

//! Continuous energy loss processes.

pub mod pair_production;

use self::pair_production::PairProductionLosses;
use crate::{cosmology::Cosmology, particle::Pid};

/// Floating-point precision to use for energy losses.
#[allow(non_camel_case_types)]
pub type flo = f64;

/// A process continuously reducing the Lorentz factor of a particle.
#[derive(Clone, Debug)]
pub enum ContinuousLoss {
    /// Electron-positron pair production on photon backgrounds.
    PairProduction(PairProductionLosses),
    /// Redshifting from the expansion of the universe.
    Adiabatic(Cosmology),
}

impl ContinuousLoss {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PairProduction(_) => "pair production",
            Self::Adiabatic(_) => "adiabatic",
        }
    }

    /// Computes the relative loss rate `d(lnΓ)/dt` [1/s] for the given
    /// species, Lorentz factor and redshift.
    pub fn dln_gamma_dt(&self, pid: Pid, lorentz_factor: flo, redshift: flo) -> flo {
        match self {
            Self::PairProduction(losses) => losses.dln_gamma_dt(pid, lorentz_factor, redshift),
            Self::Adiabatic(cosmology) => cosmology.hubble_rate(redshift),
        }
    }
}

/// Computes the total relative loss rate summed over the given processes.
pub fn total_dln_gamma_dt(
    losses: &[ContinuousLoss],
    pid: Pid,
    lorentz_factor: flo,
    redshift: flo,
) -> flo {
    losses
        .iter()
        .map(|loss| loss.dln_gamma_dt(pid, lorentz_factor, redshift))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{losses::pair_production::PairProductionConfig, photon_field::PhotonField};
    use approx::assert_relative_eq;

    #[test]
    fn adiabatic_rate_equals_hubble_rate() {
        let cosmology = Cosmology::default();
        let loss = ContinuousLoss::Adiabatic(cosmology.clone());
        assert_relative_eq!(
            loss.dln_gamma_dt(Pid::PROTON, 1e10, 2.0),
            cosmology.hubble_rate(2.0)
        );
    }

    #[test]
    fn processes_are_additive() {
        let cosmology = Cosmology::default();
        let pair_production = ContinuousLoss::PairProduction(PairProductionLosses::new(
            PairProductionConfig::default(),
            vec![PhotonField::Cmb],
        ));
        let adiabatic = ContinuousLoss::Adiabatic(cosmology);
        let total = total_dln_gamma_dt(
            &[pair_production.clone(), adiabatic.clone()],
            Pid::PROTON,
            1e10,
            1.0,
        );
        assert_relative_eq!(
            total,
            pair_production.dln_gamma_dt(Pid::PROTON, 1e10, 1.0)
                + adiabatic.dln_gamma_dt(Pid::PROTON, 1e10, 1.0)
        );
        assert_eq!(total_dln_gamma_dt(&[], Pid::PROTON, 1e10, 1.0), 0.0);
    }
}

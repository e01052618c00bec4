//! Photon fields read from tables.

use super::fph;
use crate::{constants::EV_TO_ERG, interpolation::LookupTable1};
use std::{io, path::Path};

/// A photon field given by a table of number density per unit photon energy.
#[derive(Clone, Debug)]
pub struct TabulatedPhotonField {
    name: String,
    table: LookupTable1,
}

impl TabulatedPhotonField {
    /// Reads a photon field from a text file with two columns: photon energy
    /// [eV] and number density per unit photon energy [1/(eV cm^3)].
    ///
    /// The field is named after the file stem.
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> io::Result<Self> {
        let file_path = file_path.as_ref();
        let table = LookupTable1::from_text_file(file_path, EV_TO_ERG, 1.0 / EV_TO_ERG)?;
        if table.coords()[0] <= 0.0 || table.values().iter().any(|&value| value < 0.0) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Photon field table {} must have positive energies and non-negative densities",
                    file_path.display()
                ),
            ));
        }
        let name = file_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tabulated".to_string());
        Ok(Self { name, table })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_photon_energy(&self) -> fph {
        self.table.min_coord()
    }

    pub fn max_photon_energy(&self) -> fph {
        self.table.max_coord()
    }

    /// Interpolates the density [1/(erg cm^3)] log-linearly in the table,
    /// returning zero outside of it.
    pub fn density(&self, photon_energy: fph) -> fph {
        self.table.log_log(photon_energy).unwrap_or(0.0)
    }
}

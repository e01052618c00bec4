//! Interpolation in tabulated one-dimensional functions.

use crate::io::utils as io_utils;
use ndarray::prelude::*;
use std::{io, path::Path};

/// Floating-point precision to use for interpolation.
#[allow(non_camel_case_types)]
pub type fip = f64;

/// A function tabulated at strictly increasing coordinates.
#[derive(Clone, Debug)]
pub struct LookupTable1 {
    coords: Array1<fip>,
    values: Array1<fip>,
}

impl LookupTable1 {
    /// Creates a new table from the given coordinates and values.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidData` error if the columns differ in length, contain
    /// fewer than two entries, contain non-finite numbers or if the coordinates
    /// are not strictly increasing.
    pub fn new(coords: Vec<fip>, values: Vec<fip>) -> io::Result<Self> {
        if coords.len() != values.len() {
            return Err(invalid_data(format!(
                "Number of coordinates ({}) and values ({}) differ",
                coords.len(),
                values.len()
            )));
        }
        if coords.len() < 2 {
            return Err(invalid_data(
                "A lookup table needs at least two entries".to_string(),
            ));
        }
        if coords.iter().chain(values.iter()).any(|x| !x.is_finite()) {
            return Err(invalid_data(
                "Lookup table contains non-finite numbers".to_string(),
            ));
        }
        if coords.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(invalid_data(
                "Lookup table coordinates are not strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            coords: Array1::from(coords),
            values: Array1::from(values),
        })
    }

    /// Reads a table from a text file with (at least) two whitespace separated
    /// columns, multiplying the coordinates and values with the given scales.
    pub fn from_text_file<P: AsRef<Path>>(
        file_path: P,
        coord_scale: fip,
        value_scale: fip,
    ) -> io::Result<Self> {
        let file_path = file_path.as_ref();
        let text = io_utils::read_text_file(file_path)?;
        let mut columns = io_utils::parse_numerical_columns(&text, 2).map_err(|err| {
            invalid_data(format!("Invalid table in {}: {}", file_path.display(), err))
        })?;
        let values = columns.pop().unwrap_or_default();
        let coords = columns.pop().unwrap_or_default();
        Self::new(
            coords.into_iter().map(|x| x * coord_scale).collect(),
            values.into_iter().map(|y| y * value_scale).collect(),
        )
        .map_err(|err| invalid_data(format!("Invalid table in {}: {}", file_path.display(), err)))
    }

    pub fn coords(&self) -> ArrayView1<fip> {
        self.coords.view()
    }

    pub fn values(&self) -> ArrayView1<fip> {
        self.values.view()
    }

    pub fn min_coord(&self) -> fip {
        self.coords[0]
    }

    pub fn max_coord(&self) -> fip {
        self.coords[self.coords.len() - 1]
    }

    /// Finds the index of the lower node of the table segment containing `coord`,
    /// or `None` if `coord` lies outside the table.
    fn find_segment(&self, coord: fip) -> Option<usize> {
        if !(coord >= self.min_coord() && coord <= self.max_coord()) {
            return None;
        }
        let coords = self
            .coords
            .as_slice()
            .expect("Lookup table coordinates not contiguous");
        let upper_idx = coords.partition_point(|&x| x <= coord);
        Some(usize::min(upper_idx.saturating_sub(1), coords.len() - 2))
    }

    /// Interpolates linearly in the table, returning `None` outside its range.
    pub fn linear(&self, coord: fip) -> Option<fip> {
        self.find_segment(coord).map(|idx| {
            let (x0, x1) = (self.coords[idx], self.coords[idx + 1]);
            let (y0, y1) = (self.values[idx], self.values[idx + 1]);
            y0 + (y1 - y0) * (coord - x0) / (x1 - x0)
        })
    }

    /// Interpolates linearly in log-log space, returning `None` outside the
    /// table range.
    ///
    /// Segments with non-positive end values fall back to linear interpolation.
    pub fn log_log(&self, coord: fip) -> Option<fip> {
        self.find_segment(coord).map(|idx| {
            let (x0, x1) = (self.coords[idx], self.coords[idx + 1]);
            let (y0, y1) = (self.values[idx], self.values[idx + 1]);
            if x0 > 0.0 && y0 > 0.0 && y1 > 0.0 {
                let slope = fip::ln(y1 / y0) / fip::ln(x1 / x0);
                y0 * fip::powf(coord / x0, slope)
            } else {
                y0 + (y1 - y0) * (coord - x0) / (x1 - x0)
            }
        })
    }
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    #[test]
    fn linear_interpolation_works() {
        let table = LookupTable1::new(vec![0.0, 1.0, 3.0], vec![0.0, 2.0, 6.0]).unwrap();
        assert_relative_eq!(table.linear(0.5).unwrap(), 1.0);
        assert_relative_eq!(table.linear(2.0).unwrap(), 4.0);
        assert_relative_eq!(table.linear(3.0).unwrap(), 6.0);
        assert!(table.linear(-0.1).is_none());
        assert!(table.linear(3.1).is_none());
    }

    #[test]
    fn log_log_interpolation_reproduces_power_laws() {
        let coords = vec![1.0, 10.0, 100.0];
        let values: Vec<_> = coords.iter().map(|&x: &f64| x.powf(-2.5)).collect();
        let table = LookupTable1::new(coords, values).unwrap();
        assert_relative_eq!(
            table.log_log(31.6).unwrap(),
            31.6_f64.powf(-2.5),
            max_relative = 1e-12
        );
    }

    #[test]
    fn invalid_tables_are_rejected() {
        assert!(LookupTable1::new(vec![0.0], vec![1.0]).is_err());
        assert!(LookupTable1::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(LookupTable1::new(vec![1.0, 0.0], vec![1.0, 2.0]).is_err());
        assert!(LookupTable1::new(vec![0.0, fip::NAN], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn tables_are_read_from_text_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# x y").unwrap();
        writeln!(file, "1 10").unwrap();
        writeln!(file, "2 20").unwrap();
        let table = LookupTable1::from_text_file(file.path(), 2.0, 0.5).unwrap();
        assert_relative_eq!(table.min_coord(), 2.0);
        assert_relative_eq!(table.max_coord(), 4.0);
        assert_relative_eq!(table.linear(3.0).unwrap(), 7.5);
    }
}

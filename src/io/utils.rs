//! Utilities for input/output.

use std::{
    fs,
    io::{self, BufWriter, Read},
    path::Path,
};

#[cfg(feature = "json")]
use serde::Serialize;

/// Opens the given file for reading, including the path in any error message.
pub fn open_file_and_map_err<P: AsRef<Path>>(file_path: P) -> io::Result<fs::File> {
    let file_path = file_path.as_ref();
    fs::File::open(file_path).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("Could not open {}: {}", file_path.display(), err),
        )
    })
}

/// Creates the given file for writing, including the path in any error message.
///
/// Missing parent directories are created.
pub fn create_file_and_map_err<P: AsRef<Path>>(file_path: P) -> io::Result<BufWriter<fs::File>> {
    let file_path = file_path.as_ref();
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::File::create(file_path)
        .map(BufWriter::new)
        .map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("Could not create {}: {}", file_path.display(), err),
            )
        })
}

/// Reads and returns the content of the specified text file.
pub fn read_text_file<P: AsRef<Path>>(file_path: P) -> io::Result<String> {
    let file = open_file_and_map_err(file_path)?;
    let mut text = String::new();
    io::BufReader::new(file).read_to_string(&mut text)?;
    Ok(text)
}

/// Parses whitespace separated numerical columns from the given text.
///
/// Empty lines and lines starting with `#` are skipped. Every remaining line
/// must contain at least `n_columns` values; extra values are ignored.
pub fn parse_numerical_columns(text: &str, n_columns: usize) -> io::Result<Vec<Vec<f64>>> {
    let mut columns = vec![Vec::new(); n_columns];
    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut values = line.split_whitespace();
        for column in columns.iter_mut() {
            let value_string = values.next().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "Line {} has fewer than {} columns",
                        line_idx + 1,
                        n_columns
                    ),
                )
            })?;
            let value = value_string.parse::<f64>().map_err(|err| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "Could not parse {} on line {}: {}",
                        value_string,
                        line_idx + 1,
                        err
                    ),
                )
            })?;
            column.push(value);
        }
    }
    Ok(columns)
}

/// Serializes the given data into JSON format and saves it at the given path.
#[cfg(feature = "json")]
pub fn save_data_as_json<P: AsRef<Path>, T: Serialize>(file_path: P, data: &T) -> io::Result<()> {
    let writer = create_file_and_map_err(file_path)?;
    serde_json::to_writer(writer, data).map_err(io::Error::from)
}

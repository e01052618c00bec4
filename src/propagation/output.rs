//! Recording of propagation steps.

use super::{fpr, StepBranch};
use crate::{
    io::utils as io_utils,
    particle::{Particle, Pid},
};
use std::{
    fmt,
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// The state of a particle when a step decision was made, along with the
/// branch that was taken.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct StepRecord {
    pub pid: Pid,
    pub redshift: fpr,
    pub lorentz_factor: fpr,
    pub branch: StepBranch,
}

impl StepRecord {
    pub fn new(particle: &Particle, branch: StepBranch) -> Self {
        Self {
            pid: particle.pid(),
            redshift: particle.redshift(),
            lorentz_factor: particle.lorentz_factor(),
            branch,
        }
    }
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {:e} {:e} {}",
            self.pid.pdg_code(),
            self.redshift,
            self.lorentz_factor,
            self.branch.marker()
        )
    }
}

/// Receiver of the records produced while propagating, one per step in step order.
pub trait StepRecordSink {
    fn record(&mut self, record: &StepRecord) -> io::Result<()>;

    /// Called once after the last record.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl StepRecordSink for Vec<StepRecord> {
    fn record(&mut self, record: &StepRecord) -> io::Result<()> {
        self.push(*record);
        Ok(())
    }
}

/// Writes each record as a line of text.
#[derive(Debug)]
pub struct TextRecordWriter<W: Write> {
    writer: W,
}

impl<W: Write> TextRecordWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl TextRecordWriter<BufWriter<fs::File>> {
    /// Creates a writer for the given output file.
    pub fn create<P: AsRef<Path>>(file_path: P) -> io::Result<Self> {
        io_utils::create_file_and_map_err(file_path).map(Self::new)
    }
}

impl<W: Write> StepRecordSink for TextRecordWriter<W> {
    fn record(&mut self, record: &StepRecord) -> io::Result<()> {
        writeln!(self.writer, "{}", record)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

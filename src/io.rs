//! File input/output.

pub mod utils;

use indicatif::ProgressStyle;

/// How much status information to print during long-running operations.
#[derive(Clone, Debug)]
pub enum Verbosity {
    Quiet,
    Messages,
    Progress(ProgressStyle),
}

impl Verbosity {
    /// Whether non-critical status messages should be printed.
    pub fn print_messages(&self) -> bool {
        matches!(self, Self::Messages)
    }

    /// Returns the style to use for a progress bar, if one should be shown.
    pub fn progress_style(&self) -> Option<&ProgressStyle> {
        match self {
            Self::Progress(style) => Some(style),
            _ => None,
        }
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::Quiet
    }
}

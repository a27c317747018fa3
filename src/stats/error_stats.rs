//! Contains the [ErrorStats] struct that counts reported errors and keeps the fatal error, if any.

use crate::util::*;

/// Errors reported while reading the stream file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ErrorStats {
    total_errors: u64,
    fatal_error: Option<Box<str>>,
}

impl ErrorStats {
    /// Count a reported error.
    pub fn add_err(&mut self) {
        self.total_errors += 1;
    }

    /// Store the fatal error, only the first is kept.
    pub fn add_fatal_err(&mut self, error: Box<str>) {
        if self.fatal_error.is_none() {
            self.fatal_error = Some(error);
        }
    }

    /// Number of reported errors.
    pub fn err_count(&self) -> u64 {
        self.total_errors
    }

    /// The fatal error, if one was reported.
    pub fn fatal_err(&self) -> Option<&str> {
        self.fatal_error.as_deref()
    }
}

//! Post-transfer verification.
//!
//! After an upload, download, or server-to-server relay completes, these
//! entry points decide whether the transferred bytes are intact by
//! comparing digests instead of re-reading file contents over the network.
//! Single-endpoint and cross-endpoint (FXP) paths, each in a blocking and
//! an abortable form with identical semantics.

mod fxp;
mod transfer;

#[cfg(test)]
mod tests;

pub use fxp::{verify_fxp_transfer, verify_fxp_transfer_abortable};
pub use transfer::{verify_transfer, verify_transfer_abortable};

use crate::abort::AbortToken;
use crate::checksum::ChecksumError;
use std::fmt;

/// Verdict of a verification attempt.
///
/// `Skipped` and `Verified` both mean the transfer may be reported as
/// complete: absence of a checking mechanism never blocks a transfer the
/// protocol itself reported successful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// No usable digest capability; no comparison was attempted.
    Skipped,
    /// Digests were compared and matched.
    Verified,
    /// Digests differed, or an endpoint claimed a capability but failed
    /// to produce a usable digest.
    Mismatch,
}

impl VerifyOutcome {
    /// The historical boolean collapse: safe to proceed unless the
    /// digests actually disagreed.
    pub fn passed(self) -> bool {
        !matches!(self, VerifyOutcome::Mismatch)
    }
}

/// Failure that prevents reaching a verdict at all. Everything that *is*
/// a verdict — including fetch failures — comes back as [`VerifyOutcome`];
/// callers can tell "I cannot proceed" from "verification says no"
/// without inspecting error types.
#[derive(Debug)]
pub enum VerifyError {
    /// A required path argument was blank. Raised before any I/O.
    BlankPath { param: &'static str },
    /// The local digest could not be computed (unreadable file, or the
    /// remote reported a non-computable algorithm).
    Checksum(ChecksumError),
    /// Abort was requested before verification finished.
    Aborted,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::BlankPath { param } => {
                write!(f, "required parameter '{}' is blank", param)
            }
            VerifyError::Checksum(e) => write!(f, "{}", e),
            VerifyError::Aborted => write!(f, "verification aborted"),
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VerifyError::Checksum(e) => Some(e),
            VerifyError::BlankPath { .. } | VerifyError::Aborted => None,
        }
    }
}

impl From<ChecksumError> for VerifyError {
    fn from(e: ChecksumError) -> Self {
        match e {
            ChecksumError::Aborted => VerifyError::Aborted,
            other => VerifyError::Checksum(other),
        }
    }
}

fn require_non_blank(value: &str, param: &'static str) -> Result<(), VerifyError> {
    if value.trim().is_empty() {
        return Err(VerifyError::BlankPath { param });
    }
    Ok(())
}

fn ensure_not_aborted(abort: &AbortToken) -> Result<(), VerifyError> {
    if abort.is_aborted() {
        return Err(VerifyError::Aborted);
    }
    Ok(())
}

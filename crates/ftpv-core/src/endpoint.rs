//! Collaborator contracts for endpoint sessions that can report digests.
//!
//! The verifiers are a pure orchestration layer: which wire command a
//! session sends to obtain a digest, and how the reply is parsed, is the
//! session's business. This module pins down only what the verifiers
//! consume — a capability snapshot and a digest fetch, in blocking and
//! abortable forms.

use crate::abort::AbortToken;
use crate::capability::{CapabilitySet, DigestCapability};

/// Digest reported by an endpoint for one remote path.
///
/// A fetch that failed for ordinary reasons (endpoint could not compute a
/// digest, reply was unparsable) is reported as an *invalid* digest, not
/// an error. An invalid digest's value is untrusted and never reaches a
/// comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDigest {
    /// Concrete algorithm the endpoint used, if it named one. An opaque
    /// hash command still reports the concrete algorithm the server chose.
    pub algorithm: Option<DigestCapability>,
    /// Digest value as reported, usually hex in either case.
    pub value: String,
}

impl RemoteDigest {
    pub fn new(algorithm: DigestCapability, value: impl Into<String>) -> Self {
        Self {
            algorithm: Some(algorithm),
            value: value.into(),
        }
    }

    /// Placeholder for a fetch the endpoint could not satisfy.
    pub fn invalid() -> Self {
        Self {
            algorithm: None,
            value: String::new(),
        }
    }

    /// Usable for comparison: a named algorithm and a non-blank value.
    pub fn is_valid(&self) -> bool {
        self.algorithm.is_some() && !self.value.trim().is_empty()
    }
}

/// One authenticated session against a remote endpoint, as the verifiers
/// see it.
pub trait EndpointSession {
    /// Capability set negotiated for this session. Fixed per session;
    /// implementations are expected to cache it rather than re-query.
    fn capabilities(&self) -> CapabilitySet;

    /// Ask the endpoint for a digest of `remote_path` (one remote command
    /// round-trip). Ordinary failure is an invalid [`RemoteDigest`].
    fn fetch_digest(&mut self, remote_path: &str) -> RemoteDigest;
}

/// Abortable twin of [`EndpointSession`] with identical semantics.
///
/// The fetch is a suspension point. Implementations may give up early and
/// return an invalid digest when `abort` is requested; the verifiers
/// re-check the token around every suspension point either way, so a
/// fetch that ignores the token only delays the abort.
#[allow(async_fn_in_trait)]
pub trait AsyncEndpointSession {
    fn capabilities(&self) -> CapabilitySet;

    async fn fetch_digest(&mut self, remote_path: &str, abort: &AbortToken) -> RemoteDigest;
}

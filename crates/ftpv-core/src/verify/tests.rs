//! Verifier tests against scripted endpoint sessions.

use std::io::Write;
use std::path::Path;

use crate::abort::AbortToken;
use crate::capability::{CapabilitySet, DigestCapability};
use crate::checksum::ChecksumError;
use crate::endpoint::{AsyncEndpointSession, EndpointSession, RemoteDigest};

use super::{
    verify_fxp_transfer, verify_fxp_transfer_abortable, verify_transfer,
    verify_transfer_abortable, VerifyError, VerifyOutcome,
};

const SHA256_HELLO: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";

fn hello_file() -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(b"hello\n").unwrap();
    f.flush().unwrap();
    f
}

/// Session whose fetches return a fixed digest and count calls.
struct ScriptedSession {
    caps: CapabilitySet,
    digest: RemoteDigest,
    fetch_calls: usize,
}

impl ScriptedSession {
    fn new(caps: CapabilitySet, digest: RemoteDigest) -> Self {
        Self {
            caps,
            digest,
            fetch_calls: 0,
        }
    }

    fn sha256(value: &str) -> Self {
        Self::new(
            CapabilitySet::of(&[DigestCapability::Sha256]),
            RemoteDigest::new(DigestCapability::Sha256, value),
        )
    }
}

impl EndpointSession for ScriptedSession {
    fn capabilities(&self) -> CapabilitySet {
        self.caps
    }

    fn fetch_digest(&mut self, _remote_path: &str) -> RemoteDigest {
        self.fetch_calls += 1;
        self.digest.clone()
    }
}

impl AsyncEndpointSession for ScriptedSession {
    fn capabilities(&self) -> CapabilitySet {
        self.caps
    }

    async fn fetch_digest(&mut self, _remote_path: &str, _abort: &AbortToken) -> RemoteDigest {
        self.fetch_calls += 1;
        self.digest.clone()
    }
}

/// Session that requests abort from inside its own fetch, then answers
/// anyway; the verifier must notice on resuming and discard the result.
struct AbortingSession {
    digest: RemoteDigest,
}

impl AsyncEndpointSession for AbortingSession {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::of(&[DigestCapability::Sha256])
    }

    async fn fetch_digest(&mut self, _remote_path: &str, abort: &AbortToken) -> RemoteDigest {
        abort.request_abort();
        self.digest.clone()
    }
}

#[test]
fn missing_capability_skips_regardless_of_content() {
    let local = hello_file();
    let mut session = ScriptedSession::new(
        CapabilitySet::EMPTY,
        RemoteDigest::new(DigestCapability::Sha256, "ffffffff"),
    );
    let outcome = verify_transfer(&mut session, local.path(), "/srv/file").unwrap();
    assert_eq!(outcome, VerifyOutcome::Skipped);
    assert!(outcome.passed());
    assert_eq!(session.fetch_calls, 0);
}

#[test]
fn matching_digest_verifies() {
    let local = hello_file();
    let mut session = ScriptedSession::sha256(SHA256_HELLO);
    let outcome = verify_transfer(&mut session, local.path(), "/srv/file").unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified);
    assert_eq!(session.fetch_calls, 1);
}

#[test]
fn differing_digest_is_mismatch() {
    let local = hello_file();
    let mut session = ScriptedSession::sha256("def456def456def456def456def456de");
    let outcome = verify_transfer(&mut session, local.path(), "/srv/file").unwrap();
    assert_eq!(outcome, VerifyOutcome::Mismatch);
    assert!(!outcome.passed());
}

#[test]
fn remote_digest_case_is_ignored() {
    let local = hello_file();
    let mut session = ScriptedSession::sha256(&SHA256_HELLO.to_ascii_uppercase());
    let outcome = verify_transfer(&mut session, local.path(), "/srv/file").unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified);
}

#[test]
fn failed_fetch_after_claimed_capability_is_mismatch() {
    let local = hello_file();
    let mut session = ScriptedSession::new(
        CapabilitySet::of(&[DigestCapability::Sha256]),
        RemoteDigest::invalid(),
    );
    let outcome = verify_transfer(&mut session, local.path(), "/srv/file").unwrap();
    assert_eq!(outcome, VerifyOutcome::Mismatch);
    assert_eq!(session.fetch_calls, 1);
}

#[test]
fn blank_paths_raise_before_any_fetch() {
    let local = hello_file();
    let mut session = ScriptedSession::sha256(SHA256_HELLO);

    let err = verify_transfer(&mut session, Path::new(""), "/srv/file").unwrap_err();
    assert!(matches!(err, VerifyError::BlankPath { param: "local_path" }));

    let err = verify_transfer(&mut session, local.path(), "  ").unwrap_err();
    assert!(matches!(err, VerifyError::BlankPath { param: "remote_path" }));

    assert_eq!(session.fetch_calls, 0);
}

#[test]
fn opaque_hash_algorithm_cannot_be_recomputed_locally() {
    let local = hello_file();
    let mut session = ScriptedSession::new(
        CapabilitySet::of(&[DigestCapability::GenericHash]),
        RemoteDigest::new(DigestCapability::GenericHash, "abc123"),
    );
    let err = verify_transfer(&mut session, local.path(), "/srv/file").unwrap_err();
    assert!(matches!(
        err,
        VerifyError::Checksum(ChecksumError::UnsupportedAlgorithm(_))
    ));
}

#[test]
fn verification_is_idempotent() {
    let local = hello_file();
    let mut session = ScriptedSession::sha256(SHA256_HELLO);
    let first = verify_transfer(&mut session, local.path(), "/srv/file").unwrap();
    let second = verify_transfer(&mut session, local.path(), "/srv/file").unwrap();
    assert_eq!(first, second);
}

#[test]
fn fxp_disjoint_capabilities_skip() {
    let mut source = ScriptedSession::new(
        CapabilitySet::of(&[DigestCapability::Md5, DigestCapability::Crc]),
        RemoteDigest::new(DigestCapability::Md5, "aa"),
    );
    let mut dest = ScriptedSession::new(
        CapabilitySet::of(&[DigestCapability::Sha1]),
        RemoteDigest::new(DigestCapability::Sha1, "bb"),
    );
    let outcome = verify_fxp_transfer(&mut source, &mut dest, "/a", "/b").unwrap();
    assert_eq!(outcome, VerifyOutcome::Skipped);
    assert!(outcome.passed());
    assert_eq!(source.fetch_calls, 0);
    assert_eq!(dest.fetch_calls, 0);
}

#[test]
fn fxp_matching_digests_verify() {
    let mut source = ScriptedSession::sha256(SHA256_HELLO);
    let mut dest = ScriptedSession::sha256(SHA256_HELLO);
    let outcome = verify_fxp_transfer(&mut source, &mut dest, "/a", "/b").unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified);
    assert_eq!(source.fetch_calls, 1);
    assert_eq!(dest.fetch_calls, 1);
}

#[test]
fn fxp_differing_digests_mismatch() {
    let mut source = ScriptedSession::sha256(SHA256_HELLO);
    let mut dest = ScriptedSession::sha256("def456def456def456def456def456de");
    let outcome = verify_fxp_transfer(&mut source, &mut dest, "/a", "/b").unwrap();
    assert_eq!(outcome, VerifyOutcome::Mismatch);
}

#[test]
fn fxp_invalid_source_digest_short_circuits() {
    let mut source = ScriptedSession::new(
        CapabilitySet::of(&[DigestCapability::Sha256]),
        RemoteDigest::invalid(),
    );
    let mut dest = ScriptedSession::sha256(SHA256_HELLO);
    let outcome = verify_fxp_transfer(&mut source, &mut dest, "/a", "/b").unwrap();
    assert_eq!(outcome, VerifyOutcome::Mismatch);
    assert_eq!(source.fetch_calls, 1);
    assert_eq!(dest.fetch_calls, 0);
}

#[test]
fn fxp_invalid_destination_digest_is_mismatch() {
    let mut source = ScriptedSession::sha256(SHA256_HELLO);
    let mut dest = ScriptedSession::new(
        CapabilitySet::of(&[DigestCapability::Sha256]),
        RemoteDigest::invalid(),
    );
    let outcome = verify_fxp_transfer(&mut source, &mut dest, "/a", "/b").unwrap();
    assert_eq!(outcome, VerifyOutcome::Mismatch);
    assert_eq!(dest.fetch_calls, 1);
}

#[test]
fn fxp_blank_paths_raise() {
    let mut source = ScriptedSession::sha256(SHA256_HELLO);
    let mut dest = ScriptedSession::sha256(SHA256_HELLO);
    let err = verify_fxp_transfer(&mut source, &mut dest, "", "/b").unwrap_err();
    assert!(matches!(err, VerifyError::BlankPath { param: "source_path" }));
    let err = verify_fxp_transfer(&mut source, &mut dest, "/a", "").unwrap_err();
    assert!(matches!(err, VerifyError::BlankPath { param: "remote_path" }));
    assert_eq!(source.fetch_calls, 0);
}

// The reported values are compared raw: negotiation is the only algorithm
// agreement, and case is not normalized between two remote peers.
#[test]
fn fxp_comparison_is_raw() {
    let mut source = ScriptedSession::new(
        CapabilitySet::of(&[DigestCapability::Sha256]),
        RemoteDigest::new(DigestCapability::Sha256, "ABC123"),
    );
    let mut dest = ScriptedSession::new(
        CapabilitySet::of(&[DigestCapability::Sha256]),
        RemoteDigest::new(DigestCapability::Sha256, "abc123"),
    );
    let outcome = verify_fxp_transfer(&mut source, &mut dest, "/a", "/b").unwrap();
    assert_eq!(outcome, VerifyOutcome::Mismatch);

    let mut source = ScriptedSession::new(
        CapabilitySet::of(&[DigestCapability::Sha256, DigestCapability::Sha1]),
        RemoteDigest::new(DigestCapability::Sha1, "abc123"),
    );
    let mut dest = ScriptedSession::new(
        CapabilitySet::of(&[DigestCapability::Sha256, DigestCapability::Sha1]),
        RemoteDigest::new(DigestCapability::Sha256, "abc123"),
    );
    let outcome = verify_fxp_transfer(&mut source, &mut dest, "/a", "/b").unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified);
}

#[tokio::test]
async fn abortable_transfer_has_blocking_semantics() {
    let local = hello_file();
    let token = AbortToken::new();
    let mut session = ScriptedSession::sha256(SHA256_HELLO);
    let outcome = verify_transfer_abortable(&mut session, local.path(), "/srv/file", &token)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified);
}

#[tokio::test]
async fn abort_before_fetch_never_issues_it() {
    let local = hello_file();
    let token = AbortToken::new();
    token.request_abort();
    let mut session = ScriptedSession::sha256(SHA256_HELLO);
    let err = verify_transfer_abortable(&mut session, local.path(), "/srv/file", &token)
        .await
        .unwrap_err();
    assert!(matches!(err, VerifyError::Aborted));
    assert_eq!(session.fetch_calls, 0);
}

#[tokio::test]
async fn abort_during_fetch_discards_the_result() {
    let local = hello_file();
    let token = AbortToken::new();
    let mut session = AbortingSession {
        digest: RemoteDigest::new(DigestCapability::Sha256, SHA256_HELLO),
    };
    let err = verify_transfer_abortable(&mut session, local.path(), "/srv/file", &token)
        .await
        .unwrap_err();
    assert!(matches!(err, VerifyError::Aborted));
}

#[tokio::test]
async fn fxp_abort_during_source_fetch_skips_destination() {
    let token = AbortToken::new();
    let mut source = AbortingSession {
        digest: RemoteDigest::new(DigestCapability::Sha256, SHA256_HELLO),
    };
    let mut dest = ScriptedSession::sha256(SHA256_HELLO);
    let err = verify_fxp_transfer_abortable(&mut source, &mut dest, "/a", "/b", &token)
        .await
        .unwrap_err();
    assert!(matches!(err, VerifyError::Aborted));
    assert_eq!(dest.fetch_calls, 0);
}

#[tokio::test]
async fn fxp_abortable_has_blocking_semantics() {
    let token = AbortToken::new();
    let mut source = ScriptedSession::sha256(SHA256_HELLO);
    let mut dest = ScriptedSession::sha256(SHA256_HELLO);
    let outcome = verify_fxp_transfer_abortable(&mut source, &mut dest, "/a", "/b", &token)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified);
}

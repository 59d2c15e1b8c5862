//! Single-endpoint verification: a local file against its remote copy.

use std::path::Path;

use crate::abort::AbortToken;
use crate::capability::DigestCapability;
use crate::checksum;
use crate::endpoint::{AsyncEndpointSession, EndpointSession, RemoteDigest};

use super::{ensure_not_aborted, require_non_blank, VerifyError, VerifyOutcome};

/// Verify a completed upload or download by comparing the endpoint's
/// digest of `remote_path` against a digest of the local file, computed
/// with the algorithm the endpoint reports.
///
/// Returns `Skipped` when the session advertises no digest capability.
/// An invalid remote digest after a claimed capability is a `Mismatch`:
/// the endpoint said it could check and then failed to.
pub fn verify_transfer<E: EndpointSession>(
    endpoint: &mut E,
    local_path: &Path,
    remote_path: &str,
) -> Result<VerifyOutcome, VerifyError> {
    check_paths(local_path, remote_path)?;

    if endpoint.capabilities().is_empty() {
        return Ok(VerifyOutcome::Skipped);
    }

    let remote = endpoint.fetch_digest(remote_path);
    let algo = match usable_algorithm(&remote) {
        Some(algo) => algo,
        None => return Ok(VerifyOutcome::Mismatch),
    };

    let local = checksum::digest_path(local_path, algo)?;
    Ok(compare_local(&local, &remote))
}

/// Abortable twin of [`verify_transfer`]. The remote fetch and the local
/// digest read are the suspension points; the token is checked before and
/// after each, and an observed abort discards any partial work.
pub async fn verify_transfer_abortable<E: AsyncEndpointSession>(
    endpoint: &mut E,
    local_path: &Path,
    remote_path: &str,
    abort: &AbortToken,
) -> Result<VerifyOutcome, VerifyError> {
    check_paths(local_path, remote_path)?;

    if endpoint.capabilities().is_empty() {
        return Ok(VerifyOutcome::Skipped);
    }

    ensure_not_aborted(abort)?;
    let remote = endpoint.fetch_digest(remote_path, abort).await;
    ensure_not_aborted(abort)?;

    let algo = match usable_algorithm(&remote) {
        Some(algo) => algo,
        None => return Ok(VerifyOutcome::Mismatch),
    };

    let local = checksum::digest_path_abortable(local_path, algo, abort).await?;
    ensure_not_aborted(abort)?;
    Ok(compare_local(&local, &remote))
}

fn check_paths(local_path: &Path, remote_path: &str) -> Result<(), VerifyError> {
    if local_path.as_os_str().is_empty() {
        return Err(VerifyError::BlankPath { param: "local_path" });
    }
    require_non_blank(remote_path, "remote_path")
}

fn usable_algorithm(remote: &RemoteDigest) -> Option<DigestCapability> {
    if remote.is_valid() {
        remote.algorithm
    } else {
        None
    }
}

/// Local digests are lowercase hex; endpoints report either case, so this
/// comparison is ASCII case-insensitive.
fn compare_local(local: &str, remote: &RemoteDigest) -> VerifyOutcome {
    if local.eq_ignore_ascii_case(remote.value.trim()) {
        VerifyOutcome::Verified
    } else {
        VerifyOutcome::Mismatch
    }
}

//! Cross-endpoint (FXP) verification: digests from both relay peers.
//!
//! In a server-to-server relay the controlling client never sees the
//! bytes, so both peers must independently report a digest. That only
//! works when they share a concrete digest variant — digests from
//! different algorithms are not comparable, so "both support some hash"
//! is not enough.

use crate::abort::AbortToken;
use crate::endpoint::{AsyncEndpointSession, EndpointSession};

use super::{ensure_not_aborted, require_non_blank, VerifyError, VerifyOutcome};

/// Verify a relay transfer by fetching a digest from each peer and
/// comparing the reported values.
///
/// Without a shared variant the check is skipped (logged once, not a
/// failure). The source digest is fetched first; if it comes back
/// invalid, the destination fetch is never issued.
pub fn verify_fxp_transfer<S, D>(
    source: &mut S,
    destination: &mut D,
    source_path: &str,
    remote_path: &str,
) -> Result<VerifyOutcome, VerifyError>
where
    S: EndpointSession,
    D: EndpointSession,
{
    require_non_blank(source_path, "source_path")?;
    require_non_blank(remote_path, "remote_path")?;

    if !source
        .capabilities()
        .shares_algorithm_with(&destination.capabilities())
    {
        tracing::info!("source and destination endpoints share no digest algorithm; skipping verification");
        return Ok(VerifyOutcome::Skipped);
    }

    let source_digest = source.fetch_digest(source_path);
    if !source_digest.is_valid() {
        return Ok(VerifyOutcome::Mismatch);
    }

    let destination_digest = destination.fetch_digest(remote_path);
    if !destination_digest.is_valid() {
        return Ok(VerifyOutcome::Mismatch);
    }

    // The upfront negotiation is the only algorithm agreement between the
    // two results; the reported values are compared as-is.
    Ok(if source_digest.value == destination_digest.value {
        VerifyOutcome::Verified
    } else {
        VerifyOutcome::Mismatch
    })
}

/// Abortable twin of [`verify_fxp_transfer`]. The two fetches are the
/// suspension points and stay strictly ordered: the source fetch
/// completes (or fails) before the destination fetch begins.
pub async fn verify_fxp_transfer_abortable<S, D>(
    source: &mut S,
    destination: &mut D,
    source_path: &str,
    remote_path: &str,
    abort: &AbortToken,
) -> Result<VerifyOutcome, VerifyError>
where
    S: AsyncEndpointSession,
    D: AsyncEndpointSession,
{
    require_non_blank(source_path, "source_path")?;
    require_non_blank(remote_path, "remote_path")?;

    if !source
        .capabilities()
        .shares_algorithm_with(&destination.capabilities())
    {
        tracing::info!("source and destination endpoints share no digest algorithm; skipping verification");
        return Ok(VerifyOutcome::Skipped);
    }

    ensure_not_aborted(abort)?;
    let source_digest = source.fetch_digest(source_path, abort).await;
    ensure_not_aborted(abort)?;
    if !source_digest.is_valid() {
        return Ok(VerifyOutcome::Mismatch);
    }

    let destination_digest = destination.fetch_digest(remote_path, abort).await;
    ensure_not_aborted(abort)?;
    if !destination_digest.is_valid() {
        return Ok(VerifyOutcome::Mismatch);
    }

    Ok(if source_digest.value == destination_digest.value {
        VerifyOutcome::Verified
    } else {
        VerifyOutcome::Mismatch
    })
}

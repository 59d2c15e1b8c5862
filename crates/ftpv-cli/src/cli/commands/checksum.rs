//! Checksum command: compute a digest of a file.

use anyhow::Result;
use ftpv_core::capability::DigestCapability;
use ftpv_core::checksum;
use std::path::Path;

/// Compute and print the digest of the given file.
pub async fn run_checksum(path: &Path, algo: DigestCapability) -> Result<()> {
    let digest = checksum::digest_path(path, algo)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}

//! Compare command: digest two local files and report match/mismatch.

use anyhow::Result;
use ftpv_core::capability::DigestCapability;
use ftpv_core::checksum;
use std::path::Path;

/// Digest both files with the same algorithm and compare the values.
/// Exits with status 1 on mismatch so scripts can branch on the result.
pub async fn run_compare(path_a: &Path, path_b: &Path, algo: DigestCapability) -> Result<()> {
    let digest_a = checksum::digest_path(path_a, algo)?;
    let digest_b = checksum::digest_path(path_b, algo)?;

    if digest_a == digest_b {
        println!("match  {} ({})", digest_a, algo);
        return Ok(());
    }

    println!("mismatch ({})", algo);
    println!("  {}  {}", digest_a, path_a.display());
    println!("  {}  {}", digest_b, path_b.display());
    std::process::exit(1);
}

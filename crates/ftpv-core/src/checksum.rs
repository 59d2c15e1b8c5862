//! Streaming digest computation over local files.
//!
//! Runs after a transfer completes, never inline with the data connection,
//! so it cannot affect transfer throughput. Reads in chunks to keep memory
//! use bounded; suitable for large files.

use crate::abort::AbortToken;
use crate::capability::DigestCapability;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

const BUF_SIZE: usize = 64 * 1024;

/// Error computing a local digest.
#[derive(Debug)]
pub enum ChecksumError {
    /// The capability names the opaque hash mechanism, not a concrete
    /// algorithm, so there is nothing to compute locally.
    UnsupportedAlgorithm(DigestCapability),
    /// The file could not be opened or read.
    Io { path: PathBuf, source: io::Error },
    /// Abort was requested while reading; the partial digest is discarded.
    Aborted,
}

impl fmt::Display for ChecksumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumError::UnsupportedAlgorithm(cap) => {
                write!(f, "'{}' does not name a concrete digest algorithm", cap)
            }
            ChecksumError::Io { path, source } => {
                write!(f, "digest {}: {}", path.display(), source)
            }
            ChecksumError::Aborted => write!(f, "digest computation aborted"),
        }
    }
}

impl std::error::Error for ChecksumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChecksumError::Io { source, .. } => Some(source),
            ChecksumError::UnsupportedAlgorithm(_) | ChecksumError::Aborted => None,
        }
    }
}

/// Incremental hasher over one of the concrete algorithms.
enum Hasher {
    Md5(Md5),
    Crc(crc32fast::Hasher),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Hasher {
    fn new(algo: DigestCapability) -> Result<Self, ChecksumError> {
        match algo {
            DigestCapability::Md5 => Ok(Hasher::Md5(Md5::new())),
            DigestCapability::Crc => Ok(Hasher::Crc(crc32fast::Hasher::new())),
            DigestCapability::Sha1 => Ok(Hasher::Sha1(Sha1::new())),
            DigestCapability::Sha256 => Ok(Hasher::Sha256(Sha256::new())),
            DigestCapability::Sha512 => Ok(Hasher::Sha512(Sha512::new())),
            DigestCapability::GenericHash => {
                Err(ChecksumError::UnsupportedAlgorithm(DigestCapability::GenericHash))
            }
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Md5(h) => h.update(data),
            Hasher::Crc(h) => h.update(data),
            Hasher::Sha1(h) => h.update(data),
            Hasher::Sha256(h) => h.update(data),
            Hasher::Sha512(h) => h.update(data),
        }
    }

    /// Lowercase hex digest; CRC-32 is rendered as 8 hex digits.
    fn finalize(self) -> String {
        match self {
            Hasher::Md5(h) => hex::encode(h.finalize()),
            Hasher::Crc(h) => format!("{:08x}", h.finalize()),
            Hasher::Sha1(h) => hex::encode(h.finalize()),
            Hasher::Sha256(h) => hex::encode(h.finalize()),
            Hasher::Sha512(h) => hex::encode(h.finalize()),
        }
    }
}

fn io_err(path: &Path, source: io::Error) -> ChecksumError {
    ChecksumError::Io {
        path: path.to_owned(),
        source,
    }
}

/// Compute a digest of `path` with `algo`, returned as lowercase hex.
pub fn digest_path(path: &Path, algo: DigestCapability) -> Result<String, ChecksumError> {
    let mut hasher = Hasher::new(algo)?;
    let mut f = File::open(path).map_err(|e| io_err(path, e))?;
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf).map_err(|e| io_err(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

/// Abortable variant of [`digest_path`]: same output, but the abort token
/// is checked between read chunks and a set token stops the read with
/// `ChecksumError::Aborted`.
pub async fn digest_path_abortable(
    path: &Path,
    algo: DigestCapability,
    abort: &AbortToken,
) -> Result<String, ChecksumError> {
    let mut hasher = Hasher::new(algo)?;
    let mut f = tokio::fs::File::open(path).await.map_err(|e| io_err(path, e))?;
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        if abort.is_aborted() {
            return Err(ChecksumError::Aborted);
        }
        let n = f.read(&mut buf).await.map_err(|e| io_err(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

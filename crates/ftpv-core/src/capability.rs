//! Digest capabilities advertised by transfer endpoints.
//!
//! An endpoint announces during feature negotiation which digest mechanisms
//! it supports. The set is fixed for the life of the authenticated session,
//! so verifiers take it as a snapshot value instead of re-querying the
//! endpoint on every call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A digest mechanism an endpoint can advertise.
///
/// `GenericHash` is the opaque hash-command family: it counts for
/// negotiation, but a digest produced through it reports one of the
/// concrete algorithms below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestCapability {
    #[serde(rename = "hash")]
    GenericHash,
    Md5,
    Crc,
    Sha1,
    Sha256,
    Sha512,
}

impl DigestCapability {
    /// All recognized variants. Unranked; negotiation treats them as peers.
    pub const ALL: [DigestCapability; 6] = [
        DigestCapability::GenericHash,
        DigestCapability::Md5,
        DigestCapability::Crc,
        DigestCapability::Sha1,
        DigestCapability::Sha256,
        DigestCapability::Sha512,
    ];

    fn bit(self) -> u8 {
        match self {
            DigestCapability::GenericHash => 1 << 0,
            DigestCapability::Md5 => 1 << 1,
            DigestCapability::Crc => 1 << 2,
            DigestCapability::Sha1 => 1 << 3,
            DigestCapability::Sha256 => 1 << 4,
            DigestCapability::Sha512 => 1 << 5,
        }
    }

    fn name(self) -> &'static str {
        match self {
            DigestCapability::GenericHash => "hash",
            DigestCapability::Md5 => "md5",
            DigestCapability::Crc => "crc",
            DigestCapability::Sha1 => "sha1",
            DigestCapability::Sha256 => "sha256",
            DigestCapability::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for DigestCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized capability name (e.g. from `--algo`).
#[derive(Debug)]
pub struct UnknownCapability(pub String);

impl fmt::Display for UnknownCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown digest algorithm '{}' (expected one of: hash, md5, crc, sha1, sha256, sha512)",
            self.0
        )
    }
}

impl std::error::Error for UnknownCapability {}

impl FromStr for DigestCapability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        DigestCapability::ALL
            .iter()
            .copied()
            .find(|cap| cap.name() == lower)
            .ok_or_else(|| UnknownCapability(s.to_string()))
    }
}

/// Set of digest capabilities one endpoint advertised for its session.
///
/// Cheap to copy; verifiers only read it. The negotiation predicates live
/// here: `is_empty` answers the single-endpoint question ("can this
/// endpoint report any digest at all") and [`shares_algorithm_with`]
/// answers the cross-endpoint one.
///
/// [`shares_algorithm_with`]: CapabilitySet::shares_algorithm_with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    mask: u8,
}

impl CapabilitySet {
    /// Set with no capabilities (endpoint advertised nothing usable).
    pub const EMPTY: CapabilitySet = CapabilitySet { mask: 0 };

    /// Build a set from the advertised variants.
    pub fn of(caps: &[DigestCapability]) -> Self {
        let mut set = CapabilitySet::EMPTY;
        for cap in caps {
            set.insert(*cap);
        }
        set
    }

    pub fn insert(&mut self, cap: DigestCapability) {
        self.mask |= cap.bit();
    }

    pub fn contains(&self, cap: DigestCapability) -> bool {
        self.mask & cap.bit() != 0
    }

    /// True when the endpoint advertised none of the recognized variants;
    /// single-endpoint verification is skipped in that case.
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Cross-endpoint predicate: at least one variant present in *both*
    /// sets. Digests from different algorithms are not comparable, so
    /// "both sides support some hash" is not enough.
    pub fn shares_algorithm_with(&self, other: &CapabilitySet) -> bool {
        self.mask & other.mask != 0
    }
}

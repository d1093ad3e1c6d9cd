//! Strong type definitions for CertNFT.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A certificate token identifier.
///
/// Token ids are assigned by the ledger from a monotonic counter, starting at 1.
/// Zero is never a valid token id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u64);

impl TokenId {
    /// Create a token id, rejecting zero.
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Get the raw integer value.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self.0)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ValidationError::InvalidTokenId(s.to_string()))
    }
}

/// An EVM-style account address: `0x` followed by 40 hex digits.
///
/// Stored lowercase so that two spellings of the same address compare equal.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerAddress(String);

impl OwnerAddress {
    /// Number of hex digits after the `0x` prefix.
    pub const HEX_LEN: usize = 40;

    /// Parse and normalize an address.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| ValidationError::InvalidAddress(s.to_string()))?;

        if digits.len() != Self::HEX_LEN || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidAddress(s.to_string()));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    /// Borrow the normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OwnerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerAddress({})", self.0)
    }
}

impl fmt::Display for OwnerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OwnerAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OwnerAddress {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<OwnerAddress> for String {
    fn from(addr: OwnerAddress) -> Self {
        addr.0
    }
}

/// A 32-byte transaction hash returned for every ledger write.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub [u8; 32]);

impl TxHash {
    /// Derive a transaction hash from a ledger-local salt and the write it records.
    ///
    /// `seq` is the ledger's write sequence number, so two writes against the
    /// same token never share a hash.
    pub fn derive(salt: &[u8; 32], op: &str, token_id: TokenId, seq: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"certnft-tx-v0:");
        hasher.update(salt);
        hasher.update(b":");
        hasher.update(op.as_bytes());
        hasher.update(b":");
        hasher.update(&token_id.get().to_be_bytes());
        hasher.update(&seq.to_be_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Convert to `0x`-prefixed hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({}...)", &self.to_hex()[..18])
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

//! Hex digest value type and the hashing rules of the commitment scheme
//!
//! # Digest format
//!
//! Every node in the commitment tree is a SHA-256 digest carried as its
//! lowercase hex text (64 characters, no `0x` prefix). Equality is plain
//! string equality, which is why the format is validated on construction:
//! a mixed-case or truncated digest would silently compare unequal to its
//! canonical form and poison every tree built from it.
//!
//! # Hashing rules
//!
//! Two rules cover the whole scheme:
//!
//! - **Leaf rule**: `hash_secret(secret)` hashes the UTF-8 bytes of the
//!   participant's secret string.
//! - **Parent rule**: `combine(left, right)` hashes the *concatenated hex
//!   text* of the two child digests, left then right. The input to SHA-256
//!   is 128 ASCII characters, not 64 raw bytes. Implementations that hash
//!   raw bytes instead produce a different (incompatible) root for the
//!   same leaf set, so this rule is the interoperability contract of the
//!   published root.
//!
//! The parent rule is order-sensitive: `combine(a, b) != combine(b, a)`.

use crate::error::{MerkleError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length of a digest in hex characters (SHA-256, 32 bytes)
pub const DIGEST_HEX_LEN: usize = 64;

/// A SHA-256 digest in lowercase hex form
///
/// Immutable value type. Construction validates length and character set,
/// so every `Digest` in circulation is canonical and comparable by string
/// equality.
///
/// # Example
///
/// ```rust
/// use merkle_commit::digest::Digest;
///
/// let hex = "ab".repeat(32);
/// let digest = Digest::from_hex(&hex).unwrap();
/// assert_eq!(digest.as_str(), hex);
///
/// // Uppercase and short inputs are rejected
/// assert!(Digest::from_hex(&"AB".repeat(32)).is_err());
/// assert!(Digest::from_hex("abcd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest(String);

impl Digest {
    /// Parse a digest from hex text
    ///
    /// # Parameters
    /// - `text`: candidate digest, must be exactly 64 lowercase hex
    ///   characters
    ///
    /// # Errors
    /// - Returns `InvalidDigest` if the length is wrong or any character
    ///   is outside `[0-9a-f]` (uppercase hex is rejected, not folded)
    pub fn from_hex(text: &str) -> Result<Self> {
        if text.len() != DIGEST_HEX_LEN {
            return Err(MerkleError::InvalidDigest(format!(
                "expected {} hex characters, got {}",
                DIGEST_HEX_LEN,
                text.len()
            )));
        }

        if let Some(bad) = text
            .chars()
            .find(|c| !matches!(c, '0'..='9' | 'a'..='f'))
        {
            return Err(MerkleError::InvalidDigest(format!(
                "invalid character {:?} (lowercase hex required)",
                bad
            )));
        }

        Ok(Self(text.to_string()))
    }

    /// Hex text of the digest
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the digest, returning the owned hex string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Digest {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self> {
        Digest::from_hex(s)
    }
}

// Digests travel as bare JSON strings so the leaf lists in exchanged
// documents stay plain string arrays. Deserialization re-validates.
impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Digest::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// Hash a participant secret into its leaf commitment
///
/// Applies SHA-256 to the UTF-8 bytes of `secret` and returns the
/// lowercase hex digest. Any string is accepted; the issuer happens to
/// mint UUIDs, but the hash does not care.
///
/// # Example
///
/// ```rust
/// use merkle_commit::digest::hash_secret;
///
/// let leaf = hash_secret("a");
/// assert_eq!(
///     leaf.as_str(),
///     "ca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb"
/// );
///
/// // Deterministic
/// assert_eq!(hash_secret("a"), hash_secret("a"));
/// ```
pub fn hash_secret(secret: &str) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    Digest(hex::encode(hasher.finalize()))
}

/// Compute a parent digest from two children (parent rule)
///
/// Hashes the concatenated hex text `left || right`. Order-sensitive:
/// swapping the children changes the result, which is what pins each leaf
/// to its position in the tree.
///
/// # Example
///
/// ```rust
/// use merkle_commit::digest::{combine, hash_secret};
///
/// let a = hash_secret("a");
/// let b = hash_secret("b");
///
/// let parent = combine(&a, &b);
/// assert_eq!(
///     parent.as_str(),
///     "62af5c3cb8da3e4f25061e829ebeea5c7513c54949115b1acc225930a90154da"
/// );
/// assert_ne!(combine(&a, &b), combine(&b, &a));
/// ```
pub fn combine(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(left.as_str().as_bytes());
    hasher.update(right.as_str().as_bytes());
    Digest(hex::encode(hasher.finalize()))
}

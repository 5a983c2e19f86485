//! Content checksums
//!
//! Provides [`Checksum`], a strongly-typed SHA-256 digest used to check that
//! a stored file still matches the metadata recorded for it. This is an
//! integrity check, not authentication.

use crate::content::FileSource;
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte SHA-256 digest
///
/// Immutable and cheap to clone (Copy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Checksum([u8; 32]);

impl Checksum {
    /// Create a checksum from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create checksum from byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 32 bytes
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ChecksumError> {
        if bytes.len() != 32 {
            return Err(ChecksumError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// SHA-256 of the full content
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        Self(digest.into())
    }

    /// Read the whole source, then hash it
    ///
    /// # Errors
    /// Returns [`ChecksumError::Unreadable`] if the content cannot be read;
    /// an empty digest is never substituted
    pub async fn from_source(source: &FileSource) -> Result<Self, ChecksumError> {
        let bytes = source
            .read_all()
            .await
            .map_err(|e| ChecksumError::Unreadable(e.to_string()))?;
        Ok(Self::compute(&bytes))
    }

    /// Whether `data` hashes to this checksum
    #[inline]
    #[must_use]
    pub fn verify(&self, data: &[u8]) -> bool {
        Self::compute(data) == *self
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for Checksum {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Checksum {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8; 32]> for Checksum {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

impl serde::Serialize for Checksum {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Checksum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when computing or parsing checksums
#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    /// Content could not be read in full
    #[error("integrity check failed: content unreadable: {0}")]
    Unreadable(String),

    /// Invalid digest length
    #[error("invalid checksum length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Digest length in bytes
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Hex encoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn compute_deterministic() {
        let h1 = Checksum::compute(b"hello world");
        let h2 = Checksum::compute(b"hello world");
        assert_eq!(h1, h2);
    }

    #[test]
    fn compute_different_data() {
        assert_ne!(Checksum::compute(b"data1"), Checksum::compute(b"data2"));
    }

    #[test]
    fn known_vector() {
        assert_eq!(
            Checksum::compute(b"abc").to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn display_and_parse() {
        let sum = Checksum::compute(b"test");
        let parsed: Checksum = sum.to_string().parse().unwrap();
        assert_eq!(sum, parsed);
    }

    #[test]
    fn from_slice_invalid_length() {
        let result = Checksum::from_slice(&[1u8; 31]);
        assert!(matches!(
            result,
            Err(ChecksumError::InvalidLength {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn verify_detects_changes() {
        let sum = Checksum::compute(b"original");
        assert!(sum.verify(b"original"));
        assert!(!sum.verify(b"tampered"));
    }

    #[test]
    fn short_prefixes_full() {
        let sum = Checksum::compute(b"test");
        assert_eq!(sum.short().len(), 16);
        assert!(sum.to_string().starts_with(&sum.short()));
    }

    #[test]
    fn serde_as_hex() {
        let sum = Checksum::compute(b"test");
        let json = serde_json::to_string(&sum).unwrap();
        assert_eq!(json.len(), 66);
        let back: Checksum = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sum);
    }

    #[tokio::test]
    async fn unreadable_source_is_an_error() {
        let source = FileSource::Path(PathBuf::from("/no/such/file"));
        let err = Checksum::from_source(&source).await.unwrap_err();
        assert!(matches!(err, ChecksumError::Unreadable(_)));
        assert!(err.to_string().starts_with("integrity check failed"));
    }
}

//! Deterministic user identity derivation
//!
//! Provides [`UserId`], a stable opaque identifier derived from an email
//! address. Drafts are keyed by this identifier so the raw email is never
//! persisted.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use sha2::{Digest, Sha256};

/// Length of a [`UserId`] in hex characters (96-bit digest prefix)
pub const USER_ID_LEN: usize = 24;

/// Opaque user identity derived from a normalized email
///
/// Two equal normalized emails always yield the same identity. Collisions
/// across different emails are accepted as a known limitation of the
/// truncated digest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(String);

impl UserId {
    /// Derive an identity from an email address
    ///
    /// Normalizes the email (trim + lowercase), hashes it with SHA-256, and
    /// keeps the first [`USER_ID_LEN`] hex characters. Pure function, no I/O.
    ///
    /// # Errors
    /// Returns [`IdentityError::InvalidInput`] if the email is empty after
    /// trimming.
    pub fn derive(email: &str) -> Result<Self, IdentityError> {
        let normalized = email.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(IdentityError::InvalidInput);
        }

        let digest = Sha256::digest(normalized.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(USER_ID_LEN);
        Ok(Self(encoded))
    }

    /// Identity as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the underlying string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = IdentityError;

    /// Parse an existing identity string
    ///
    /// Accepts exactly [`USER_ID_LEN`] lowercase hex characters: the shape
    /// [`UserId::derive`] produces. Anything else is rejected, which lets
    /// boundaries validate identity-shaped path parameters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != USER_ID_LEN {
            return Err(IdentityError::MalformedId {
                expected: USER_ID_LEN,
                actual: s.len(),
            });
        }
        if !s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
            return Err(IdentityError::NonHexId);
        }
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Serialize as a plain string so identities embed naturally in JSON maps.
impl serde::Serialize for UserId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors from identity derivation and parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Email was empty or whitespace-only
    #[error("email is required")]
    InvalidInput,

    /// Identity string has the wrong length
    #[error("malformed user id: expected {expected} characters, got {actual}")]
    MalformedId {
        /// Required length
        expected: usize,
        /// Observed length
        actual: usize,
    },

    /// Identity string contains non-hex characters
    #[error("malformed user id: expected lowercase hex")]
    NonHexId,
}

//! Cryptographic primitives for session signing
//!
//! MAC comparison must run in constant time; everything that checks a
//! signature goes through [`HmacKey::verify`] or [`constant_time_eq`].

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// HMAC-SHA256 output length
pub const MAC_LENGTH: usize = 32;

/// Signing key shared by all clones of a codec.
#[derive(Clone)]
pub struct HmacKey {
    key_bytes: Arc<[u8]>,
}

impl HmacKey {
    /// Keys shorter than this are accepted but logged as weak at startup
    pub const RECOMMENDED_KEY_LENGTH: usize = 32;

    /// Create a new HMAC key from bytes.
    ///
    /// # Errors
    /// Returns error if the key is empty.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, HmacKeyError> {
        let key_bytes = key.as_ref();
        if key_bytes.is_empty() {
            return Err(HmacKeyError::Empty);
        }
        Ok(Self {
            key_bytes: Arc::from(key_bytes),
        })
    }

    /// Whether the key is below the recommended length
    pub fn is_weak(&self) -> bool {
        self.key_bytes.len() < Self::RECOMMENDED_KEY_LENGTH
    }

    fn create_hmac(&self) -> Hmac<Sha256> {
        // HMAC accepts keys of any length
        Hmac::<Sha256>::new_from_slice(&self.key_bytes).expect("HMAC accepts any key length")
    }

    /// Sign data and return the MAC bytes
    pub fn sign(&self, data: &[u8]) -> [u8; MAC_LENGTH] {
        let mut mac = self.create_hmac();
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Verify a signature in constant time
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let expected = self.sign(data);
        constant_time_eq(&expected, signature)
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKey")
            .field("key_length", &self.key_bytes.len())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating an HMAC key
#[derive(Debug, Clone, thiserror::Error)]
pub enum HmacKeyError {
    #[error("HMAC key is empty")]
    Empty,
}

/// Constant-time byte slice comparison.
///
/// Slices of different lengths compare unequal without inspecting contents;
/// length is not secret.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

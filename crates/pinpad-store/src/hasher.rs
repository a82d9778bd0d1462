//! PIN verifier schemes
//!
//! The legacy scheme is an unsalted MD5 digest rendered as 32 lowercase hex
//! characters. It is kept bit-for-bit so existing stored values keep
//! verifying, and it is weak: unsalted, fast, and trivially brute-forced over
//! a short numeric space. Argon2id is available for new deployments. The two
//! record formats are not interchangeable and nothing here migrates one to
//! the other.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use md5::{Digest, Md5};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::warn;
use zeroize::Zeroizing;

use crate::error::{Result, StoreError};

/// Stored verifier format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HashScheme {
    /// Unsalted MD5, lowercase hex
    #[default]
    LegacyMd5,
    /// Argon2id PHC string
    Argon2id,
}

impl HashScheme {
    /// Hasher implementing this scheme
    pub fn hasher(self) -> Box<dyn PinHasher> {
        match self {
            HashScheme::LegacyMd5 => Box::new(LegacyMd5Hasher),
            HashScheme::Argon2id => Box::new(Argon2Hasher::default()),
        }
    }
}

/// Derives and checks PIN verifiers
pub trait PinHasher {
    /// Verifier to persist for `pin`
    fn hash(&self, pin: &str) -> Result<String>;

    /// Whether `pin` matches the persisted verifier
    fn verify(&self, pin: &str, stored: &str) -> Result<bool> {
        Ok(self.hash(pin)?.as_bytes() == stored.as_bytes())
    }

    fn scheme(&self) -> HashScheme;
}

/// MD5 digest of `pin`, two lowercase hex digits per byte
pub fn md5_hex(pin: &str) -> String {
    let pin_bytes = Zeroizing::new(pin.as_bytes().to_vec());
    hex::encode(Md5::digest(pin_bytes.as_slice()))
}

/// Unsalted MD5, compatible with previously stored verifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyMd5Hasher;

impl PinHasher for LegacyMd5Hasher {
    fn hash(&self, pin: &str) -> Result<String> {
        Ok(md5_hex(pin))
    }

    fn scheme(&self) -> HashScheme {
        HashScheme::LegacyMd5
    }
}

/// Salted Argon2id with default parameters
#[derive(Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl PinHasher for Argon2Hasher {
    fn hash(&self, pin: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let pin_bytes = Zeroizing::new(pin.as_bytes().to_vec());

        let hash = self
            .argon2
            .hash_password(&pin_bytes, &salt)
            .map_err(|e| StoreError::DigestUnavailable(format!("Failed to hash PIN: {}", e)))?
            .to_string();

        Ok(hash)
    }

    fn verify(&self, pin: &str, stored: &str) -> Result<bool> {
        // Records from another scheme fail closed
        let parsed_hash = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Stored verifier is not an Argon2 hash: {}", e);
                return Ok(false);
            }
        };

        let pin_bytes = Zeroizing::new(pin.as_bytes().to_vec());
        Ok(self.argon2.verify_password(&pin_bytes, &parsed_hash).is_ok())
    }

    fn scheme(&self) -> HashScheme {
        HashScheme::Argon2id
    }
}

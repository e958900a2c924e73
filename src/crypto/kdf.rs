//! Password-based key derivation using PBKDF2.
//!
//! HMAC over the selected SHA-2 hash is the pseudorandom function.  The
//! defaults (SHA-256, 512 iterations, 32 bytes) are kept for
//! compatibility with existing profiles; 512 iterations is weak for
//! password hashing, so callers handling real passwords should raise it.

use std::fmt;
use std::str::FromStr;

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use crate::errors::{ProfileCryptError, Result};

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 512;

/// Default derived key length in bytes.
pub const DEFAULT_KEY_LEN: usize = 32;

/// Hash functions available as the HMAC pseudorandom function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Digest output length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// The WebCrypto-style name, e.g. `SHA-256`.
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = ProfileCryptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().replace('_', "-").as_str() {
            "SHA-256" | "SHA256" => Ok(HashAlgorithm::Sha256),
            "SHA-384" | "SHA384" => Ok(HashAlgorithm::Sha384),
            "SHA-512" | "SHA512" => Ok(HashAlgorithm::Sha512),
            _ => Err(ProfileCryptError::UnsupportedHashAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// PBKDF2 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbkdf2Params {
    pub hash: HashAlgorithm,
    pub iterations: u32,
    pub key_length: usize,
}

impl Default for Pbkdf2Params {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::Sha256,
            iterations: DEFAULT_ITERATIONS,
            key_length: DEFAULT_KEY_LEN,
        }
    }
}

impl Pbkdf2Params {
    fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(ProfileCryptError::InvalidParameters(
                "iterations must be at least 1".into(),
            ));
        }
        if self.key_length == 0 {
            return Err(ProfileCryptError::InvalidParameters(
                "key length must be at least 1 byte".into(),
            ));
        }
        let max_len = u32::MAX as u64 * self.hash.output_len() as u64;
        if self.key_length as u64 > max_len {
            return Err(ProfileCryptError::InvalidParameters(format!(
                "key length {} exceeds the PBKDF2 maximum of {max_len} bytes",
                self.key_length
            )));
        }
        Ok(())
    }
}

/// A key derivation function configured once and reused.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyDerivation {
    params: Pbkdf2Params,
}

impl KeyDerivation {
    pub fn new(params: Pbkdf2Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Pbkdf2Params {
        &self.params
    }

    /// Derive key material from a password and salt.
    pub fn derive(&self, password: &str, salt: &str) -> Result<Zeroizing<Vec<u8>>> {
        derive(password, salt, &self.params)
    }
}

/// Derive `params.key_length` bytes from `password` and `salt`.
///
/// Both strings are used as their UTF-8 bytes.  The same inputs always
/// produce the same output.
pub fn derive(password: &str, salt: &str, params: &Pbkdf2Params) -> Result<Zeroizing<Vec<u8>>> {
    params.validate()?;

    let mut out = Zeroizing::new(vec![0u8; params.key_length]);
    let password = password.as_bytes();
    let salt = salt.as_bytes();

    let rounds = params.iterations;
    match params.hash {
        HashAlgorithm::Sha256 => pbkdf2::<Hmac<Sha256>>(password, salt, rounds, &mut out),
        HashAlgorithm::Sha384 => pbkdf2::<Hmac<Sha384>>(password, salt, rounds, &mut out),
        HashAlgorithm::Sha512 => pbkdf2::<Hmac<Sha512>>(password, salt, rounds, &mut out),
    }
    .map_err(|e| ProfileCryptError::InvalidParameters(format!("HMAC key: {e}")))?;

    Ok(out)
}

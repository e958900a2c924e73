//! Cryptographic primitives for profilecrypt.
//!
//! This module provides:
//! - base64 / hex encodings for key material (`codec`)
//! - X25519 key pair generation (`keypair`)
//! - PBKDF2 password-based key derivation (`kdf`)
//! - x25519-xsalsa20-poly1305 field envelopes (`field`)

pub mod codec;
pub mod field;
pub mod kdf;
pub mod keypair;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, generate_keypair, ...};
pub use codec::{bytes_to_hex, decode_base64, encode_base64};
pub use field::{decrypt, decrypt_with_hex_key, encrypt, encrypt_with_rng, EncryptedField, SCHEME_VERSION};
pub use kdf::{derive, HashAlgorithm, KeyDerivation, Pbkdf2Params};
pub use keypair::{generate_keypair, KeyPair, KeyPairGenerator};

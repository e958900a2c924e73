//! Text encodings for key material.
//!
//! Keys and envelope fields are stored as standard, padded base64.  The
//! hex form (lowercase, two digits per byte) is the private-key format
//! understood by Ethereum-style tooling and by `decrypt_with_hex_key`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::errors::{ProfileCryptError, Result};

/// Length of an X25519 key in bytes.
pub const KEY_LEN: usize = 32;

/// Encode raw bytes as standard padded base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode standard padded base64.
///
/// Non-alphabet characters and incorrect padding are rejected.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded)
        .map_err(|e| ProfileCryptError::Decode(format!("invalid base64: {e}")))
}

/// Encode bytes as lowercase hex, each byte zero-padded to two digits.
///
/// The output is always exactly `2 * bytes.len()` characters long.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string (either case) back into bytes.
pub fn hex_to_bytes(encoded: &str) -> Result<Vec<u8>> {
    hex::decode(encoded).map_err(|e| ProfileCryptError::Decode(format!("invalid hex: {e}")))
}

/// Decode a base64 key and check that it is exactly 32 bytes.
///
/// `what` names the key in the error message (e.g. "private key").
pub fn decode_key(encoded: &str, what: &str) -> Result<[u8; KEY_LEN]> {
    let bytes = decode_base64(encoded)
        .map_err(|e| ProfileCryptError::Decode(format!("{what}: {e}")))?;
    to_key_array(&bytes, what)
}

/// Copy a byte slice into a fixed 32-byte key array.
pub(crate) fn to_key_array(bytes: &[u8], what: &str) -> Result<[u8; KEY_LEN]> {
    <[u8; KEY_LEN]>::try_from(bytes).map_err(|_| {
        ProfileCryptError::Decode(format!(
            "{what} must be {KEY_LEN} bytes, got {}",
            bytes.len()
        ))
    })
}

/// Serde helpers for `[u8; 32]` keys stored as base64 strings.
pub(crate) mod base64_key {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{to_key_array, BASE64, KEY_LEN};
    use base64::Engine;

    pub fn serialize<S>(key: &[u8; KEY_LEN], serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&BASE64.encode(key))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<[u8; KEY_LEN], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = BASE64.decode(&s).map_err(serde::de::Error::custom)?;
        to_key_array(&bytes, "key").map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_roundtrip_preserves_bytes() {
        for bytes in [vec![], vec![0u8], vec![0xFF; 31], (0..=255u8).collect::<Vec<_>>()] {
            let encoded = encode_base64(&bytes);
            assert_eq!(decode_base64(&encoded).unwrap(), bytes);
        }
    }

    #[test]
    fn decode_base64_rejects_bad_alphabet() {
        assert!(matches!(
            decode_base64("not*base64!"),
            Err(ProfileCryptError::Decode(_))
        ));
    }

    #[test]
    fn decode_base64_rejects_bad_padding() {
        // "AAE=" is valid; dropping the padding is not accepted by the
        // padded engine.
        assert!(decode_base64("AAE=").is_ok());
        assert!(decode_base64("AAE").is_err());
        assert!(decode_base64("AA=E").is_err());
    }

    #[test]
    fn hex_is_lowercase_and_zero_padded() {
        assert_eq!(bytes_to_hex(&[0x00, 0x0a, 0xff, 0x10]), "000aff10");
        assert_eq!(bytes_to_hex(&[]), "");
    }

    #[test]
    fn hex_length_is_twice_byte_length() {
        let bytes = [0u8, 1, 2, 3, 0xAB, 0xCD, 0xEF];
        assert_eq!(bytes_to_hex(&bytes).len(), 2 * bytes.len());
    }

    #[test]
    fn hex_roundtrip() {
        let bytes = [0x00u8, 0x01, 0x7f, 0x80, 0xfe];
        assert_eq!(hex_to_bytes(&bytes_to_hex(&bytes)).unwrap(), bytes);
        assert!(hex_to_bytes("zz").is_err());
        assert!(hex_to_bytes("abc").is_err());
    }

    #[test]
    fn decode_key_checks_length() {
        let key = decode_key(&encode_base64(&[7u8; 32]), "public key").unwrap();
        assert_eq!(key, [7u8; 32]);

        let err = decode_key(&encode_base64(&[7u8; 16]), "public key").unwrap_err();
        assert!(err.to_string().contains("public key must be 32 bytes"));
    }
}

//! Per-field public-key encryption (`x25519-xsalsa20-poly1305`).
//!
//! Each call to `encrypt` draws a fresh ephemeral X25519 key and a fresh
//! 24-byte nonce, computes the shared secret with the recipient's public
//! key, and seals the UTF-8 plaintext with XSalsa20-Poly1305 (NaCl
//! `box`).  The result is a self-describing envelope:
//!
//! ```text
//! {
//!   "version":        "x25519-xsalsa20-poly1305",
//!   "nonce":          base64(24 bytes),
//!   "ephemPublicKey": base64(32 bytes),
//!   "ciphertext":     base64(16-byte tag || ciphertext),
//!   "visibleTo":      base64(recipient public key)
//! }
//! ```
//!
//! `visibleTo` is an unauthenticated routing hint.  The Poly1305 tag is
//! what actually decides whether a key can open the envelope.

use crypto_box::aead::{Aead, Nonce};
use crypto_box::{PublicKey, SalsaBox, SecretKey};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use super::codec::{self, KEY_LEN};
use crate::errors::{ProfileCryptError, Result};

/// Scheme identifier written into every envelope.
pub const SCHEME_VERSION: &str = "x25519-xsalsa20-poly1305";

/// Size of the XSalsa20 nonce in bytes.
const NONCE_LEN: usize = 24;

/// Size of the Poly1305 tag in bytes.
const TAG_LEN: usize = 16;

/// Attribute names an object must carry to count as an envelope.
const ENVELOPE_ATTRS: [&str; 4] = ["version", "nonce", "ciphertext", "visibleTo"];
const EPHEMERAL_ATTR: &str = "ephemPublicKey";
const EPHEMERAL_ATTR_ALIAS: &str = "ephemeralPublicKey";

/// An encrypted field value in its wire form.
///
/// Byte fields are kept as their base64 text; they are decoded and
/// validated only when the envelope is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedField {
    pub version: String,
    pub nonce: String,
    #[serde(rename = "ephemPublicKey", alias = "ephemeralPublicKey")]
    pub ephem_public_key: String,
    pub ciphertext: String,
    pub visible_to: String,
}

impl EncryptedField {
    /// True if `object` carries every envelope attribute.
    ///
    /// Objects missing any of them are plain data, never decryption
    /// candidates.
    pub fn has_envelope_shape(object: &Map<String, Value>) -> bool {
        ENVELOPE_ATTRS.iter().all(|attr| object.contains_key(*attr))
            && (object.contains_key(EPHEMERAL_ATTR) || object.contains_key(EPHEMERAL_ATTR_ALIAS))
    }

    /// Read an envelope out of a JSON value.
    ///
    /// Attributes that are present but not strings yield
    /// `MalformedEnvelope`.
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| ProfileCryptError::MalformedEnvelope(e.to_string()))
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|e| ProfileCryptError::SerializationError(format!("envelope: {e}")))
    }
}

/// Encrypt `plaintext` to the base64 `recipient_public_key` using the
/// operating system's CSPRNG.
pub fn encrypt(recipient_public_key: &str, plaintext: &str) -> Result<EncryptedField> {
    encrypt_with_rng(&mut OsRng, recipient_public_key, plaintext)
}

/// Encrypt with an explicit randomness source.
///
/// The ephemeral key and nonce are drawn from `rng` on every call and are
/// never reused.
pub fn encrypt_with_rng<R>(
    rng: &mut R,
    recipient_public_key: &str,
    plaintext: &str,
) -> Result<EncryptedField>
where
    R: RngCore + CryptoRng,
{
    let recipient = parse_recipient_key(recipient_public_key)?;

    let mut ephemeral_bytes = Zeroizing::new([0u8; KEY_LEN]);
    fill_random(rng, &mut ephemeral_bytes[..])?;
    let ephemeral = SecretKey::from(*ephemeral_bytes);
    let ephemeral_public = ephemeral.public_key();

    let mut nonce = [0u8; NONCE_LEN];
    fill_random(rng, &mut nonce)?;

    let ciphertext = SalsaBox::new(&recipient, &ephemeral)
        .encrypt(Nonce::<SalsaBox>::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| ProfileCryptError::EncryptionFailed(format!("xsalsa20-poly1305: {e}")))?;

    tracing::debug!(
        recipient = %recipient_public_key,
        bytes = plaintext.len(),
        "encrypted field"
    );

    Ok(EncryptedField {
        version: SCHEME_VERSION.to_string(),
        nonce: codec::encode_base64(&nonce),
        ephem_public_key: codec::encode_base64(ephemeral_public.as_bytes()),
        ciphertext: codec::encode_base64(&ciphertext),
        visible_to: recipient_public_key.to_string(),
    })
}

/// Decrypt an envelope with the holder's base64 private key.
///
/// The key is converted to its hex form and handed to
/// `decrypt_with_hex_key`.
pub fn decrypt(own_private_key: &str, envelope: &EncryptedField) -> Result<String> {
    let raw = Zeroizing::new(codec::decode_key(own_private_key, "private key")?);
    let hex = Zeroizing::new(codec::bytes_to_hex(&raw[..]));
    decrypt_with_hex_key(&hex, envelope)
}

/// Decrypt an envelope with a hex-encoded private key.
pub fn decrypt_with_hex_key(own_private_key_hex: &str, envelope: &EncryptedField) -> Result<String> {
    let secret = parse_hex_private_key(own_private_key_hex)?;
    open(&secret, envelope)
}

/// Parse a hex private key into a `SecretKey`.
pub(crate) fn parse_hex_private_key(hex: &str) -> Result<SecretKey> {
    let raw = Zeroizing::new(codec::hex_to_bytes(hex)?);
    let bytes = Zeroizing::new(codec::to_key_array(&raw, "private key")?);
    Ok(SecretKey::from(*bytes))
}

/// Open an envelope with an already parsed secret key.
pub(crate) fn open(secret: &SecretKey, envelope: &EncryptedField) -> Result<String> {
    if envelope.version != SCHEME_VERSION {
        return Err(ProfileCryptError::MalformedEnvelope(format!(
            "unsupported version '{}'",
            envelope.version
        )));
    }

    let nonce = decode_attr(&envelope.nonce, "nonce")?;
    if nonce.len() != NONCE_LEN {
        return Err(ProfileCryptError::MalformedEnvelope(format!(
            "nonce must be {NONCE_LEN} bytes, got {}",
            nonce.len()
        )));
    }

    let ephemeral = decode_attr(&envelope.ephem_public_key, "ephemPublicKey")?;
    let ephemeral: [u8; KEY_LEN] = ephemeral.as_slice().try_into().map_err(|_| {
        ProfileCryptError::MalformedEnvelope(format!(
            "ephemPublicKey must be {KEY_LEN} bytes, got {}",
            ephemeral.len()
        ))
    })?;

    let ciphertext = decode_attr(&envelope.ciphertext, "ciphertext")?;
    if ciphertext.len() < TAG_LEN {
        return Err(ProfileCryptError::MalformedEnvelope(
            "ciphertext shorter than the authentication tag".into(),
        ));
    }

    let plaintext = SalsaBox::new(&PublicKey::from(ephemeral), secret)
        .decrypt(Nonce::<SalsaBox>::from_slice(&nonce), ciphertext.as_slice())
        .map_err(|_| ProfileCryptError::AuthenticationFailed)?;

    String::from_utf8(plaintext)
        .map_err(|_| ProfileCryptError::MalformedEnvelope("plaintext is not valid UTF-8".into()))
}

fn parse_recipient_key(encoded: &str) -> Result<PublicKey> {
    let bytes = codec::decode_key(encoded, "recipient public key")
        .map_err(|e| ProfileCryptError::InvalidRecipientKey(e.to_string()))?;
    // The all-zero point has small order and would give an all-zero
    // shared secret.
    if bytes == [0u8; KEY_LEN] {
        return Err(ProfileCryptError::InvalidRecipientKey(
            "recipient public key is the identity point".into(),
        ));
    }
    Ok(PublicKey::from(bytes))
}

fn decode_attr(encoded: &str, name: &str) -> Result<Vec<u8>> {
    codec::decode_base64(encoded)
        .map_err(|e| ProfileCryptError::MalformedEnvelope(format!("{name}: {e}")))
}

fn fill_random<R: RngCore + CryptoRng>(rng: &mut R, dest: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(dest)
        .map_err(|e| ProfileCryptError::EntropySourceUnavailable(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keypair::generate_keypair;
    use serde_json::json;

    #[test]
    fn roundtrip_with_generated_keys() {
        let kp = generate_keypair().unwrap();
        let envelope = encrypt(&kp.public_base64(), "secret-42").unwrap();
        assert_eq!(envelope.version, SCHEME_VERSION);
        assert_eq!(envelope.visible_to, kp.public_base64());
        assert_eq!(decrypt(&kp.private_base64(), &envelope).unwrap(), "secret-42");
    }

    #[test]
    fn hex_key_path_matches_base64_path() {
        let kp = generate_keypair().unwrap();
        let envelope = encrypt(&kp.public_base64(), "via hex").unwrap();
        assert_eq!(
            decrypt_with_hex_key(&kp.private_hex(), &envelope).unwrap(),
            "via hex"
        );
    }

    #[test]
    fn ciphertext_carries_tag() {
        let kp = generate_keypair().unwrap();
        let envelope = encrypt(&kp.public_base64(), "abc").unwrap();
        let ct = codec::decode_base64(&envelope.ciphertext).unwrap();
        assert_eq!(ct.len(), 3 + TAG_LEN);
        assert_eq!(codec::decode_base64(&envelope.nonce).unwrap().len(), NONCE_LEN);
    }

    #[test]
    fn rejects_bad_recipient_keys() {
        let identity = codec::encode_base64(&[0u8; 32]);
        for bad in ["", "***", "AAAA", identity.as_str()] {
            assert!(
                matches!(encrypt(bad, "x"), Err(ProfileCryptError::InvalidRecipientKey(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_version_is_malformed() {
        let kp = generate_keypair().unwrap();
        let mut envelope = encrypt(&kp.public_base64(), "x").unwrap();
        envelope.version = "x25519-chacha20-poly1305".into();
        assert!(matches!(
            decrypt(&kp.private_base64(), &envelope),
            Err(ProfileCryptError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn bad_base64_and_lengths_are_malformed() {
        let kp = generate_keypair().unwrap();
        let good = encrypt(&kp.public_base64(), "x").unwrap();

        let mut bad_nonce = good.clone();
        bad_nonce.nonce = codec::encode_base64(&[1u8; 12]);
        let mut bad_ephem = good.clone();
        bad_ephem.ephem_public_key = "%%%".into();
        let mut short_ct = good.clone();
        short_ct.ciphertext = codec::encode_base64(&[0u8; 4]);

        for envelope in [bad_nonce, bad_ephem, short_ct] {
            assert!(matches!(
                decrypt(&kp.private_base64(), &envelope),
                Err(ProfileCryptError::MalformedEnvelope(_))
            ));
        }
    }

    #[test]
    fn bad_private_key_is_a_decode_error() {
        let kp = generate_keypair().unwrap();
        let envelope = encrypt(&kp.public_base64(), "x").unwrap();
        assert!(matches!(
            decrypt("not base64!", &envelope),
            Err(ProfileCryptError::Decode(_))
        ));
        assert!(matches!(
            decrypt_with_hex_key("abcd", &envelope),
            Err(ProfileCryptError::Decode(_))
        ));
    }

    #[test]
    fn envelope_shape_requires_every_attribute() {
        let full = json!({
            "version": SCHEME_VERSION,
            "nonce": "a",
            "ephemPublicKey": "b",
            "ciphertext": "c",
            "visibleTo": "d",
        });
        assert!(EncryptedField::has_envelope_shape(full.as_object().unwrap()));

        let alias = json!({
            "version": SCHEME_VERSION,
            "nonce": "a",
            "ephemeralPublicKey": "b",
            "ciphertext": "c",
            "visibleTo": "d",
        });
        assert!(EncryptedField::has_envelope_shape(alias.as_object().unwrap()));
        assert_eq!(EncryptedField::from_value(&alias).unwrap().ephem_public_key, "b");

        let missing = json!({ "version": SCHEME_VERSION, "nonce": "a", "ciphertext": "c" });
        assert!(!EncryptedField::has_envelope_shape(missing.as_object().unwrap()));
    }

    #[test]
    fn serializes_wire_attribute_names() {
        let kp = generate_keypair().unwrap();
        let value = encrypt(&kp.public_base64(), "x").unwrap().to_value().unwrap();
        let object = value.as_object().unwrap();
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["version", "nonce", "ephemPublicKey", "ciphertext", "visibleTo"]
        );
    }
}

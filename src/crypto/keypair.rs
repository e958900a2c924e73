//! X25519 key pairs for field encryption.
//!
//! A `KeyPairGenerator` owns the randomness source it draws from, so the
//! caller decides which CSPRNG backs key generation.  The default uses
//! the operating system's generator.

use crypto_box::SecretKey;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::codec::{self, KEY_LEN};
use crate::errors::{ProfileCryptError, Result};

/// An X25519 key pair.
///
/// Serializes to the interchange form
/// `{ "publicKey": "<base64>", "privateKey": "<base64>" }`.
/// Both halves are wiped from memory on drop.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    #[serde(with = "codec::base64_key")]
    public_key: [u8; KEY_LEN],

    #[serde(with = "codec::base64_key")]
    private_key: [u8; KEY_LEN],
}

impl KeyPair {
    /// Rebuild a key pair from raw private key bytes.
    pub fn from_private_bytes(private_key: [u8; KEY_LEN]) -> Self {
        let secret = SecretKey::from(private_key);
        let public_key = *secret.public_key().as_bytes();
        Self {
            public_key,
            private_key: secret.to_bytes(),
        }
    }

    /// Parse the textual interchange form.
    ///
    /// The public key must be the one that belongs to the private key.
    pub fn from_base64(public_key: &str, private_key: &str) -> Result<Self> {
        let private = Zeroizing::new(codec::decode_key(private_key, "private key")?);
        let public = codec::decode_key(public_key, "public key")?;
        let pair = Self::from_private_bytes(*private);
        if pair.public_key != public {
            return Err(ProfileCryptError::Decode(
                "public key does not match private key".into(),
            ));
        }
        Ok(pair)
    }

    /// Check that the stored public key belongs to the private key.
    ///
    /// Needed after deserializing, since serde fills both fields
    /// independently.
    pub fn verify(&self) -> Result<()> {
        let derived = Self::from_private_bytes(self.private_key);
        if derived.public_key != self.public_key {
            return Err(ProfileCryptError::Decode(
                "public key does not match private key".into(),
            ));
        }
        Ok(())
    }

    pub fn public_bytes(&self) -> &[u8; KEY_LEN] {
        &self.public_key
    }

    pub fn private_bytes(&self) -> &[u8; KEY_LEN] {
        &self.private_key
    }

    /// Public key as base64; this is the value recipients publish and
    /// senders put in `visibleTo`.
    pub fn public_base64(&self) -> String {
        codec::encode_base64(&self.public_key)
    }

    pub fn private_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(codec::encode_base64(&self.private_key))
    }

    /// Private key as lowercase hex.
    pub fn private_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(codec::bytes_to_hex(&self.private_key))
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_base64())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Generates key pairs from an injected CSPRNG.
pub struct KeyPairGenerator<R = OsRng> {
    rng: R,
}

impl<R: RngCore + CryptoRng> KeyPairGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draw a fresh private key and derive its public key.
    pub fn generate(&mut self) -> Result<KeyPair> {
        let mut private = Zeroizing::new([0u8; KEY_LEN]);
        self.rng
            .try_fill_bytes(&mut private[..])
            .map_err(|e| ProfileCryptError::EntropySourceUnavailable(e.to_string()))?;

        let pair = KeyPair::from_private_bytes(*private);
        tracing::debug!(public_key = %pair.public_base64(), "generated key pair");
        Ok(pair)
    }
}

impl Default for KeyPairGenerator<OsRng> {
    fn default() -> Self {
        Self::new(OsRng)
    }
}

/// Generate a key pair from the operating system's CSPRNG.
pub fn generate_keypair() -> Result<KeyPair> {
    KeyPairGenerator::default().generate()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An RNG whose every draw fails, standing in for a host without entropy.
    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "no entropy",
            )))
        }
    }

    impl CryptoRng for BrokenRng {}

    #[test]
    fn generated_keys_are_distinct() {
        let kp1 = generate_keypair().unwrap();
        let kp2 = generate_keypair().unwrap();
        assert_ne!(kp1.private_bytes(), kp2.private_bytes());
        assert_ne!(kp1.public_bytes(), kp2.public_bytes());
        assert_ne!(kp1.public_bytes(), kp1.private_bytes());
    }

    #[test]
    fn failing_rng_reports_missing_entropy() {
        let mut gen = KeyPairGenerator::new(BrokenRng);
        assert!(matches!(
            gen.generate(),
            Err(ProfileCryptError::EntropySourceUnavailable(_))
        ));
    }

    #[test]
    fn from_private_bytes_matches_x25519_base_point_mult() {
        // RFC 7748 section 6.1, Alice's key pair.
        let private: [u8; 32] = codec::hex_to_bytes(
            "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a",
        )
        .unwrap()
        .try_into()
        .unwrap();
        let pair = KeyPair::from_private_bytes(private);
        assert_eq!(
            codec::bytes_to_hex(pair.public_bytes()),
            "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a"
        );
    }

    #[test]
    fn from_base64_rejects_mismatched_public_key() {
        let kp = generate_keypair().unwrap();
        let other = generate_keypair().unwrap();
        assert!(KeyPair::from_base64(&kp.public_base64(), &kp.private_base64()).is_ok());
        assert!(KeyPair::from_base64(&other.public_base64(), &kp.private_base64()).is_err());
    }

    #[test]
    fn serializes_to_interchange_form() {
        let kp = generate_keypair().unwrap();
        let json = serde_json::to_value(&kp).unwrap();
        assert_eq!(json["publicKey"], kp.public_base64());
        assert_eq!(json["privateKey"].as_str().unwrap(), kp.private_base64().as_str());

        let back: KeyPair = serde_json::from_value(json).unwrap();
        back.verify().unwrap();
        assert_eq!(back.public_bytes(), kp.public_bytes());
    }

    #[test]
    fn debug_redacts_private_key() {
        let kp = generate_keypair().unwrap();
        let shown = format!("{kp:?}");
        assert!(shown.contains("<redacted>"));
        assert!(!shown.contains(kp.private_base64().as_str()));
    }
}

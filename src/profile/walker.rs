//! Selective decryption of a profile document.
//!
//! The walker visits every top-level field in order and decides, per
//! field, between two outcomes: the value was an envelope addressed to us
//! and opened cleanly (`Decrypted`), or it is copied as-is
//! (`PassThrough`).  Envelope failures are routine here (a field for
//! someone else, a tampered field) and only ever show up as a
//! pass-through reason, never as an error.

use crypto_box::SecretKey;
use serde_json::Value;
use zeroize::Zeroizing;

use super::document::Document;
use crate::crypto::codec;
use crate::crypto::field::{self, EncryptedField};
use crate::errors::{ProfileCryptError, Result};

/// Why a field was copied through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassReason {
    /// Not an object, or an object without every envelope attribute.
    NotEncrypted,
    /// An envelope whose `visibleTo` names a different public key.
    AddressedElsewhere,
    /// Addressed to us, but the tag did not verify.
    AuthenticationFailed,
    /// Addressed to us, but the envelope could not be read.
    Malformed(String),
}

/// What happened to one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    Decrypted(String),
    PassThrough { original: Value, reason: PassReason },
}

impl FieldOutcome {
    /// The value this field takes in the output document.
    pub fn into_value(self) -> Value {
        match self {
            FieldOutcome::Decrypted(plaintext) => Value::String(plaintext),
            FieldOutcome::PassThrough { original, .. } => original,
        }
    }

    pub fn is_decrypted(&self) -> bool {
        matches!(self, FieldOutcome::Decrypted(_))
    }

    fn pass(original: &Value, reason: PassReason) -> Self {
        FieldOutcome::PassThrough {
            original: original.clone(),
            reason,
        }
    }
}

/// Counts of each outcome over one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkReport {
    pub decrypted: usize,
    pub plain: usize,
    pub addressed_elsewhere: usize,
    pub failed: usize,
}

impl WalkReport {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a FieldOutcome>) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            match outcome {
                FieldOutcome::Decrypted(_) => report.decrypted += 1,
                FieldOutcome::PassThrough { reason, .. } => match reason {
                    PassReason::NotEncrypted => report.plain += 1,
                    PassReason::AddressedElsewhere => report.addressed_elsewhere += 1,
                    PassReason::AuthenticationFailed | PassReason::Malformed(_) => {
                        report.failed += 1
                    }
                },
            }
        }
        report
    }
}

/// Decide the outcome for a single field value.
///
/// Never fails: every envelope problem becomes a `PassThrough`.
pub fn decrypt_field(value: &Value, own_public_key: &str, secret: &SecretKey) -> FieldOutcome {
    let Some(object) = value.as_object() else {
        return FieldOutcome::pass(value, PassReason::NotEncrypted);
    };
    if !EncryptedField::has_envelope_shape(object) {
        return FieldOutcome::pass(value, PassReason::NotEncrypted);
    }
    if object.get("visibleTo").and_then(Value::as_str) != Some(own_public_key) {
        return FieldOutcome::pass(value, PassReason::AddressedElsewhere);
    }

    match EncryptedField::from_value(value).and_then(|envelope| field::open(secret, &envelope)) {
        Ok(plaintext) => FieldOutcome::Decrypted(plaintext),
        Err(ProfileCryptError::AuthenticationFailed) => {
            FieldOutcome::pass(value, PassReason::AuthenticationFailed)
        }
        Err(e) => FieldOutcome::pass(value, PassReason::Malformed(e.to_string())),
    }
}

/// Walk `document` and report the outcome of every field, in order.
///
/// A malformed own private key is a caller error and is returned before
/// any field is visited.  It is the only error this function returns;
/// per-field failures become `PassThrough` outcomes.
pub fn walk(
    document: &Document,
    own_public_key: &str,
    own_private_key: &str,
) -> Result<Vec<(String, FieldOutcome)>> {
    let private = Zeroizing::new(codec::decode_key(own_private_key, "private key")?);
    let secret = SecretKey::from(*private);

    let outcomes = document
        .iter()
        .map(|(name, value)| {
            let outcome = decrypt_field(value, own_public_key, &secret);
            match &outcome {
                FieldOutcome::Decrypted(_) => tracing::debug!(field = %name, "decrypted"),
                FieldOutcome::PassThrough { reason, .. } => {
                    tracing::debug!(field = %name, ?reason, "passed through")
                }
            }
            (name.clone(), outcome)
        })
        .collect();

    Ok(outcomes)
}

/// Return a copy of `document` with every field addressed to
/// `own_public_key` decrypted.  All other fields are copied unchanged and
/// field order is preserved.
///
/// Fails only with `Decode` when `own_private_key` is not a 32-byte
/// base64 key.
pub fn selectively_decrypt(
    document: &Document,
    own_public_key: &str,
    own_private_key: &str,
) -> Result<Document> {
    let outcomes = walk(document, own_public_key, own_private_key)?;
    Ok(outcomes
        .into_iter()
        .map(|(name, outcome)| (name, outcome.into_value()))
        .collect())
}

//! Profile documents and the edits the owner makes to them.
//!
//! A profile is a JSON object whose top-level field order is preserved.
//! The owner's own key pair may live in the profile under `publicKey` /
//! `privateKey` while it is being edited locally; `strip_private_key`
//! removes the private half before the document is published.

use serde_json::{Map, Value};

use crate::crypto::field;
use crate::crypto::KeyPair;
use crate::errors::{ProfileCryptError, Result};

/// An ordered mapping of field name to JSON value.
pub type Document = Map<String, Value>;

/// Profile field holding the owner's public key.
pub const PUBLIC_KEY_FIELD: &str = "publicKey";

/// Profile field holding the owner's private key (local copies only).
pub const PRIVATE_KEY_FIELD: &str = "privateKey";

/// Parse profile text.  The top level must be a JSON object.
pub fn parse_document(text: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ProfileCryptError::InvalidDocument(format!("not valid JSON: {e}")))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ProfileCryptError::InvalidDocument(format!(
            "expected a JSON object at the top level, found {}",
            json_kind(&other)
        ))),
    }
}

/// Render a document as pretty JSON with a two-space indent.
pub fn render_document(document: &Document) -> Result<String> {
    serde_json::to_string_pretty(document)
        .map_err(|e| ProfileCryptError::SerializationError(format!("document: {e}")))
}

/// Read the owner's key pair from the profile's `publicKey` and
/// `privateKey` fields.
pub fn own_keys(document: &Document) -> Result<KeyPair> {
    let public = document.get(PUBLIC_KEY_FIELD).and_then(Value::as_str);
    let private = document.get(PRIVATE_KEY_FIELD).and_then(Value::as_str);
    match (public, private) {
        (Some(public), Some(private)) => KeyPair::from_base64(public, private),
        _ => Err(ProfileCryptError::MissingKeys),
    }
}

/// Merge a key pair into the profile, replacing any existing keys.
pub fn attach_keys(document: &mut Document, keys: &KeyPair) {
    document.insert(PUBLIC_KEY_FIELD.into(), Value::String(keys.public_base64()));
    document.insert(
        PRIVATE_KEY_FIELD.into(),
        Value::String(keys.private_base64().to_string()),
    );
}

/// Encrypt `plaintext` to `recipient_public_key` and store the envelope
/// under `field_name`, overwriting any previous value in place.
pub fn seal_field(
    document: &mut Document,
    field_name: &str,
    recipient_public_key: &str,
    plaintext: &str,
) -> Result<()> {
    if field_name.is_empty() {
        return Err(ProfileCryptError::InvalidDocument(
            "field name cannot be empty".into(),
        ));
    }
    let envelope = field::encrypt(recipient_public_key, plaintext)?;
    document.insert(field_name.to_string(), envelope.to_value()?);
    Ok(())
}

/// Return a copy of the document without the owner's private key.
pub fn strip_private_key(document: &Document) -> Document {
    document
        .iter()
        .filter(|(name, _)| name.as_str() != PRIVATE_KEY_FIELD)
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

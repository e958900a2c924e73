//! `profilecrypt decrypt`: open a single envelope with the own key pair.

use crate::cli::{keys_path, load_keys, read_input, Cli};
use crate::crypto::{field, EncryptedField};
use crate::errors::{ProfileCryptError, Result};

/// Execute the `decrypt` command.
pub fn execute(cli: &Cli, envelope_path: &str, keys: Option<&str>) -> Result<()> {
    let text = read_input(envelope_path)?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| ProfileCryptError::MalformedEnvelope(format!("not valid JSON: {e}")))?;
    let envelope = EncryptedField::from_value(&value)?;

    let keys = load_keys(&keys_path(cli, keys)?)?;
    let plaintext = field::decrypt(&keys.private_base64(), &envelope)?;
    println!("{plaintext}");

    Ok(())
}

//! `profilecrypt encrypt`: seal one value to a recipient and print the envelope.

use crate::cli::read_secret_value;
use crate::crypto::field;
use crate::errors::{ProfileCryptError, Result};

/// Execute the `encrypt` command.
pub fn execute(to: &str, value: Option<&str>) -> Result<()> {
    let plaintext = read_secret_value(value, "the field")?;
    let envelope = field::encrypt(to, &plaintext)?;

    let text = serde_json::to_string_pretty(&envelope)
        .map_err(|e| ProfileCryptError::SerializationError(format!("envelope: {e}")))?;
    println!("{text}");

    Ok(())
}

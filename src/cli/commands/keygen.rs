//! `profilecrypt keygen`: create a new encryption key pair.
//!
//! By default the pair is written to the configured keys file with
//! owner-only permissions.  `--print` writes it to stdout instead.

use std::fs;
use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{keys_path, Cli};
use crate::crypto::{generate_keypair, KeyPair};
use crate::errors::{ProfileCryptError, Result};

/// Execute the `keygen` command.
pub fn execute(cli: &Cli, output_path: Option<&str>, print: bool, hex: bool) -> Result<()> {
    let keys = generate_keypair()?;

    if print {
        println!("{}", render_keys(&keys, hex)?.as_str());
        return Ok(());
    }

    let path = keys_path(cli, output_path)?;
    write_key_file(&path, &keys)?;

    output::success(&format!("Key pair written to {}", path.display()));
    output::info(&format!("Public key: {}", keys.public_base64()));
    if hex {
        output::warning("Private key (hex) follows on stdout; do not share it.");
        println!("{}", keys.private_hex().as_str());
    }
    output::tip("Share the public key; others seal fields with `profilecrypt seal --to <key>`.");

    Ok(())
}

/// Interchange JSON, optionally with the hex private key added.
fn render_keys(keys: &KeyPair, hex: bool) -> Result<Zeroizing<String>> {
    let mut value = serde_json::to_value(keys)
        .map_err(|e| ProfileCryptError::SerializationError(format!("key pair: {e}")))?;
    if hex {
        if let Some(object) = value.as_object_mut() {
            object.insert(
                "privateKeyHex".into(),
                serde_json::Value::String(keys.private_hex().to_string()),
            );
        }
    }
    let text = serde_json::to_string_pretty(&value)
        .map_err(|e| ProfileCryptError::SerializationError(format!("key pair: {e}")))?;
    Ok(Zeroizing::new(text))
}

/// Write the key pair file, refusing to overwrite an existing one.
fn write_key_file(path: &Path, keys: &KeyPair) -> Result<()> {
    if path.exists() {
        return Err(ProfileCryptError::CommandFailed(format!(
            "key file already exists at {}",
            path.display()
        )));
    }

    // Ensure the parent directory exists.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                ProfileCryptError::CommandFailed(format!("cannot create key directory: {e}"))
            })?;
        }
    }

    let text = render_keys(keys, false)?;
    fs::write(path, text.as_bytes())
        .map_err(|e| ProfileCryptError::CommandFailed(format!("failed to write key file: {e}")))?;

    // On Unix, restrict permissions to owner-only read/write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, perms).map_err(|e| {
            ProfileCryptError::CommandFailed(format!("failed to set key file permissions: {e}"))
        })?;
    }

    Ok(())
}

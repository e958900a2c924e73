//! `profilecrypt seal`: encrypt a value into a field of a profile file.

use std::path::Path;

use crate::cli::output;
use crate::cli::{read_profile, read_secret_value, write_profile};
use crate::errors::Result;
use crate::profile;

/// Execute the `seal` command.
pub fn execute(profile_path: &str, field: &str, to: &str, value: Option<&str>) -> Result<()> {
    let mut document = read_profile(profile_path)?;
    let existed = document.contains_key(field);

    let plaintext = read_secret_value(value, field)?;
    profile::seal_field(&mut document, field, to, &plaintext)?;
    write_profile(Path::new(profile_path), &document)?;

    let verb = if existed { "replaced" } else { "added" };
    output::success(&format!("Encrypted field '{field}' {verb} in {profile_path}"));
    output::tip("Run `profilecrypt strip` before publishing the profile.");

    Ok(())
}

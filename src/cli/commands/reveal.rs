//! `profilecrypt reveal`: print a profile with the fields addressed to
//! the own key pair decrypted.
//!
//! Keys come from `--keys`, else from the profile's own `publicKey` /
//! `privateKey` fields, else from the configured keys file.

use std::path::Path;

use crate::cli::output;
use crate::cli::{keys_path, load_keys, read_profile, Cli};
use crate::crypto::KeyPair;
use crate::errors::{ProfileCryptError, Result};
use crate::profile::{self, Document, WalkReport};

/// Execute the `reveal` command.
pub fn execute(cli: &Cli, profile_path: &str, keys: Option<&str>, summary: bool) -> Result<()> {
    let document = read_profile(profile_path)?;
    let own = resolve_keys(cli, &document, keys)?;

    let outcomes = profile::walk(&document, &own.public_base64(), &own.private_base64())?;
    let report = WalkReport::from_outcomes(outcomes.iter().map(|(_, outcome)| outcome));

    if summary {
        output::print_outcomes_table(&outcomes);
        output::print_report(&report);
        return Ok(());
    }

    let revealed: Document = outcomes
        .into_iter()
        .map(|(name, outcome)| (name, outcome.into_value()))
        .collect();
    println!("{}", profile::render_document(&revealed)?);

    if report.failed > 0 {
        output::warning(&format!(
            "{} field(s) addressed to you could not be decrypted",
            report.failed
        ));
    }

    Ok(())
}

fn resolve_keys(cli: &Cli, document: &Document, explicit: Option<&str>) -> Result<KeyPair> {
    if let Some(path) = explicit {
        return load_keys(Path::new(path));
    }
    match profile::own_keys(document) {
        Ok(keys) => Ok(keys),
        Err(ProfileCryptError::MissingKeys) => load_keys(&keys_path(cli, None)?),
        Err(e) => Err(e),
    }
}

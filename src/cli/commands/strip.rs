//! `profilecrypt strip`: drop the private key from a profile before it
//! is published.

use std::path::Path;

use crate::cli::output;
use crate::cli::{read_profile, write_profile};
use crate::errors::Result;
use crate::profile::{self, document::PRIVATE_KEY_FIELD};

/// Execute the `strip` command.
pub fn execute(profile_path: &str, output_path: Option<&str>) -> Result<()> {
    let document = read_profile(profile_path)?;
    let had_private = document.contains_key(PRIVATE_KEY_FIELD);
    let public = profile::strip_private_key(&document);

    match output_path {
        Some(dest) => {
            write_profile(Path::new(dest), &public)?;
            output::success(&format!("Publishable profile written to {dest}"));
        }
        None => println!("{}", profile::render_document(&public)?),
    }

    if !had_private {
        output::info("Profile had no private key.");
    }

    Ok(())
}

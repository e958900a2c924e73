//! `profilecrypt derive`: PBKDF2 key derivation from a password.
//!
//! Parameters default to `.profilecrypt.toml` (SHA-256, 512 iterations,
//! 32 bytes) and can be overridden per call.

use crate::cli::output;
use crate::cli::{load_settings, read_password, Cli};
use crate::crypto::codec;
use crate::crypto::kdf::{KeyDerivation, Pbkdf2Params};
use crate::errors::Result;

/// Execute the `derive` command.
pub fn execute(
    cli: &Cli,
    salt: &str,
    hash: Option<&str>,
    iterations: Option<u32>,
    length: Option<usize>,
    base64: bool,
) -> Result<()> {
    let params = resolve_params(load_settings(cli)?.pbkdf2_params()?, hash, iterations, length)?;
    if params.iterations < 10_000 {
        output::warning(&format!(
            "{} iterations is weak for password hashing; pass --iterations to raise it.",
            params.iterations
        ));
    }

    let password = read_password()?;
    let key = KeyDerivation::new(params).derive(&password, salt)?;

    if base64 {
        println!("{}", codec::encode_base64(&key));
    } else {
        println!("{}", codec::bytes_to_hex(&key));
    }

    Ok(())
}

/// Apply command-line overrides on top of the configured params.
fn resolve_params(
    base: Pbkdf2Params,
    hash: Option<&str>,
    iterations: Option<u32>,
    length: Option<usize>,
) -> Result<Pbkdf2Params> {
    Ok(Pbkdf2Params {
        hash: match hash {
            Some(name) => name.parse()?,
            None => base.hash,
        },
        iterations: iterations.unwrap_or(base.iterations),
        key_length: length.unwrap_or(base.key_length),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::HashAlgorithm;
    use crate::errors::ProfileCryptError;

    #[test]
    fn overrides_replace_configured_values() {
        let params = resolve_params(Pbkdf2Params::default(), Some("sha-512"), Some(9), None).unwrap();
        assert_eq!(params.hash, HashAlgorithm::Sha512);
        assert_eq!(params.iterations, 9);
        assert_eq!(params.key_length, 32);
    }

    #[test]
    fn no_overrides_keeps_base() {
        let base = Pbkdf2Params::default();
        assert_eq!(resolve_params(base, None, None, None).unwrap(), base);
    }

    #[test]
    fn unknown_hash_override_fails() {
        assert!(matches!(
            resolve_params(Pbkdf2Params::default(), Some("SHA-1"), None, None),
            Err(ProfileCryptError::UnsupportedHashAlgorithm(_))
        ));
    }
}

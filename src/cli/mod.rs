//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::KeyPair;
use crate::errors::{ProfileCryptError, Result};
use crate::profile::{self, Document};

/// Environment variable read by `derive` before prompting.
pub const PASSWORD_ENV: &str = "PROFILECRYPT_PASSWORD";

/// profilecrypt CLI: field-level encryption for shared profiles.
#[derive(Parser)]
#[command(
    name = "profilecrypt",
    about = "Field-level encryption for publicly shared profile documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project directory holding .profilecrypt.toml (default: current directory)
    #[arg(long, global = true, env = "PROFILECRYPT_CONFIG_DIR")]
    pub config_dir: Option<String>,

    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate a new encryption key pair
    Keygen {
        /// Write the key pair to this file instead of the configured keys file
        #[arg(short, long)]
        output: Option<String>,

        /// Print the key pair to stdout instead of writing a file
        #[arg(long)]
        print: bool,

        /// Also show the private key as hex
        #[arg(long)]
        hex: bool,
    },

    /// Encrypt a value to a recipient and print the envelope
    Encrypt {
        /// Recipient public key (base64)
        #[arg(long)]
        to: String,
        /// Value to encrypt (omit to read stdin or prompt)
        value: Option<String>,
    },

    /// Decrypt a single envelope file and print the plaintext
    Decrypt {
        /// Path to a JSON envelope ("-" for stdin)
        envelope: String,
        /// Key pair file (default: configured keys file)
        #[arg(short, long)]
        keys: Option<String>,
    },

    /// Encrypt a value into a field of a profile file
    Seal {
        /// Profile JSON file to update
        profile: String,
        /// Field name to set
        field: String,
        /// Recipient public key (base64)
        #[arg(long)]
        to: String,
        /// Value to encrypt (omit to read stdin or prompt)
        value: Option<String>,
    },

    /// Show a profile with every field addressed to you decrypted
    Reveal {
        /// Profile JSON file ("-" for stdin)
        profile: String,
        /// Key pair file (default: the profile's own keys, then the configured keys file)
        #[arg(short, long)]
        keys: Option<String>,
        /// Print a per-field table instead of the document
        #[arg(long)]
        summary: bool,
    },

    /// Remove the private key from a profile before publishing
    Strip {
        /// Profile JSON file
        profile: String,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Derive key material from a password with PBKDF2
    Derive {
        /// Salt string
        salt: String,
        /// Hash function: SHA-256, SHA-384 or SHA-512 (default from config)
        #[arg(long)]
        hash: Option<String>,
        /// Iteration count (default from config)
        #[arg(long)]
        iterations: Option<u32>,
        /// Output length in bytes (default from config)
        #[arg(long)]
        length: Option<usize>,
        /// Print base64 instead of hex
        #[arg(long)]
        base64: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// The project directory: `--config-dir` or the current directory.
pub fn project_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(std::env::current_dir()?),
    }
}

/// Load `.profilecrypt.toml` from the project directory.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    Settings::load(&project_dir(cli)?)
}

/// Path of the key pair file: the explicit `--keys` value, or the one
/// configured in settings.
pub fn keys_path(cli: &Cli, explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(load_settings(cli)?.keys_path(&project_dir(cli)?)),
    }
}

/// Load and verify a key pair file.
pub fn load_keys(path: &Path) -> Result<KeyPair> {
    if !path.exists() {
        return Err(ProfileCryptError::CommandFailed(format!(
            "key file not found at {} (run `profilecrypt keygen` first)",
            path.display()
        )));
    }
    let text = Zeroizing::new(fs::read_to_string(path)?);
    let keys: KeyPair = serde_json::from_str(&text).map_err(|e| {
        ProfileCryptError::Decode(format!("key file {}: {e}", path.display()))
    })?;
    keys.verify()?;
    Ok(keys)
}

/// Read text from a file path, or from stdin when the path is `-`.
pub fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(|e| {
        ProfileCryptError::CommandFailed(format!("cannot read {path}: {e}"))
    })
}

/// Read and parse a profile document.
pub fn read_profile(path: &str) -> Result<Document> {
    profile::parse_document(&read_input(path)?)
}

/// Write a profile document back to disk as pretty JSON.
pub fn write_profile(path: &Path, document: &Document) -> Result<()> {
    let mut text = profile::render_document(document)?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

/// Get the plaintext to encrypt, trying in order:
/// 1. the value given on the command line
/// 2. piped stdin
/// 3. an interactive hidden prompt
pub fn read_secret_value(value: Option<&str>, label: &str) -> Result<Zeroizing<String>> {
    if let Some(v) = value {
        output::warning("Value provided on command line; it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        strip_line_ending(&mut buf);
        return Ok(buf);
    }

    let v = dialoguer::Password::new()
        .with_prompt(format!("Enter value for {label}"))
        .interact()
        .map_err(|e| ProfileCryptError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(v))
}

/// Drop a single trailing `\n` or `\r\n` left by `echo` or a heredoc.
/// Any other trailing whitespace is part of the value.
fn strip_line_ending(text: &mut String) {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
}

/// Get the password for `derive`: `PROFILECRYPT_PASSWORD` if set,
/// otherwise an interactive prompt.
pub fn read_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter password")
        .interact()
        .map_err(|e| ProfileCryptError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

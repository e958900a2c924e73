use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{HashAlgorithm, Pbkdf2Params, DEFAULT_ITERATIONS, DEFAULT_KEY_LEN};
use crate::errors::{ProfileCryptError, Result};

/// Project-level configuration, loaded from `.profilecrypt.toml`.
///
/// Every field has a default so profilecrypt works without any config
/// file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Where `keygen` writes and other commands read the own key pair,
    /// relative to the project directory.
    #[serde(default = "default_keys_file")]
    pub keys_file: String,

    /// PBKDF2 hash function name (default: SHA-256).
    #[serde(default = "default_pbkdf2_hash")]
    pub pbkdf2_hash: String,

    /// PBKDF2 iteration count (default: 512, raise it for real passwords).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// PBKDF2 output length in bytes (default: 32).
    #[serde(default = "default_pbkdf2_key_length")]
    pub pbkdf2_key_length: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_keys_file() -> String {
    ".profilecrypt/keys.json".to_string()
}

fn default_pbkdf2_hash() -> String {
    HashAlgorithm::default().name().to_string()
}

fn default_pbkdf2_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_pbkdf2_key_length() -> usize {
    DEFAULT_KEY_LEN
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            keys_file: default_keys_file(),
            pbkdf2_hash: default_pbkdf2_hash(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            pbkdf2_key_length: default_pbkdf2_key_length(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".profilecrypt.toml";

    /// Load settings from `<project_dir>/.profilecrypt.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            ProfileCryptError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Full path of the own key pair file.
    pub fn keys_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.keys_file)
    }

    /// Convert the PBKDF2 settings into crypto-layer params.
    ///
    /// Fails with `UnsupportedHashAlgorithm` for an unknown hash name.
    pub fn pbkdf2_params(&self) -> Result<Pbkdf2Params> {
        Ok(Pbkdf2Params {
            hash: self.pbkdf2_hash.parse()?,
            iterations: self.pbkdf2_iterations,
            key_length: self.pbkdf2_key_length,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_match_kdf_defaults() {
        let s = Settings::default();
        assert_eq!(s.keys_file, ".profilecrypt/keys.json");
        assert_eq!(s.pbkdf2_params().unwrap(), Pbkdf2Params::default());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.pbkdf2_iterations, 512);
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
keys_file = "secrets/me.json"
pbkdf2_hash = "SHA-512"
pbkdf2_iterations = 600000
pbkdf2_key_length = 64
"#;
        fs::write(tmp.path().join(".profilecrypt.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.keys_path(tmp.path()), tmp.path().join("secrets/me.json"));
        let params = settings.pbkdf2_params().unwrap();
        assert_eq!(params.hash, HashAlgorithm::Sha512);
        assert_eq!(params.iterations, 600_000);
        assert_eq!(params.key_length, 64);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".profilecrypt.toml"), "pbkdf2_iterations = 10000\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.pbkdf2_iterations, 10_000);
        assert_eq!(settings.pbkdf2_hash, "SHA-256");
        assert_eq!(settings.pbkdf2_key_length, 32);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".profilecrypt.toml"), "not valid {{toml").unwrap();

        assert!(matches!(
            Settings::load(tmp.path()),
            Err(ProfileCryptError::ConfigError(_))
        ));
    }

    #[test]
    fn unknown_hash_is_reported() {
        let s = Settings {
            pbkdf2_hash: "MD5".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            s.pbkdf2_params(),
            Err(ProfileCryptError::UnsupportedHashAlgorithm(_))
        ));
    }
}

use thiserror::Error;

/// All errors that can occur in profilecrypt.
#[derive(Debug, Error)]
pub enum ProfileCryptError {
    // --- Codec errors ---
    #[error("Decode error: {0}")]
    Decode(String),

    // --- Key errors ---
    #[error("Invalid recipient public key: {0}")]
    InvalidRecipientKey(String),

    #[error("Entropy source unavailable: {0}")]
    EntropySourceUnavailable(String),

    // --- Key derivation errors ---
    #[error("Invalid key derivation parameters: {0}")]
    InvalidParameters(String),

    #[error("Unsupported hash algorithm '{0}' (use SHA-256, SHA-384 or SHA-512)")]
    UnsupportedHashAlgorithm(String),

    // --- Envelope errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Authentication failed: envelope not addressed to this key or tampered with")]
    AuthenticationFailed,

    // --- Document errors ---
    #[error("Invalid profile document: {0}")]
    InvalidDocument(String),

    #[error("Profile has no own encryption keys (publicKey/privateKey)")]
    MissingKeys,

    // --- Collaborator errors ---
    #[error("Content '{0}' not found in store")]
    ContentNotFound(String),

    #[error("No profile registered for account '{0}'")]
    AccountNotFound(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for profilecrypt results.
pub type Result<T> = std::result::Result<T, ProfileCryptError>;

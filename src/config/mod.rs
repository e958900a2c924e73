//! Project configuration (`.profilecrypt.toml`).

pub mod settings;

pub use settings::Settings;

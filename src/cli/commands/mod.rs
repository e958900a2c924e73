//! One module per subcommand; each exposes an `execute` function.

pub mod completions;
pub mod decrypt;
pub mod derive;
pub mod encrypt;
pub mod keygen;
pub mod reveal;
pub mod seal;
pub mod strip;

use clap::Parser;
use profilecrypt::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Keygen {
            ref output,
            print,
            hex,
        } => profilecrypt::cli::commands::keygen::execute(&cli, output.as_deref(), print, hex),
        Commands::Encrypt { ref to, ref value } => {
            profilecrypt::cli::commands::encrypt::execute(to, value.as_deref())
        }
        Commands::Decrypt {
            ref envelope,
            ref keys,
        } => profilecrypt::cli::commands::decrypt::execute(&cli, envelope, keys.as_deref()),
        Commands::Seal {
            ref profile,
            ref field,
            ref to,
            ref value,
        } => profilecrypt::cli::commands::seal::execute(profile, field, to, value.as_deref()),
        Commands::Reveal {
            ref profile,
            ref keys,
            summary,
        } => profilecrypt::cli::commands::reveal::execute(&cli, profile, keys.as_deref(), summary),
        Commands::Strip {
            ref profile,
            ref output,
        } => profilecrypt::cli::commands::strip::execute(profile, output.as_deref()),
        Commands::Derive {
            ref salt,
            ref hash,
            iterations,
            length,
            base64,
        } => profilecrypt::cli::commands::derive::execute(
            &cli,
            salt,
            hash.as_deref(),
            iterations,
            length,
            base64,
        ),
        Commands::Completions { shell } => {
            profilecrypt::cli::commands::completions::execute(shell)
        }
    };

    if let Err(e) = result {
        profilecrypt::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Send tracing output to stderr.  `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "profilecrypt=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

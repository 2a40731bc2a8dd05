pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "algotric")]
#[command(about = "Hybrid AES-256-GCM + RSA-OAEP envelope encryption")]
pub struct Args {
    /// Path to the algotric state directory (defaults to ~/.algotric)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level (overrides the config file; RUST_LOG overrides both)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    #[command(subcommand)]
    pub command: crate::Command,
}

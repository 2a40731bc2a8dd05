// CLI modules
mod cli;
mod process;
mod state;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Demo, Init, Keygen, Open, Seal, Version};

command_enum! {
    (Demo, Demo),
    (Init, Init),
    (Keygen, Keygen),
    (Open, Open),
    (Seal, Seal),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = process::resolve_log_level(args.log_level, args.config_path.clone());
    let guard = process::init_logging(level);

    let ctx = cli::op::OpContext::new(args.config_path);

    match args.command.execute(&ctx).await {
        Ok(output) => {
            // ops that stream raw bytes to stdout render as empty
            let rendered = output.to_string();
            if !rendered.is_empty() {
                println!("{}", rendered);
            }
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            // exit skips destructors, flush the log writer first
            drop(guard);
            std::process::exit(1);
        }
    }
}

//! devflow CLI binary entry point.

use devflow::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("devflow={default_level}").into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run(args) => devflow::cli::run::handle_run(args).await,
        Commands::Preview(args) => devflow::cli::run::handle_preview(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", devflow::cli::errors::format_error_help(&e));
        std::process::exit(1);
    }
}

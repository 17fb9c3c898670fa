use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use frontline::cli::args::{Cli, Commands};
use frontline::cli::commands::{self, Context};
use frontline::config::Config;
use frontline::error::FrontlineError;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(config: &Config) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run() -> Result<(), FrontlineError> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(&config);

    let format = cli.output.unwrap_or(config.general.default_output);

    // Completions need no storage.
    if let Commands::Completions { shell, install } = &cli.command {
        println!("{}", commands::completions(shell, *install)?);
        return Ok(());
    }

    let ctx = Context::open(config)?;

    let output = match cli.command {
        Commands::Sync { command } => commands::sync(&ctx, command, format).await?,
        Commands::Cache { command } => commands::cache(&ctx, command, format)?,
        Commands::Session { command } => commands::session(&ctx, command, format)?,
        Commands::Reset { force } => commands::reset(&ctx, force, format)?,
        Commands::Completions { .. } => String::new(),
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tophits::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("tophits=debug,info")
    } else {
        EnvFilter::new("tophits=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Report(args) => {
            cli::report::run(args, cli.format)?;
        }
        cli::Commands::Merge(args) => {
            cli::merge::run(args, cli.format)?;
        }
    }

    Ok(())
}

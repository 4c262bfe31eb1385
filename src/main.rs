use clap::Parser;
use tracing_subscriber::EnvFilter;

use notes_browser::cli;
use notes_browser::web;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("notes_browser=debug,info")
    } else {
        EnvFilter::new("notes_browser=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let source = cli.catalog_source();

    match cli.command {
        cli::Commands::Browse(args) => {
            cli::browse::run(args, &source, cli.format, cli.verbose)?;
        }
        cli::Commands::Add(args) => {
            cli::edit::run_add(args, &source, cli.format)?;
        }
        cli::Commands::Remove(args) => {
            cli::edit::run_remove(args, &source, cli.format)?;
        }
        cli::Commands::Catalog(args) => {
            cli::catalog::run(args, &source, cli.format, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args, source)?;
        }
    }

    Ok(())
}

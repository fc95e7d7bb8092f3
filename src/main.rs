use clap::Parser;
use colored::{control::set_override, Colorize};
use is_terminal::IsTerminal;

use udb_api::cli::args::{Cli, Commands, CompletionsArgs};
use udb_api::cli::commands;
use udb_api::config::{Config, Paths};
use udb_api::error::UdbError;
use udb_api::logging::{init_logging, Verbosity};

#[tokio::main]
async fn main() {
    // Respect NO_COLOR environment variable (https://no-color.org/)
    // Also disable colors when stdout is not a terminal (for piping)
    if std::env::var("NO_COLOR").is_ok() || !std::io::stdout().is_terminal() {
        set_override(false);
    }

    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<(), UdbError> {
    let cli = Cli::parse();
    let format = cli.output;

    // Handle completions command early (no config needed)
    if let Commands::Completions(CompletionsArgs { shell }) = &cli.command {
        Cli::print_completions(*shell);
        return Ok(());
    }

    let paths = Paths::new()?;
    let mut config = Config::load_from(&paths)?;
    init_logging(
        config.logging.format,
        Verbosity::from_flags(cli.quiet, cli.verbose),
    );

    let output = match &cli.command {
        Commands::Serve(args) => commands::serve(&config, &paths, args).await?,
        Commands::Fetch => commands::fetch(&config, &paths, format).await?,
        Commands::Search(args) => commands::search(&config, &paths, args, format)?,
        Commands::Get(args) => commands::get(&config, &paths, args, format)?,
        Commands::Cache(args) => commands::cache(&config, &paths, args, format)?,
        Commands::Config(args) => commands::config(&mut config, &paths, args, format)?,
        Commands::Completions(_) => unreachable!(), // Handled above
    };

    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}

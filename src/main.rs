use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use breathe::cli::args::{Cli, Commands, TuiArgs};
use breathe::cli::commands;
use breathe::config::{Config, Paths};
use breathe::error::BreatheError;
use breathe::logging::{init_logging, LogTarget};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), BreatheError> {
    let cli = Cli::parse();
    let paths = Paths::new().unwrap_or_default();

    let tui = matches!(cli.command, None | Some(Commands::Tui(_)));
    if tui {
        init_logging(LogTarget::LogFile(&paths));
    } else {
        init_logging(LogTarget::Stderr);
    }

    let config = Config::load_from_path(&paths.config_file)?;
    config.general.color.apply();
    let format = cli.output.unwrap_or(config.general.default_output);
    let catalog = config.load_catalog(cli.techniques.as_deref(), &paths);

    let output = match cli.command {
        Some(Commands::List) => commands::list(&catalog?, format)?,
        Some(Commands::Show { id }) => commands::show(&catalog?, &id, format)?,
        Some(Commands::Duration { id, cycles }) => {
            commands::duration(&catalog?, &id, cycles, format)?
        }
        Some(Commands::Run(args)) => commands::run(catalog?, &config.session, args, format)?,
        Some(Commands::Completions { shell }) => commands::completions(shell)?,
        Some(Commands::Tui(args)) => run_tui(catalog, &config, &args)?,
        None => run_tui(catalog, &config, &TuiArgs::default())?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn run_tui(
    catalog: Result<breathe::Catalog, BreatheError>,
    config: &Config,
    args: &TuiArgs,
) -> Result<String, BreatheError> {
    // A broken technique file still opens the orb with the built-in set
    let (catalog, status) = match catalog {
        Ok(catalog) => (catalog, None),
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to built-in techniques");
            (breathe::Catalog::builtin()?, Some(e.to_string()))
        }
    };

    breathe::tui::run(
        catalog,
        &config.session,
        args.technique.as_deref(),
        args.mute,
        status,
    )?;
    Ok(String::new())
}

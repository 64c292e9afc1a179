mod commands;
mod logging;
mod progress;
mod prompt;
mod report;
mod settings;

use std::io;
use std::process;

use anyhow::Result;
use clap::Parser;
use commands::{Cli, Commands};
use dotenv::dotenv;
use missing_media_core::{
    library, Error, NoPromptChooser, PromptChooser, ReconciliationEngine, RunConfig,
};
use progress::CliReporter;
use prompt::{Prompt, Prompter};
use settings::Settings;
use tracing::error;

fn main() {
    dotenv().ok();

    let code = {
        let _guard = logging::init_logger();
        match run(Cli::parse()) {
            Ok(()) => 0,
            Err(err) => {
                error!("{:#}", err);
                err.downcast_ref::<Error>().map(Error::exit_code).unwrap_or(1)
            }
        }
    };

    process::exit(code);
}

fn run(args: Cli) -> Result<()> {
    let interactive = !args.options.no_prompt;
    let settings =
        Settings::load(&args.options).map_err(|e| Error::Configuration(e.to_string()))?;

    match args.command.unwrap_or(Commands::Check) {
        Commands::PrintConfig => {
            println!("Configuration:\n{}", settings);
        }
        Commands::Sections => {
            let config = resolve_config(settings, interactive)?;
            let index = library::open(&config.source)?;
            let engine = ReconciliationEngine::new(config);
            report::print_sections(&engine.list_sections(index.as_ref())?);
        }
        Commands::Check => {
            let config = resolve_config(settings, interactive)?;
            let index = library::open(&config.source)?;
            let engine = ReconciliationEngine::new(config);
            let reporter = CliReporter::new();

            let report = if interactive {
                let stdin = io::stdin();
                let mut chooser = PromptChooser::new(stdin.lock(), io::stdout());
                engine.run(index.as_ref(), &mut chooser, &reporter)?
            } else {
                engine.run(index.as_ref(), &mut NoPromptChooser, &reporter)?
            };

            report::print_report(&report);
        }
    }

    Ok(())
}

fn resolve_config(settings: Settings, interactive: bool) -> Result<RunConfig, Error> {
    if interactive {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        settings.into_run_config(Some(&mut prompter as &mut dyn Prompt))
    } else {
        settings.into_run_config(None)
    }
}

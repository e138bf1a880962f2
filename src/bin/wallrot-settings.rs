use clap::Parser;
use std::process::ExitCode;
use tracing::info;

use wallrot::commands::MaintenanceCommand;
use wallrot::config::Config;
use wallrot::settings::SettingsStore;

/// Maintenance tasks for the wallrot settings file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Task to run (rebuild)
    command: Option<String>,
}

fn main() -> ExitCode {
    wallrot::init_tracing();
    let args = Args::parse();

    let Some(command) = args.command else {
        return ExitCode::SUCCESS;
    };

    let command = match MaintenanceCommand::parse(&command) {
        Ok(command) => command,
        Err(err) => {
            println!("{err}");
            return ExitCode::SUCCESS;
        }
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wallrot-settings: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: MaintenanceCommand) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;

    match command {
        MaintenanceCommand::Rebuild => {
            let store = SettingsStore::new(cfg.settings_file);
            if store.ensure_exists()? {
                info!(path = %store.path().display(), "settings file created");
            }
        }
    }

    Ok(())
}

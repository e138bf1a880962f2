use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

use wallrot::apply::CommandPainter;
use wallrot::commands::{Invocation, Param};
use wallrot::config::{Config, expand_home};
use wallrot::selector::{Selector, SelectorOptions, StepWrap};
use wallrot::settings::SettingsStore;

/// Cycle the desktop wallpaper through a directory
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the wallpaper directory
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Only use wallpapers at the top level of the directory
    #[arg(long)]
    flat: bool,

    /// Neither read nor write the settings file
    #[arg(long)]
    no_settings: bool,

    /// How load-step wraps past either end of the list
    #[arg(long, value_enum)]
    wrap: Option<StepWrap>,

    /// get-state, get-index, get-path, load-inc, load-dec, load-name <name>,
    /// load-step [n], load-index <i>, load or reload
    command: Option<String>,

    /// Arguments for the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    params: Vec<String>,
}

fn main() -> ExitCode {
    wallrot::init_tracing();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wallrot: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    let params: Vec<Param> = args.params.iter().map(|p| Param::parse(p)).collect();
    let invocation = match Invocation::parse(&command, &params) {
        Ok(invocation) => invocation,
        Err(err) => {
            println!("{err}");
            return Ok(());
        }
    };

    // Load config
    let mut cfg = Config::load()?;

    // Flags only override when passed
    if let Some(path) = args.path {
        cfg.wallpaper_dir = expand_home(&path.to_string_lossy());
    }
    if args.flat {
        cfg.recursive = false;
    }
    if args.no_settings {
        cfg.use_settings = false;
    }
    if let Some(wrap) = args.wrap {
        cfg.wrap = wrap;
    }

    let painter =
        CommandPainter::from_command(&cfg.command).ok_or("no wallpaper command configured")?;
    let store = cfg
        .use_settings
        .then(|| SettingsStore::new(&cfg.settings_file));
    let options = SelectorOptions {
        recursive: cfg.recursive,
        wrap: cfg.wrap,
    };

    let mut selector = Selector::new(&cfg.wallpaper_dir, options, store, painter)?;
    if let Some(index) = selector.stale_index() {
        println!("Malformed settings file. Index {index} is out of bounds.");
    }

    match invocation.run(&mut selector) {
        Ok(Some(output)) => println!("{output}"),
        Ok(None) => {}
        Err(err) if err.is_recoverable() => println!("{err}"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

use anyhow::Result;
use clap::{CommandFactory, Parser};
use phonoshard::app::{
    run_alphabet_command, run_check_command, run_process_command, run_stats_command,
};
use phonoshard::cli::{Cli, Commands, ConfigAction};
use phonoshard::config::Config;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => {
            let config = load_config(cli.config.as_deref())?;
            run_process_command(config, args, cli.quiet, cli.verbose)?;
        }
        Commands::Stats {
            metadata,
            report,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_stats_command(&config, &metadata, report, json)?;
        }
        Commands::Alphabet { set, list } => {
            run_alphabet_command(set, list);
        }
        Commands::Check => {
            let config = load_config(cli.config.as_deref())?;
            if let Err(e) = run_check_command(&config) {
                eprintln!("\nError: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "phonoshard",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/phonoshard/config.toml)
/// 3. Built-in defaults
///
/// Environment variable overrides are applied on top in every case.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    };
    Ok(config.with_env_overrides())
}

/// Handle configuration commands.
fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    let config_path = custom_path
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);

    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default(&config_path)?.with_env_overrides();
            match config.get_value_by_path(&key) {
                Ok(value) => println!("{}", value),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::Dump => {
            print!("{}", Config::dump_template());
        }
    }
    Ok(())
}

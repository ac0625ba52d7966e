//! Config validation CLI tool
//!
//! Validates a journal-jackpot configuration file and reports any errors.

use jackpot_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: jackpot-validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a journal-jackpot configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match jackpot_config::load_config(&config_path) {
        Ok(settings) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", jackpot_config::CURRENT_CONFIG_VERSION);
            println!("  Data directory: {}", settings.storage.data_dir.display());

            let delays: Vec<String> = settings
                .reels
                .stop_delays
                .iter()
                .map(|d| format!("{}ms", d.as_millis()))
                .collect();
            println!("  Stop delays: {}", delays.join(", "));
            println!("  Tick interval: {}ms", settings.reels.tick_interval.as_millis());
            println!("  Settle duration: {}ms", settings.reels.settle_duration.as_millis());

            match &settings.words {
                Some(words) => {
                    for (reel, list) in words.iter().enumerate() {
                        println!("  Reel {} words: {}", reel + 1, list.len());
                    }
                }
                None => println!("  Words: built-in"),
            }

            if settings.dev.infinite_spins {
                let state = if settings.dev.infinite_spins_enabled() {
                    "enabled"
                } else {
                    "ignored in release builds"
                };
                println!("  Infinite spins: {}", state);
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                jackpot_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                jackpot_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                jackpot_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                jackpot_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        jackpot_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}

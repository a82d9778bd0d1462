//! Pinpad CLI - segmented PIN entry and verifier storage
//!
//! `pinpad enter` drives the digit-entry state machine from terminal
//! keystrokes and hands the completed PIN to the verifier store. The other
//! commands administer the stored verifier directly.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pinpad_store::{md5_hex, JsonFileStore, PinStorage};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zeroize::Zeroizing;

mod config;
mod host;

use config::CliConfig;
use host::TerminalHost;

#[derive(Parser)]
#[command(name = "pinpad")]
#[command(about = "Segmented PIN entry with a stored verifier", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/pinpad/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verifier store file, overriding the config
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether a PIN is stored
    Status,

    /// Store a new PIN
    Set {
        /// PIN to store (read from stdin if omitted)
        #[arg(long)]
        pin: Option<String>,
    },

    /// Check a PIN against the stored verifier
    Confirm {
        /// PIN to check (read from stdin if omitted)
        #[arg(long)]
        pin: Option<String>,
    },

    /// Remove the stored PIN
    Clear,

    /// Print the legacy verifier for a PIN
    Hash {
        /// PIN to hash
        pin: String,
    },

    /// Enter a PIN digit by digit; sets it if none is stored, confirms otherwise
    Enter {
        /// Number of digits
        #[arg(short = 'n', long)]
        digits: Option<usize>,
    },

    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let directive = if cli.verbose { "pinpad=debug" } else { "pinpad=info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive(
            directive
                .parse()
                .unwrap_or_else(|_| tracing::level_filters::LevelFilter::INFO.into()),
        ))
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Execute one command; `Ok(false)` means it ran but did not succeed
fn run(cli: Cli) -> Result<bool> {
    let mut config = CliConfig::load(cli.config.as_deref());
    if let Some(store) = cli.store {
        config.store.path = store;
    }

    match cli.command {
        Commands::Status => {
            let storage = open_storage(&config)?;
            if storage.has_pin() {
                println!("PIN is set ({:?})", storage.scheme());
            } else {
                println!("No PIN set");
            }
            Ok(true)
        }
        Commands::Set { pin } => {
            let pin = pin_or_stdin(pin)?;
            let mut storage = open_storage(&config)?;
            Ok(report(storage.set_pin(pin.as_str()), "PIN set", "PIN not set"))
        }
        Commands::Confirm { pin } => {
            let pin = pin_or_stdin(pin)?;
            let storage = open_storage(&config)?;
            Ok(report(
                storage.confirm_pin(pin.as_str()),
                "PIN confirmed",
                "PIN rejected",
            ))
        }
        Commands::Clear => {
            let mut storage = open_storage(&config)?;
            Ok(report(storage.clear_pin(), "PIN cleared", "PIN not cleared"))
        }
        Commands::Hash { pin } => {
            let pin = Zeroizing::new(pin);
            println!("{}", md5_hex(&pin));
            Ok(true)
        }
        Commands::Enter { digits } => {
            if let Some(digits) = digits {
                config.entry.max_length = digits;
            }
            enter(&config, io::stdin().lock(), io::stdout().lock())
        }
        Commands::Config { write } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if write {
                let path = config.save(cli.config.as_deref())?;
                println!("Saved to {}", path.display());
            }
            Ok(true)
        }
    }
}

/// Run an entry session; sets the PIN if none is stored, confirms otherwise
fn enter<R: BufRead, W: Write>(config: &CliConfig, input: R, out: W) -> Result<bool> {
    let mut storage = open_storage(config)?;
    let setting = !storage.has_pin();

    let mut host = TerminalHost::new(config.entry.clone(), out)?;
    let pin = match host.run(input)? {
        Some(pin) => pin,
        None => {
            println!("Entry cancelled");
            return Ok(false);
        }
    };

    if setting {
        Ok(report(storage.set_pin(pin.as_str()), "PIN set", "PIN not set"))
    } else {
        Ok(report(
            storage.confirm_pin(pin.as_str()),
            "PIN confirmed",
            "PIN rejected",
        ))
    }
}

fn open_storage(config: &CliConfig) -> Result<PinStorage<JsonFileStore>> {
    config
        .store
        .open()
        .with_context(|| format!("Failed to open store at {}", config.store.path.display()))
}

fn pin_or_stdin(pin: Option<String>) -> Result<Zeroizing<String>> {
    if let Some(pin) = pin {
        return Ok(Zeroizing::new(pin));
    }

    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read PIN from stdin")?;

    Ok(Zeroizing::new(line.trim().to_string()))
}

fn report(ok: bool, success: &str, failure: &str) -> bool {
    println!("{}", if ok { success } else { failure });
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    /// Run `args` against a throwaway config and the given store
    fn pinpad(dir: &Path, args: &[&str]) -> Result<bool> {
        let config = dir.join("config.json");
        let store = dir.join("pin.json");

        let mut argv = vec![
            "pinpad".to_string(),
            "--config".to_string(),
            config.display().to_string(),
            "--store".to_string(),
            store.display().to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));

        run(Cli::parse_from(argv))
    }

    fn store_config(dir: &Path) -> CliConfig {
        let mut config = CliConfig::default();
        config.store.path = dir.join("pin.json");
        config
    }

    #[test]
    fn test_set_confirm_clear() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path();

        assert!(pinpad(dir, &["status"]).unwrap());
        assert!(pinpad(dir, &["set", "--pin", "4821"]).unwrap());

        assert!(pinpad(dir, &["confirm", "--pin", "4821"]).unwrap());
        assert!(!pinpad(dir, &["confirm", "--pin", "4820"]).unwrap());
        assert!(!pinpad(dir, &["confirm", "--pin", "48210"]).unwrap());

        assert!(pinpad(dir, &["clear"]).unwrap());
        assert!(!pinpad(dir, &["confirm", "--pin", "4821"]).unwrap());
        assert!(pinpad(dir, &["status"]).unwrap());
    }

    #[test]
    fn test_set_empty_pin_fails() {
        let temp_dir = tempdir().unwrap();
        assert!(!pinpad(temp_dir.path(), &["set", "--pin", ""]).unwrap());
        assert!(!temp_dir.path().join("pin.json").exists());
    }

    #[test]
    fn test_confirm_without_pin_fails() {
        let temp_dir = tempdir().unwrap();
        assert!(!pinpad(temp_dir.path(), &["confirm", "--pin", "1234"]).unwrap());
    }

    #[test]
    fn test_hash_command() {
        let temp_dir = tempdir().unwrap();
        assert!(pinpad(temp_dir.path(), &["hash", "1234"]).unwrap());
    }

    #[test]
    fn test_config_write() {
        let temp_dir = tempdir().unwrap();
        assert!(pinpad(temp_dir.path(), &["config", "--write"]).unwrap());

        let saved = CliConfig::load(Some(&temp_dir.path().join("config.json")));
        assert_eq!(saved.store.path, temp_dir.path().join("pin.json"));
    }

    #[test]
    fn test_corrupt_store_can_be_cleared() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("pin.json"), "{ truncated").unwrap();

        assert!(pinpad(temp_dir.path(), &["clear"]).unwrap());
        assert!(pinpad(temp_dir.path(), &["set", "--pin", "4821"]).unwrap());
    }

    #[test]
    fn test_enter_sets_then_confirms() {
        let temp_dir = tempdir().unwrap();
        let config = store_config(temp_dir.path());

        let mut out = Vec::new();
        assert!(enter(&config, Cursor::new("48x21\n"), &mut out).unwrap());
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("[ • • • • ]"));
        assert!(!rendered.contains("4821"));

        let storage = open_storage(&config).unwrap();
        assert!(storage.confirm_pin("4821"));

        assert!(enter(&config, Cursor::new("4821\n"), io::sink()).unwrap());
        assert!(!enter(&config, Cursor::new("4820\n"), io::sink()).unwrap());
    }

    #[test]
    fn test_enter_cancelled_on_eof() {
        let temp_dir = tempdir().unwrap();
        let config = store_config(temp_dir.path());

        assert!(!enter(&config, Cursor::new("48"), io::sink()).unwrap());
        assert!(!open_storage(&config).unwrap().has_pin());
    }
}

// UA Stache - fetch secrets from stache entries
//
// This is the main entry point for the command-line tool.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use ua_stache::config::Config;
use ua_stache::{SecretFetcher, StacheEntry, StacheError};

/// UA Stache - fetch secrets from stache entries
#[derive(Parser, Debug)]
#[command(name = "ua-stache")]
#[command(version)]
#[command(about = "Fetch secrets from stache entries", long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch an entry's secret and print it as JSON
    Fetch {
        /// Path to the credentials file (default: from config, else stache.json)
        #[arg(short, long)]
        credentials: Option<PathBuf>,

        /// Slash-separated keys into the secret (e.g. db/password)
        #[arg(short, long)]
        path: Option<String>,

        /// Path to a ua-stache.yaml configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print string values without JSON quoting
        #[arg(long, default_value = "false")]
        raw: bool,
    },

    /// Check that a credentials file is usable
    Doctor {
        /// Path to the credentials file (default: from config, else stache.json)
        #[arg(short, long)]
        credentials: Option<PathBuf>,

        /// Path to a ua-stache.yaml configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::discover(config_path).context("Failed to load configuration")?;
    config
        .validate()
        .with_context(|| "Configuration validation failed")?;
    Ok(config)
}

fn credentials_path(explicit: Option<PathBuf>, config: &Config) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(&config.credentials))
}

fn render(value: &Value, raw: bool) -> Result<String> {
    match value {
        Value::String(s) if raw => Ok(s.clone()),
        _ => serde_json::to_string_pretty(value).context("Failed to render secret"),
    }
}

/// Text printed for a fetched secret; an absent result is an error.
fn output(secret: Option<Value>, cred_path: Option<&str>, raw: bool) -> Result<String> {
    match secret {
        Some(value) => render(&value, raw),
        None => anyhow::bail!("No value found at path '{}'", cred_path.unwrap_or_default()),
    }
}

fn run_fetch(
    credentials: Option<PathBuf>,
    cred_path: Option<String>,
    config_path: Option<PathBuf>,
    raw: bool,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let creds_path = credentials_path(credentials, &config);

    let entry = StacheEntry::from_file(&creds_path)
        .with_context(|| format!("Failed to load credentials from: {}", creds_path.display()))?;

    let fetcher = SecretFetcher::with_timeout(config.timeout())?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let secret = runtime
        .block_on(fetcher.fetch_entry(&entry, cred_path.as_deref()))
        .with_context(|| format!("Failed to fetch secret from: {}", entry.url()))?;

    println!("{}", output(secret, cred_path.as_deref(), raw)?);
    Ok(())
}

fn run_doctor(credentials: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    println!("🔍 UA Stache Doctor");

    let config = load_config(config_path.as_deref())?;
    let creds_path = credentials_path(credentials, &config);
    println!("Checking credentials file: {}\n", creds_path.display());

    print!("1. Checking if the credentials file exists... ");
    if !creds_path.exists() {
        println!("✗");
        println!("   ❌ File not found: {}", creds_path.display());
        println!("   💡 Create it with the entry's X-STACHE-READ-KEY and endpoint");
        anyhow::bail!("Doctor checks failed");
    }
    println!("✓");

    print!("2. Checking credentials file contents... ");
    let entry = match StacheEntry::from_file(&creds_path) {
        Ok(entry) => {
            println!("✓");
            entry
        }
        Err(e) => {
            println!("✗");
            println!("   ❌ {}", e);
            if matches!(e, StacheError::MissingField(_) | StacheError::InvalidField { .. }) {
                println!("   💡 Both X-STACHE-READ-KEY and endpoint must be strings");
            }
            anyhow::bail!("Doctor checks failed");
        }
    };

    print!("3. Checking endpoint format... ");
    if !entry.endpoint().starts_with('/') {
        println!("✗");
        println!("   ❌ Endpoint '{}' does not start with '/'", entry.endpoint());
        println!("   💡 The resulting URL would be: {}", entry.url());
        anyhow::bail!("Doctor checks failed");
    }
    println!("✓");

    println!("\n✅ All checks passed! Entry URL: {}", entry.url());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Fetch {
            credentials,
            path,
            config,
            raw,
        } => run_fetch(credentials, path, config, raw),
        Commands::Doctor {
            credentials,
            config,
        } => run_doctor(credentials, config),
    };

    if let Err(e) = result {
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }
}

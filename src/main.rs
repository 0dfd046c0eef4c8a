//! Top-Up WebApp Configuration Resolver - Main Entry Point
//!
//! Resolves a deployment variant together with environment and command-line
//! overrides into a validated JSON snapshot for the Telegram WebApp form.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use topup_webapp_config::config::{
    ConfigDraft, DEFAULT_VARIANT, ENV_PREFIX, OverrideMap, Variant, resolve,
};

/// Configuration resolver for the top-up Telegram WebApp.
#[derive(Parser, Debug)]
#[command(name = "topup_config")]
#[command(about = "Resolve and export the top-up WebApp form configuration")]
#[command(version)]
struct Args {
    /// Deployment variant to resolve (fiat-card, fiat-deferred, crypto-rate).
    #[arg(short, long, default_value = DEFAULT_VARIANT.as_str())]
    variant: String,

    /// Path to a custom draft JSON file, used instead of --variant.
    #[arg(short, long)]
    config: Option<String>,

    /// Path to the .env file for environment overrides.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Additional override as KEY=VALUE (repeatable).
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Write the resolved JSON snapshot to this file instead of stdout.
    #[arg(short, long)]
    output: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Generate an example draft file for the selected variant and exit.
    #[arg(long)]
    generate_example: bool,

    /// List the built-in variants and exit.
    #[arg(long)]
    list_variants: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    if args.list_variants {
        for variant in Variant::all() {
            println!("{variant}");
        }
        return Ok(());
    }

    if args.generate_example {
        return generate_example(&args.variant);
    }

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Collect overrides: environment first, --set pairs win on top
    let mut overrides = OverrideMap::from_env();
    for pair in &args.set {
        overrides
            .insert_pair(pair)
            .with_context(|| format!("Invalid --set override: {pair}"))?;
    }

    let (label, draft) = match &args.config {
        Some(path) => {
            let draft = ConfigDraft::load_from_file(path)
                .with_context(|| format!("Failed to load draft from {path}"))?;
            (path.clone(), draft)
        }
        None => {
            let variant: Variant = args
                .variant
                .parse()
                .context("Failed to select a deployment variant")?;
            (variant.to_string(), variant.draft())
        }
    };

    info!(
        "Resolving '{}' with {} override(s)",
        label,
        overrides.len()
    );

    let config = resolve(draft, &overrides).context("Configuration resolution failed")?;

    info!(
        "Configuration resolved (commission: {}%, amounts: {}..={})",
        config.commission.percent(),
        config.validation.min_amount,
        config.validation.max_amount
    );

    match &args.output {
        Some(path) => {
            config
                .write_json_to(path)
                .with_context(|| format!("Failed to write snapshot to {path}"))?;
            info!("Resolved configuration written to {}", path);
        }
        None => println!("{}", config.to_json_pretty()?),
    }

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Generates an example draft file for the selected variant.
fn generate_example(variant_name: &str) -> Result<()> {
    let variant: Variant = variant_name
        .parse()
        .context("Failed to select a deployment variant")?;

    let path = format!("{variant}.draft.json");
    variant.draft().save_to_file(&path)?;

    println!("✓ Example draft written to: {path}");
    println!("\nTo use this draft:");
    println!("1. Edit the values to match your deployment");
    println!("2. Set {ENV_PREFIX}* variables in .env for per-environment overrides");
    println!("3. Run: topup_config --config {path}");

    Ok(())
}

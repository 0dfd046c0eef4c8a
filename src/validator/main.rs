//! Standalone validator for top-up WebApp configuration.
//!
//! This tool resolves built-in variants or draft JSON files and reports
//! whether the result satisfies every configuration invariant.

use std::process::ExitCode;

use clap::Parser;

// Import from the main crate
use topup_webapp_config::config::{
    ConfigDraft, Configuration, DEFAULT_VARIANT, OverrideMap, RECOGNIZED_KEYS, Variant, resolve,
};

/// Top-up WebApp configuration validator.
#[derive(Parser, Debug)]
#[command(name = "validate_config")]
#[command(about = "Validates top-up WebApp configuration variants and draft files")]
#[command(version)]
struct Args {
    /// Built-in variant to validate (fiat-card, fiat-deferred, crypto-rate).
    #[arg(short, long, default_value = DEFAULT_VARIANT.as_str())]
    variant: String,

    /// Path to a draft JSON file to validate instead of a built-in variant.
    #[arg(short, long)]
    file: Option<String>,

    /// Validate all built-in variants.
    #[arg(short, long)]
    all: bool,

    /// Apply TOPUP_* environment overrides before validating.
    #[arg(short, long)]
    env: bool,

    /// Show the resolved snapshot fields.
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let overrides = if args.env {
        OverrideMap::from_env()
    } else {
        OverrideMap::new()
    };

    if !overrides.is_empty() {
        println!("Applying {} environment override(s)", overrides.len());
        for (key, _) in overrides.iter() {
            if !RECOGNIZED_KEYS.contains(&key) {
                println!("  ⚠ Warning: override key '{key}' is not recognized and will be ignored");
            }
        }
        println!();
    }

    if args.all {
        return validate_all(&overrides, args.verbose);
    }

    if let Some(path) = &args.file {
        return validate_file(path, &overrides, args.verbose);
    }

    if report(&args.variant, &overrides, args.verbose) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn validate_all(overrides: &OverrideMap, verbose: bool) -> ExitCode {
    let mut failures = 0;

    for variant in Variant::all() {
        if !report(variant.as_str(), overrides, verbose) {
            failures += 1;
        }
        println!();
    }

    let total = Variant::all().len();
    if failures == 0 {
        println!("✓ All {total} variants are valid!");
        ExitCode::SUCCESS
    } else {
        println!("✗ Validation failed: {failures} of {total} variants are invalid");
        ExitCode::FAILURE
    }
}

fn validate_file(path: &str, overrides: &OverrideMap, verbose: bool) -> ExitCode {
    println!("Validating: {path}");

    let draft = match ConfigDraft::load_from_file(path) {
        Ok(draft) => draft,
        Err(e) => {
            eprintln!("✗ Failed to load draft: {e}");
            return ExitCode::FAILURE;
        }
    };

    if check(draft, overrides, verbose) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn report(variant_name: &str, overrides: &OverrideMap, verbose: bool) -> bool {
    println!("Validating: {variant_name}");

    let variant: Variant = match variant_name.parse() {
        Ok(variant) => variant,
        Err(e) => {
            eprintln!("✗ {e}");
            return false;
        }
    };

    check(variant.draft(), overrides, verbose)
}

fn check(draft: ConfigDraft, overrides: &OverrideMap, verbose: bool) -> bool {
    match resolve(draft, overrides) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            if verbose {
                print_summary(&config);
            }
            true
        }
        Err(e) => {
            println!("✗ {e}");
            false
        }
    }
}

fn print_summary(config: &Configuration) {
    println!(
        "  Currency:    {}",
        config.currency.as_deref().unwrap_or("(rate-based)")
    );
    println!("  Commission:  {}%", config.commission.percent());

    if let Some(rate) = config.usdt_rate {
        println!("  USDT rate:   1 USDT = {rate}");
    }

    println!(
        "  Amounts:     {}..={}",
        config.validation.min_amount, config.validation.max_amount
    );

    match (
        config.validation.login_min_length,
        config.validation.login_max_length,
    ) {
        (None, None) => {}
        (min, max) => println!(
            "  Login:       {}..{} chars",
            min.map_or_else(String::new, |n| n.to_string()),
            max.map_or_else(String::new, |n| n.to_string())
        ),
    }

    println!(
        "  Details:     {}",
        if config.default_payment_details.is_some() {
            "shown up front"
        } else {
            "sent after confirmation"
        }
    );
}

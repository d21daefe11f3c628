use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use sagepatch_core::{patch_file, MatchMode, PatchConfig, PatchError, DEFAULT_CONFIG_FILE};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(author, version, about = "Patch a GPU-probing setup.py so it builds without a GPU", long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Patch ./setup.py with the default capabilities (8.0, 8.6, 8.9, 9.0)
    sagepatch

    # Show what would change without writing
    sagepatch path/to/setup.py --dry-run

    # Compile only for Ada and Hopper, exact spacing only
    sagepatch --capabilities 8.9,9.0 --strict

EXIT CODES:
    0  patched (or would patch, with --dry-run)
    1  I/O or configuration failure
    2  target file not found or not a regular file (e.g. a directory)
    3  no pattern matched; the target was left untouched

CONFIG:
    Reads ./sagepatch.toml when present. Use --ignore-config to skip it."#)]
struct Args {
    #[arg(default_value = sagepatch_core::DEFAULT_TARGET, help = "Build script to patch")]
    target: PathBuf,

    #[arg(long, help = "Report replacements without writing the file")]
    dry_run: bool,

    #[arg(long, help = "Match the exact literal patterns only")]
    strict: bool,

    #[arg(
        long,
        value_delimiter = ',',
        value_name = "LIST",
        help = "Comma-separated compute capabilities [default: 8.0,8.6,8.9,9.0]"
    )]
    capabilities: Option<Vec<String>>,

    #[arg(short, long, help = "Path to config file [default: ./sagepatch.toml]")]
    config: Option<PathBuf>,

    #[arg(long, help = "Use built-in defaults, ignore config file")]
    ignore_config: bool,
}

fn load_config(args: &Args) -> Result<PatchConfig, PatchError> {
    let mut config = if args.ignore_config {
        PatchConfig::default()
    } else if let Some(path) = &args.config {
        PatchConfig::load(path)?
    } else if Path::new(DEFAULT_CONFIG_FILE).is_file() {
        PatchConfig::load(Path::new(DEFAULT_CONFIG_FILE))?
    } else {
        PatchConfig::default()
    };

    if args.strict {
        config.match_mode = MatchMode::Strict;
    }
    if let Some(caps) = &args.capabilities {
        config.capabilities = caps.iter().map(|c| c.trim().to_string()).collect();
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), PatchError> {
    let config = load_config(args)?;
    let report = patch_file(&args.target, &config, args.dry_run)?;

    info!("\n--- Summary ---");
    for outcome in &report.outcomes {
        info!("{:<22}{}", format!("{}:", outcome.rule), outcome.count);
    }
    if report.written {
        info!("--- PATCH APPLIED SUCCESSFULLY ---");
    } else {
        info!("--- DRY RUN COMPLETE, NO FILES MODIFIED ---");
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format_timestamp(None)
        .format_target(false)
        .try_init()
        .context("failed to initialize logger")
}

fn main() -> Result<()> {
    init_logging()?;

    let args = Args::parse();
    info!("--- STARTING SAGEATTENTION PATCH ---");

    if let Err(e) = run(&args) {
        match &e {
            PatchError::NoMatch { .. } => error!("{}. Aborting. No files were modified.", e),
            _ => error!("{}", e),
        }
        process::exit(e.exit_code());
    }

    Ok(())
}

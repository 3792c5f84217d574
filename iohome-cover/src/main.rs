use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use iohome::{Config, Registry};

#[derive(Parser)]
struct Args {
    /// YAML file declaring io-homecontrol controllers and covers
    config: PathBuf,

    /// Print the resolved bindings as JSON
    #[arg(long)]
    json: bool,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.verbose {
        iohome::log::init_with_default("debug");
    } else {
        iohome::log::init();
    }

    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    let registry = Registry::from_config(&config).context("invalid io-homecontrol controllers")?;
    let manifest = registry
        .bind_covers(&config.cover)
        .context("invalid io-homecontrol covers")?;

    tracing::info!(
        controllers = manifest.controllers.len(),
        covers = manifest.covers.len(),
        "Configuration is valid"
    );

    if args.json {
        println!("{}", manifest.to_json()?);
    } else {
        manifest.dump_config();
    }

    Ok(())
}

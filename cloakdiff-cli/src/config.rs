use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cloakdiff_core::ViewerConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with default values
    Init(InitArgs),
    /// Print the effective configuration as TOML
    Show,
    /// Validate the configuration file
    Validate,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, config_path: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args, config_path),
        ConfigCommands::Show => run_show(config_path),
        ConfigCommands::Validate => run_validate(config_path),
        ConfigCommands::Path => run_path(config_path),
    }
}

fn run_init(args: InitArgs, config_path: &Path) -> Result<()> {
    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    ViewerConfig::default()
        .save_to(config_path)
        .context(format!("Failed to write config file: {:?}", config_path))?;

    println!("✅ Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Run: cloakdiff config validate");

    Ok(())
}

fn run_show(config_path: &Path) -> Result<()> {
    let config = ViewerConfig::load_from(config_path)?;
    let toml_str = config
        .to_toml()
        .context("Failed to serialize config to TOML")?;

    println!("{}", toml_str);

    Ok(())
}

fn run_validate(config_path: &Path) -> Result<()> {
    println!("🔍 Validating configuration...");

    if !config_path.exists() {
        println!("   ⚠ No config file at {:?}, defaults apply", config_path);
    }

    match ViewerConfig::load_from(config_path) {
        Ok(config) => {
            println!("   ✓ Config loaded successfully");
            println!(
                "   Split: {:.0}% default, {:.0}% minimum per pane",
                config.layout.default_ratio * 100.0,
                config.layout.min_pane_fraction * 100.0
            );
            if config.layout.persist {
                println!("   Layout store: {}", config.layout_store_path().display());
            }
            if let Some(dir) = &config.samples.dir {
                if dir.is_dir() {
                    println!("   ✓ Samples directory: {}", dir.display());
                } else {
                    println!("   ⚠ Samples directory not found: {}", dir.display());
                }
            }
        }
        Err(e) => {
            eprintln!("\n❌ Validation failed:\n{}", e);
            std::process::exit(1);
        }
    }

    println!("\n✅ Configuration valid!");

    Ok(())
}

fn run_path(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    Ok(())
}

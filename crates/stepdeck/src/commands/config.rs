use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use stepdeck::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();
    println!("  {:<18} {}", "defaults.output", config.output());
    println!(
        "  {:<18} {}",
        "defaults.start",
        config.start().unwrap_or("(empty location)")
    );
    println!("  {:<18} {}", "defaults.markers", config.markers());
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {key} = {value} ({})",
        "Saved".green(),
        path.display().to_string().dimmed()
    );
    Ok(())
}

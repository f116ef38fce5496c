use anyhow::Result;
use monthcal_core::config::MonthcalConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = MonthcalConfig::config_path()?;
    let config = MonthcalConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:   {}", config_path.display());
    println!(
        "  Events:   {}",
        config.storage().path_for(&config.storage_key).display()
    );

    println!();
    println!("{}", "Settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {}", line);
    }

    Ok(())
}

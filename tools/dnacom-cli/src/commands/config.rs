//! Show or persist the effective configuration.

use dnacom_common::config::AppConfig;

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    config.validate()?;
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        config.save()?;
        println!("\nConfig saved to: {}", AppConfig::default_path().display());
    }
    Ok(())
}

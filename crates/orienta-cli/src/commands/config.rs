use std::error::Error;

use clap::Subcommand;
use orienta_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the full configuration as TOML
    Show,
    /// Get a value by dot-separated key (e.g. quiz.auto_advance_delay_ms)
    Get { key: String },
    /// Set a value by dot-separated key and persist
    Set { key: String, value: String },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigAction::Show => {
            let cfg = Config::load_or_default();
            print!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigAction::Get { key } => {
            let cfg = Config::load_or_default();
            match cfg.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown config key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut cfg = Config::load()?;
            cfg.set(&key, &value)?;
            println!("{key} = {value}");
        }
    }
    Ok(())
}

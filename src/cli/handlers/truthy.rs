use crate::{core::truthiness, models::ConfigValue};
use anyhow::{Context, Result};
use colored::Colorize;

pub fn handle(raw_value: &str, as_json: bool) -> Result<()> {
    let value = if as_json {
        let json: serde_json::Value = serde_json::from_str(raw_value)
            .with_context(|| format!("'{}' is not valid JSON", raw_value))?;
        // JSON null is an absent value, which is simply false.
        if json.is_null() {
            None
        } else {
            Some(ConfigValue::try_from(&json)?)
        }
    } else {
        Some(ConfigValue::from(raw_value))
    };

    if truthiness::is_truthy(value.as_ref()) {
        println!("{}", "true".green());
    } else {
        println!("{}", "false".red());
    }
    Ok(())
}

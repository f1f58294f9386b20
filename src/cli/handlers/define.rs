use crate::core::marshaller;
use anyhow::{Context, Result};

pub fn handle(name: &str, raw_value: &str) -> Result<()> {
    let value: serde_json::Value = serde_json::from_str(raw_value)
        .with_context(|| format!("'{}' is not valid JSON", raw_value))?;
    let typed = marshaller::marshal_json(&value)?;
    println!("{}", typed.to_definition(name));
    Ok(())
}

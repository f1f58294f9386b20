use crate::core::interpolator::{self, SubstitutionContext};
use anyhow::{Context, Result};
use std::{env, path::PathBuf};

pub fn handle(
    template: &str,
    root: Option<PathBuf>,
    toolset: Option<String>,
    build_type: Option<String>,
) -> Result<()> {
    let root = match root {
        Some(root) => root,
        None => env::current_dir().context("Could not determine the current directory")?,
    };

    let mut context = SubstitutionContext::from_workspace(&root).with_process_env();
    if let Some(toolset) = toolset {
        context = context.with_toolset(toolset);
    }
    if let Some(build_type) = build_type {
        context = context.with_build_type(build_type);
    }

    println!("{}", interpolator::substitute(template, &context));
    Ok(())
}

use crate::core::paths;
use anyhow::Result;

pub fn handle(path: &str, no_fold_case: bool) -> Result<()> {
    println!("{}", paths::normalize_path(path, !no_fold_case));
    Ok(())
}

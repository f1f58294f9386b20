use crate::core::arg_parser;
use anyhow::{Result, anyhow};

/// Prints each token on its own line, quoted so it can be pasted into a shell.
pub fn handle(command: &str) -> Result<()> {
    for token in arg_parser::tokenize(command)? {
        let quoted = shlex::try_quote(&token)
            .map_err(|e| anyhow!("Token {:?} cannot be shell-quoted: {}", token, e))?;
        println!("{}", quoted);
    }
    Ok(())
}

//! Shell completion generation for bsonconv
//!
//! Generates completion scripts for bash, zsh, fish, PowerShell and elvish.
//! Fish additionally gets input-file completion narrowed to `.bson` and
//! `.json` files.

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::Write;

use crate::cli::CliArgs;
use crate::error::{ConfigError, Result};

const BIN_NAME: &str = "bsonconv";

/// Write the completion script for `shell_name` to `out`
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish, powershell, elvish)
/// * `out` - Destination, usually stdout
///
/// # Returns
/// * `Result<()>` - Success or error
pub fn generate_completion<W: Write>(shell_name: &str, out: &mut W) -> Result<()> {
    let shell = parse_shell(shell_name)?;
    let mut cmd = CliArgs::command();
    generate(shell, &mut cmd, BIN_NAME, out);

    if shell == Shell::Fish {
        write!(
            out,
            r#"
# Offer only BSON and JSON files as conversion input
complete -c {BIN_NAME} -n "__fish_seen_subcommand_from convert validate" -f -a "(__fish_complete_suffix .bson; __fish_complete_suffix .json)"
"#
        )?;
    }
    Ok(())
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "powershell" | "pwsh" => Ok(Shell::PowerShell),
        "elvish" => Ok(Shell::Elvish),
        _ => Err(ConfigError::InvalidValue {
            field: "shell".to_string(),
            value: format!("{shell_name} (supported: bash, zsh, fish, powershell, elvish)"),
        }
        .into()),
    }
}

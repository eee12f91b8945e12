use std::io::BufRead;

use anyhow::{bail, Result};
use clap::Subcommand;

use crate::ai::{env_var_for, CredentialManager, GEMINI_PROVIDER};

#[derive(Subcommand, Debug)]
pub enum KeyCommands {
    /// Store a key in the keychain. Reads stdin when no key is given.
    Set { api_key: Option<String> },

    /// Remove the stored key
    Clear,

    /// Show where the key would be loaded from
    Status,
}

pub(super) fn run(action: KeyCommands) -> Result<()> {
    match action {
        KeyCommands::Set { api_key } => {
            let key = match api_key {
                Some(key) => key,
                None => read_key_from_stdin()?,
            };
            CredentialManager::store_api_key(GEMINI_PROVIDER, key.trim())?;
            println!("Gemini API key stored in keychain");
        }
        KeyCommands::Clear => {
            CredentialManager::delete_api_key(GEMINI_PROVIDER)?;
            println!("Gemini API key removed from keychain");
        }
        KeyCommands::Status => match CredentialManager::key_source(GEMINI_PROVIDER) {
            Some(source) => println!("Gemini API key configured ({})", source.as_str()),
            None => println!(
                "No Gemini API key. Set {} or run `docsense key set`.",
                env_var_for(GEMINI_PROVIDER)
            ),
        },
    }
    Ok(())
}

fn read_key_from_stdin() -> Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let key = line.trim().to_string();
    if key.is_empty() {
        bail!("No API key given");
    }
    Ok(key)
}

//! Account command handlers.

use super::apply;
use anyhow::{bail, Context};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Subcommand;
use mapnote_history::Store;
use mapnote_model::Account;

/// Account subcommands.
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Add an account
    Add {
        /// Username, unique and case-sensitive
        username: String,
        /// Grant developer access
        #[arg(long)]
        developer: bool,
        /// Password hash, base64 encoded
        #[arg(long, value_name = "BASE64", default_value = "")]
        password_hash: String,
    },
}

/// Handle account commands.
pub fn handle_account(command: AccountCommands, store: &mut Store) -> anyhow::Result<()> {
    match command {
        AccountCommands::Add {
            username,
            developer,
            password_hash,
        } => {
            if store.current().account(&username).is_some() {
                bail!("Account already exists: {username}");
            }
            let hash = STANDARD
                .decode(&password_hash)
                .context("Password hash is not valid base64")?;

            let next = store
                .current()
                .with_account(Account::new(username.as_str(), hash, developer).shared());
            apply(store, next, "add account")?;
            println!("Account added: {username}");
        }
    }
    Ok(())
}

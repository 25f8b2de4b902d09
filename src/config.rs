use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::entry::{RequestAction, RequestEntry};

pub const DEFAULT_ACCOUNTS_FILE: &str = "./accounts.json";

#[derive(Parser, Debug)]
#[command(name = "webbank", about = "Balances, deposits, withdrawals and new accounts")]
pub struct Config {
    /// JSON file holding the account table
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_ACCOUNTS_FILE,
        env = "WEBBANK_ACCOUNTS"
    )]
    pub accounts: PathBuf,

    /// Create an empty accounts file if none exists
    #[arg(long, global = true)]
    pub init: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the type and balance of an account
    Balance { account: String },
    /// Add funds to an account
    Deposit { account: String, amount: String },
    /// Take funds out of an account
    Withdraw { account: String, amount: String },
    /// Open a new account
    Open {
        #[arg(long = "type", default_value = "Savings")]
        account_type: String,
        #[arg(long)]
        deposit: Option<String>,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Run every request in a CSV file (action, account, amount, type, name)
    Batch { file: PathBuf },
    /// List every account
    Report,
}

impl Command {
    /// The raw form fields for single-request commands.
    pub fn to_entry(&self) -> Option<RequestEntry> {
        let blank = |action| RequestEntry {
            action,
            account_number: None,
            amount: None,
            account_type: None,
            holder_name: None,
        };

        let entry = match self {
            Command::Balance { account } => RequestEntry {
                account_number: Some(account.clone()),
                ..blank(RequestAction::Balance)
            },
            Command::Deposit { account, amount } => RequestEntry {
                account_number: Some(account.clone()),
                amount: Some(amount.clone()),
                ..blank(RequestAction::Deposit)
            },
            Command::Withdraw { account, amount } => RequestEntry {
                account_number: Some(account.clone()),
                amount: Some(amount.clone()),
                ..blank(RequestAction::Withdraw)
            },
            Command::Open {
                account_type,
                deposit,
                name,
            } => RequestEntry {
                amount: deposit.clone(),
                account_type: Some(account_type.clone()),
                holder_name: Some(name.clone()),
                ..blank(RequestAction::Open)
            },
            Command::Batch { .. } | Command::Report => return None,
        };
        Some(entry)
    }
}

impl Config {
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}

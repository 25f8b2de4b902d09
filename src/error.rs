use std::io;
use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::AccountId;
use crate::request::ConversionError;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),
    #[error("Balance overflow: depositing {amount} into {account_id}")]
    BalanceOverflow {
        account_id: AccountId,
        amount: Decimal,
    },
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read accounts file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse accounts file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize accounts for {path}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write accounts file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum BankError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ConversionError),
}

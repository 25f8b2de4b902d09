use std::fmt;
use std::fmt::Display;
use std::io::Read;
use std::iter::Iterator;

use csv::{ReaderBuilder, Trim};
use log::{error, warn};
use rust_decimal::Decimal;

use crate::account::AccountId;
use crate::entry::{RequestAction, RequestEntry};
use crate::error::{BankError, LedgerError};
use crate::ledger::{AccountTable, Balance};
use crate::request::Request;
use crate::store::AccountStore;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Balance {
        account_id: AccountId,
        balance: Balance,
    },
    Deposited {
        account_id: AccountId,
        balance: Decimal,
    },
    Withdrew {
        account_id: AccountId,
        balance: Decimal,
    },
    Opened {
        account_id: AccountId,
    },
}

impl Outcome {
    #[inline]
    fn changes_table(&self) -> bool {
        !matches!(self, Outcome::Balance { .. })
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Balance {
                account_id,
                balance,
            } => write!(
                f,
                "Account {} ({}): balance {:.2}",
                account_id, balance.account_type, balance.balance
            ),
            Outcome::Deposited {
                account_id,
                balance,
            } => write!(f, "Deposit to {} complete, balance {:.2}", account_id, balance),
            Outcome::Withdrew {
                account_id,
                balance,
            } => write!(
                f,
                "Withdrawal from {} complete, balance {:.2}",
                account_id, balance
            ),
            Outcome::Opened { account_id } => write!(f, "Opened account {}", account_id),
        }
    }
}

/// What the caller shows the user: either the outcome or a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success(Outcome),
    Failure(String),
}

impl Response {
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Response::Success(outcome) => write!(f, "{}", outcome),
            Response::Failure(message) => write!(f, "{}", message),
        }
    }
}

pub struct Bank {
    store: AccountStore,
}

impl Bank {
    pub fn new(store: AccountStore) -> Self {
        Bank { store }
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// Runs one request as a full load, apply, save cycle. Balance lookups
    /// leave the file untouched.
    pub fn execute(&self, request: Request) -> Result<Outcome, BankError> {
        let mut table = self.store.load()?;
        let outcome = apply_request(&mut table, request)?;

        if outcome.changes_table() {
            self.store.save(&table)?;
        }
        Ok(outcome)
    }

    /// Converts and runs a raw request. Never fails: every error becomes a
    /// message for the user.
    pub fn respond(&self, entry: RequestEntry) -> Response {
        let action = entry.action;
        let result = Request::try_from(entry).and_then(|request| self.execute(request));

        match result {
            Ok(outcome) => Response::Success(outcome),
            Err(e) => {
                match &e {
                    BankError::Storage(_) => error!("Error processing {:?} request: {}", action, e),
                    _ => warn!("Rejected {:?} request: {}", action, e),
                }
                Response::Failure(user_message(action, &e))
            }
        }
    }
}

#[inline]
pub fn apply_request(table: &mut AccountTable, request: Request) -> Result<Outcome, LedgerError> {
    let outcome = match request {
        Request::Balance { account_id } => {
            let balance = table.get_balance(&account_id)?;
            Outcome::Balance {
                account_id,
                balance,
            }
        }
        Request::Deposit { account_id, amount } => {
            table.deposit(&account_id, amount)?;
            let balance = table.get_balance(&account_id)?.balance;
            Outcome::Deposited {
                account_id,
                balance,
            }
        }
        Request::Withdraw { account_id, amount } => {
            table.withdraw(&account_id, amount)?;
            let balance = table.get_balance(&account_id)?.balance;
            Outcome::Withdrew {
                account_id,
                balance,
            }
        }
        Request::Open {
            account_type,
            initial_deposit,
            holder_name,
        } => {
            let account_id = table.open_account(&account_type, initial_deposit, &holder_name);
            Outcome::Opened { account_id }
        }
    };
    Ok(outcome)
}

pub fn user_message(action: RequestAction, error: &BankError) -> String {
    let message = match error {
        BankError::Ledger(LedgerError::AccountNotFound(_)) => "Account not found.",
        BankError::Ledger(LedgerError::InvalidAmount(_)) => match action {
            RequestAction::Withdraw => "Invalid withdrawal amount.",
            _ => "Invalid deposit amount.",
        },
        BankError::Ledger(LedgerError::BalanceOverflow { .. }) => {
            "Deposit amount is too large for this account."
        }
        BankError::Ledger(LedgerError::InsufficientFunds { .. }) => {
            "Insufficient funds. Please enter a lower amount."
        }
        BankError::InvalidRequest(e) => return format!("{}.", e),
        BankError::Storage(_) => "Something went wrong. Please try again later.",
    };
    message.to_string()
}

/// Replays a CSV batch of requests (`action, account, amount, type, name`),
/// each row as its own load, apply, save cycle. Rows that fail to parse are
/// logged and skipped.
#[inline]
pub fn process_csv_stream(bank: &Bank, reader: impl Read) -> Vec<Response> {
    let mut binding = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let stream = binding
        .deserialize()
        .inspect(|result: &Result<RequestEntry, csv::Error>| {
            if let Err(e) = result {
                warn!("Error parsing request: {}", e);
            }
        })
        .filter_map(Result::ok);

    process_stream(bank, stream)
}

#[inline]
pub fn process_stream(bank: &Bank, stream: impl Iterator<Item = RequestEntry>) -> Vec<Response> {
    stream.map(|entry| bank.respond(entry)).collect()
}

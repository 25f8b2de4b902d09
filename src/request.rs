use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::AccountId;
use crate::entry::{RequestAction, RequestEntry};
use crate::error::{BankError, LedgerError};

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Balance {
        account_id: AccountId,
    },
    Deposit {
        account_id: AccountId,
        amount: Decimal,
    },
    Withdraw {
        account_id: AccountId,
        amount: Decimal,
    },
    Open {
        account_type: String,
        initial_deposit: Decimal,
        holder_name: String,
    },
}

impl Request {
    pub fn action(&self) -> RequestAction {
        match self {
            Request::Balance { .. } => RequestAction::Balance,
            Request::Deposit { .. } => RequestAction::Deposit,
            Request::Withdraw { .. } => RequestAction::Withdraw,
            Request::Open { .. } => RequestAction::Open,
        }
    }
}

impl TryFrom<RequestEntry> for Request {
    type Error = BankError;

    fn try_from(value: RequestEntry) -> Result<Self, Self::Error> {
        let request = match value.action {
            RequestAction::Balance => Request::Balance {
                account_id: required_account(value.account_number)?,
            },
            RequestAction::Deposit => Request::Deposit {
                account_id: required_account(value.account_number)?,
                amount: parse_amount(&value.amount.ok_or(ConversionError::MissingAmount)?)?,
            },
            RequestAction::Withdraw => Request::Withdraw {
                account_id: required_account(value.account_number)?,
                amount: parse_amount(&value.amount.ok_or(ConversionError::MissingAmount)?)?,
            },
            RequestAction::Open => Request::Open {
                account_type: value.account_type.unwrap_or_default(),
                initial_deposit: parse_initial_deposit(value.amount.as_deref()),
                holder_name: value.holder_name.unwrap_or_default(),
            },
        };
        Ok(request)
    }
}

#[inline]
fn required_account(account_number: Option<String>) -> Result<AccountId, ConversionError> {
    account_number
        .map(|number| number.trim().to_string())
        .filter(|number| !number.is_empty())
        .ok_or(ConversionError::MissingAccount)
}

/// Parses a user-supplied amount. Only positive decimals are accepted, in
/// plain (`12.50`) or scientific (`1.25e1`) notation.
pub fn parse_amount(input: &str) -> Result<Decimal, LedgerError> {
    let trimmed = input.trim();
    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| LedgerError::InvalidAmount(input.to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(input.to_string()));
    }
    Ok(amount)
}

/// Opening deposits never fail: anything missing, unparseable or negative
/// becomes zero.
pub fn parse_initial_deposit(input: Option<&str>) -> Decimal {
    input
        .and_then(|value| parse_amount(value).ok())
        .unwrap_or(Decimal::ZERO)
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Missing account number")]
    MissingAccount,
    #[error("Missing amount")]
    MissingAmount,
}

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Display;

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::{Account, AccountId};
use crate::error::LedgerError;

pub type Accounts = BTreeMap<AccountId, Account>;

/// Width of generated account identifiers, e.g. `0000042`.
pub const ACCOUNT_ID_WIDTH: usize = 7;

/// The whole persisted document: every account keyed by its identifier plus
/// the reserved `lastID` key holding the most recently issued identifier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccountTable {
    #[serde(rename = "lastID", default)]
    pub last_id: AccountId,
    #[serde(flatten)]
    pub accounts: Accounts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub account_type: String,
    pub balance: Decimal,
}

impl AccountTable {
    pub fn new() -> Self {
        AccountTable {
            last_id: format!("{:0width$}", 0, width = ACCOUNT_ID_WIDTH),
            accounts: Accounts::new(),
        }
    }

    #[inline]
    fn get_account_mut(&mut self, account_id: &str) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(account_id)
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()))
    }

    #[inline]
    fn check_amount(amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount.to_string()));
        }
        Ok(())
    }

    pub fn get_balance(&self, account_id: &str) -> Result<Balance, LedgerError> {
        let account = self
            .accounts
            .get(account_id)
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()))?;

        Ok(Balance {
            account_type: account.account_type.clone(),
            balance: account.account_balance,
        })
    }

    pub fn deposit(&mut self, account_id: &str, amount: Decimal) -> Result<(), LedgerError> {
        let account = self.get_account_mut(account_id)?;
        Self::check_amount(amount)?;

        account.account_balance = account.account_balance.checked_add(amount).ok_or_else(|| {
            LedgerError::BalanceOverflow {
                account_id: account_id.to_string(),
                amount,
            }
        })?;
        debug!(
            "Deposited {} to {}, balance {}",
            amount, account_id, account.account_balance
        );
        Ok(())
    }

    pub fn withdraw(&mut self, account_id: &str, amount: Decimal) -> Result<(), LedgerError> {
        let account = self.get_account_mut(account_id)?;
        Self::check_amount(amount)?;

        if amount > account.account_balance {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: account.account_balance,
            });
        }

        account.account_balance -= amount;
        debug!(
            "Withdrew {} from {}, balance {}",
            amount, account_id, account.account_balance
        );
        Ok(())
    }

    /// Opens a new account and returns its identifier. A negative initial
    /// deposit is clamped to zero.
    pub fn open_account(
        &mut self,
        account_type: &str,
        initial_deposit: Decimal,
        holder_name: &str,
    ) -> AccountId {
        let account_id = self.next_account_id();
        let balance = initial_deposit.max(Decimal::ZERO);

        self.accounts.insert(
            account_id.clone(),
            Account::new(account_type, balance, holder_name),
        );
        self.last_id = account_id.clone();

        debug!("Opened account {} with balance {}", account_id, balance);
        account_id
    }

    /// Increments `lastID`, falling back to the highest numeric key when
    /// `lastID` is missing or not a number. Identifiers already present in
    /// the table are skipped.
    fn next_account_id(&self) -> AccountId {
        let mut next = match self.last_id.trim().parse::<u64>() {
            Ok(last) => last.saturating_add(1),
            Err(_) => self
                .accounts
                .keys()
                .filter_map(|id| id.parse::<u64>().ok())
                .max()
                .map_or(1, |max| max.saturating_add(1)),
        };

        loop {
            let account_id = format!("{:0width$}", next, width = ACCOUNT_ID_WIDTH);
            if !self.accounts.contains_key(&account_id) {
                return account_id;
            }
            next = next.saturating_add(1);
        }
    }
}

impl Display for AccountTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "account, type, balance, holder")?;

        for (account_id, account) in &self.accounts {
            writeln!(
                f,
                "{}, {}, {:.2}, {}",
                account_id,
                account.account_type,
                account.account_balance,
                account.account_holder_name
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn alice_table() -> AccountTable {
        let mut table = AccountTable::new();
        table.accounts.insert(
            "0000001".to_string(),
            Account::new("Savings", dec!(100), "Alice"),
        );
        table.last_id = "0000001".to_string();
        table
    }

    fn balance_of(table: &AccountTable, account_id: &str) -> Decimal {
        table.get_balance(account_id).unwrap().balance
    }

    #[test]
    fn test_alice_and_bob_scenario() {
        let mut table = alice_table();

        table.deposit("0000001", dec!(50)).unwrap();
        assert_eq!(balance_of(&table, "0000001"), dec!(150));

        let result = table.withdraw("0000001", dec!(200));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert_eq!(balance_of(&table, "0000001"), dec!(150));

        let bob = table.open_account("Checking", dec!(25), "Bob");
        assert_eq!(bob, "0000002");
        assert_eq!(table.last_id, "0000002");

        let account = table.accounts.get(&bob).unwrap();
        assert_eq!(account.account_type, "Checking");
        assert_eq!(account.account_balance, dec!(25));
        assert_eq!(account.account_holder_name, "Bob");
    }

    #[test]
    fn test_deposit_then_withdraw_restores_balance() {
        let mut table = alice_table();

        for amount in [dec!(0.01), dec!(1), dec!(99.99), dec!(12345.6789)] {
            table.deposit("0000001", amount).unwrap();
            table.withdraw("0000001", amount).unwrap();
            assert_eq!(balance_of(&table, "0000001"), dec!(100));
        }
    }

    #[test]
    fn test_non_positive_amounts_are_rejected() {
        let mut table = alice_table();

        for amount in [dec!(0), dec!(-1), dec!(-0.01)] {
            assert!(matches!(
                table.deposit("0000001", amount),
                Err(LedgerError::InvalidAmount(_))
            ));
            assert!(matches!(
                table.withdraw("0000001", amount),
                Err(LedgerError::InvalidAmount(_))
            ));
        }
        assert_eq!(balance_of(&table, "0000001"), dec!(100));
    }

    #[test]
    fn test_unknown_account() {
        let mut table = alice_table();

        assert!(matches!(
            table.get_balance("9999999"),
            Err(LedgerError::AccountNotFound(id)) if id == "9999999"
        ));
        assert!(matches!(
            table.deposit("9999999", dec!(1)),
            Err(LedgerError::AccountNotFound(_))
        ));
        assert!(matches!(
            table.withdraw("9999999", dec!(1)),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_reserved_key_is_not_an_account() {
        let table = alice_table();
        assert!(matches!(
            table.get_balance("lastID"),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_deposit_overflow_is_rejected() {
        let mut table = alice_table();
        let near_max = Decimal::MAX - dec!(100);

        table.deposit("0000001", near_max).unwrap();
        assert_eq!(balance_of(&table, "0000001"), Decimal::MAX);

        let result = table.deposit("0000001", near_max);
        assert!(matches!(
            result,
            Err(LedgerError::BalanceOverflow { ref account_id, .. }) if account_id == "0000001"
        ));
        assert_eq!(balance_of(&table, "0000001"), Decimal::MAX);
    }

    #[test]
    fn test_withdraw_exact_balance() {
        let mut table = alice_table();

        table.withdraw("0000001", dec!(100)).unwrap();
        assert_eq!(balance_of(&table, "0000001"), dec!(0));
    }

    #[test]
    fn test_get_balance_reports_type() {
        let table = alice_table();
        let balance = table.get_balance("0000001").unwrap();

        assert_eq!(balance.account_type, "Savings");
        assert_eq!(balance.balance, dec!(100));
    }

    #[test]
    fn test_open_account_on_empty_table() {
        let mut table = AccountTable::new();

        let first = table.open_account("Savings", dec!(0), "");
        let second = table.open_account("Savings", dec!(0), "");

        assert_eq!(first, "0000001");
        assert_eq!(second, "0000002");
        assert_eq!(table.accounts.len(), 2);
    }

    #[test]
    fn test_open_account_skips_existing_identifier() {
        let mut table = alice_table();
        table.accounts.insert(
            "0000002".to_string(),
            Account::new("Checking", dec!(5), "Carol"),
        );

        let account_id = table.open_account("Savings", dec!(10), "Dave");

        assert_eq!(account_id, "0000003");
        assert_eq!(
            table.accounts.get("0000002").unwrap().account_holder_name,
            "Carol"
        );
    }

    #[test]
    fn test_open_account_with_non_numeric_last_id() {
        let mut table = alice_table();
        table.accounts.insert(
            "0000040".to_string(),
            Account::new("Checking", dec!(5), "Carol"),
        );
        table.last_id = "aZ3kQ9x".to_string();

        let account_id = table.open_account("Savings", dec!(10), "Dave");

        assert_eq!(account_id, "0000041");
        assert_eq!(table.last_id, "0000041");
    }

    #[test]
    fn test_open_account_clamps_negative_deposit() {
        let mut table = alice_table();

        let account_id = table.open_account("", dec!(-5), "Eve");
        let account = table.accounts.get(&account_id).unwrap();

        assert_eq!(account.account_balance, Decimal::ZERO);
        assert_eq!(account.account_type, "Savings");
    }

    #[test]
    fn test_table_json_layout() {
        let table = alice_table();
        let json = serde_json::to_value(&table).unwrap();

        assert_eq!(json["lastID"], "0000001");
        assert_eq!(json["0000001"]["accountHolderName"], "Alice");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_table_parses_original_document() {
        let document = r#"{
            "0000001": {
                "accountType": "Savings",
                "accountBalance": 100,
                "accountHolderName": "Alice"
            },
            "lastID": "0000001"
        }"#;

        let table: AccountTable = serde_json::from_str(document).unwrap();
        assert_eq!(table, alice_table());
    }

    #[test]
    fn test_table_display() {
        let mut table = alice_table();
        table.open_account("Checking", dec!(25.5), "Bob");

        let output = format!("{}", table);
        let lines: Vec<&str> = output.trim().split('\n').collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "account, type, balance, holder");
        assert_eq!(lines[1], "0000001, Savings, 100.00, Alice");
        assert_eq!(lines[2], "0000002, Checking, 25.50, Bob");
    }

    #[test]
    fn test_table_display_empty() {
        let table = AccountTable::new();
        let output = format!("{}", table);
        assert_eq!(output.trim(), "account, type, balance, holder");
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};

pub type AccountId = String;

pub const DEFAULT_ACCOUNT_TYPE: &str = "Savings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_type: String,
    #[serde(
        serialize_with = "rust_decimal::serde::arbitrary_precision::serialize",
        deserialize_with = "deserialize_balance"
    )]
    pub account_balance: Decimal,
    #[serde(default)]
    pub account_holder_name: String,
}

impl Account {
    pub fn new(account_type: &str, balance: Decimal, holder_name: &str) -> Self {
        let account_type = match account_type.trim() {
            "" => DEFAULT_ACCOUNT_TYPE,
            other => other,
        };

        Account {
            account_type: account_type.to_string(),
            account_balance: balance,
            account_holder_name: holder_name.to_string(),
        }
    }
}

/// Balances are written as exact JSON numbers; negative ones are refused.
fn deserialize_balance<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let balance = rust_decimal::serde::arbitrary_precision::deserialize(deserializer)?;
    if balance < Decimal::ZERO {
        return Err(de::Error::custom(format!(
            "negative account balance {}",
            balance
        )));
    }
    Ok(balance)
}

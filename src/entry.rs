use serde::Deserialize;

/// One banking request as it arrives from a form or a batch file: every
/// field is a raw string that still needs validating.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestEntry {
    pub action: RequestAction,
    #[serde(rename = "account", default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(rename = "name", default)]
    pub holder_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestAction {
    Balance,
    Deposit,
    #[serde(alias = "withdrawal")]
    Withdraw,
    Open,
}

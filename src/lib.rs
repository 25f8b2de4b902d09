pub mod account;
pub mod config;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod processor;
pub mod request;
pub mod store;

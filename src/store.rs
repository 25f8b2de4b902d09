use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::StorageError;
use crate::ledger::AccountTable;

/// Handle to the JSON file holding the whole account table. Every call reads
/// or rewrites the entire document; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AccountStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<AccountTable, StorageError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;

        let table: AccountTable =
            serde_json::from_str(&contents).map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })?;

        info!(
            "Loaded {} accounts from {}",
            table.accounts.len(),
            self.path.display()
        );
        Ok(table)
    }

    pub fn save(&self, table: &AccountTable) -> Result<(), StorageError> {
        let mut contents = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut contents, PrettyFormatter::with_indent(b"    "));
        table
            .serialize(&mut serializer)
            .map_err(|source| StorageError::Serialize {
                path: self.path.clone(),
                source,
            })?;

        fs::write(&self.path, contents).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!(
            "Saved {} accounts to {}",
            table.accounts.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Writes an empty table unless the file already exists. Returns whether
    /// a new file was created.
    pub fn init(&self) -> Result<bool, StorageError> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&AccountTable::new())?;
        Ok(true)
    }
}

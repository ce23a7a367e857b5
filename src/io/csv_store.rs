//! CSV-file account store
//!
//! `CsvAccountStore` keeps the ledger in two files inside one directory:
//!
//! - `accounts.csv`: `id,customer_id,kind,balance`
//! - `transactions.csv`: `id,account_id,kind,amount,timestamp,description`
//!
//! Transaction rows appear in the order they were recorded, which is the
//! history order of each account.
//!
//! # Write protocol
//!
//! Every call holds a store-level mutex, so the files are never read while
//! another call is rewriting them. `save` rewrites both files: each new file is
//! written to a temporary file in the same directory and renamed over the old
//! one, transactions first. A crash therefore leaves each file either in its
//! old or its new state, never truncated.

use crate::core::traits::AccountStore;
use crate::types::{Account, AccountKind, LedgerError, Transaction, TransactionKind};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;
use uuid::Uuid;

const ACCOUNTS_FILE: &str = "accounts.csv";
const TRANSACTIONS_FILE: &str = "transactions.csv";
const ACCOUNTS_HEADER: [&str; 4] = ["id", "customer_id", "kind", "balance"];
const TRANSACTIONS_HEADER: [&str; 6] = [
    "id",
    "account_id",
    "kind",
    "amount",
    "timestamp",
    "description",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountRow {
    id: String,
    customer_id: String,
    kind: String,
    balance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransactionRow {
    id: String,
    account_id: String,
    kind: String,
    amount: String,
    timestamp: String,
    description: String,
}

impl TransactionRow {
    fn from_entry(account_id: &str, entry: &Transaction) -> Self {
        TransactionRow {
            id: entry.id.to_string(),
            account_id: account_id.to_string(),
            kind: entry.kind.as_str().to_string(),
            amount: entry.amount.to_string(),
            timestamp: entry.timestamp.to_rfc3339(),
            description: entry.description.clone(),
        }
    }

    fn to_entry(&self) -> Result<Transaction, LedgerError> {
        let corrupt = |field: &str, cause: &dyn std::fmt::Display| {
            LedgerError::persistence_failure(
                &format!("bad {} in transaction {} of account {}", field, self.id, self.account_id),
                cause,
            )
        };

        Ok(Transaction {
            id: Uuid::parse_str(&self.id).map_err(|e| corrupt("id", &e))?,
            kind: TransactionKind::from_str(&self.kind).map_err(|e| corrupt("kind", &e))?,
            amount: Decimal::from_str(&self.amount).map_err(|e| corrupt("amount", &e))?,
            timestamp: DateTime::parse_from_rfc3339(&self.timestamp)
                .map_err(|e| corrupt("timestamp", &e))?
                .with_timezone(&Utc),
            description: self.description.clone(),
        })
    }
}

/// Raw contents of both files
#[derive(Debug, Default)]
struct Tables {
    accounts: Vec<AccountRow>,
    transactions: Vec<TransactionRow>,
}

impl Tables {
    fn restore(&self, row: &AccountRow) -> Result<Account, LedgerError> {
        let kind = AccountKind::from_str(&row.kind).map_err(|e| {
            LedgerError::persistence_failure(&format!("bad kind for account {}", row.id), e)
        })?;
        let balance = Decimal::from_str(&row.balance).map_err(|e| {
            LedgerError::persistence_failure(&format!("bad balance for account {}", row.id), e)
        })?;
        let history = self
            .transactions
            .iter()
            .filter(|tx| tx.account_id == row.id)
            .map(TransactionRow::to_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Account::restore(row.id.clone(), row.customer_id.clone(), kind, balance, history)
    }

    fn remove(&mut self, account_id: &str) {
        self.accounts.retain(|row| row.id != account_id);
        self.transactions.retain(|row| row.account_id != account_id);
    }
}

/// Account store backed by two CSV files in a directory
#[derive(Debug)]
pub struct CsvAccountStore {
    dir: PathBuf,
    file_lock: Mutex<()>,
}

impl CsvAccountStore {
    /// Open the store in `dir`, creating the directory and empty files if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            LedgerError::persistence_failure(&format!("creating {}", dir.display()), e)
        })?;

        let store = CsvAccountStore {
            dir,
            file_lock: Mutex::new(()),
        };

        if !store.accounts_path().exists() || !store.transactions_path().exists() {
            let _guard = store.lock_files();
            let tables = store.read_tables()?;
            store.write_tables(&tables)?;
        }

        tracing::debug!(dir = %store.dir.display(), "opened csv account store");
        Ok(store)
    }

    /// Directory holding the store's files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn accounts_path(&self) -> PathBuf {
        self.dir.join(ACCOUNTS_FILE)
    }

    fn transactions_path(&self) -> PathBuf {
        self.dir.join(TRANSACTIONS_FILE)
    }

    // The mutex guards the files, not in-memory data, so a poisoned lock is
    // safe to take over: every rewrite is an atomic rename.
    fn lock_files(&self) -> MutexGuard<'_, ()> {
        self.file_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_tables(&self) -> Result<Tables, LedgerError> {
        Ok(Tables {
            accounts: read_rows(&self.accounts_path())?,
            transactions: read_rows(&self.transactions_path())?,
        })
    }

    fn write_tables(&self, tables: &Tables) -> Result<(), LedgerError> {
        replace_file(
            &self.dir,
            &self.transactions_path(),
            &TRANSACTIONS_HEADER,
            &tables.transactions,
        )?;
        replace_file(
            &self.dir,
            &self.accounts_path(),
            &ACCOUNTS_HEADER,
            &tables.accounts,
        )
    }
}

impl AccountStore for CsvAccountStore {
    fn find_by_id(&self, id: &str) -> Result<Option<Account>, LedgerError> {
        let _guard = self.lock_files();
        let tables = self.read_tables()?;

        tables
            .accounts
            .iter()
            .find(|row| row.id == id)
            .map(|row| tables.restore(row))
            .transpose()
    }

    fn find_all(&self) -> Result<Vec<Account>, LedgerError> {
        let _guard = self.lock_files();
        let tables = self.read_tables()?;

        tables
            .accounts
            .iter()
            .map(|row| tables.restore(row))
            .collect()
    }

    fn save(&self, account: &Account) -> Result<(), LedgerError> {
        let _guard = self.lock_files();
        let mut tables = self.read_tables()?;

        let row = AccountRow {
            id: account.id().to_string(),
            customer_id: account.customer_id().to_string(),
            kind: account.kind().as_str().to_string(),
            balance: account.balance().to_string(),
        };
        match tables.accounts.iter_mut().find(|existing| existing.id == row.id) {
            Some(existing) => *existing = row,
            None => tables.accounts.push(row),
        }

        tables.transactions.retain(|tx| tx.account_id != account.id());
        tables.transactions.extend(
            account
                .transactions()
                .iter()
                .map(|entry| TransactionRow::from_entry(account.id(), entry)),
        );

        self.write_tables(&tables)?;
        tracing::trace!(account = account.id(), "saved account to csv store");
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), LedgerError> {
        let _guard = self.lock_files();
        let mut tables = self.read_tables()?;
        tables.remove(id);
        self.write_tables(&tables)
    }
}

pub(crate) fn read_rows<T>(path: &Path) -> Result<Vec<T>, LedgerError>
where
    T: for<'de> Deserialize<'de>,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(LedgerError::persistence_failure(
                &format!("opening {}", path.display()),
                e,
            ))
        }
    };

    ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_reader(file)
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| LedgerError::persistence_failure(&format!("reading {}", path.display()), e))
}

/// Atomically replace `path` with `header` followed by `rows`
pub(crate) fn replace_file<T: Serialize>(
    dir: &Path,
    path: &Path,
    header: &[&str],
    rows: &[T],
) -> Result<(), LedgerError> {
    let failure = |e: &dyn std::fmt::Display| {
        LedgerError::persistence_failure(&format!("writing {}", path.display()), e)
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| failure(&e))?;
    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp.as_file_mut());
        writer.write_record(header).map_err(|e| failure(&e))?;
        for row in rows {
            writer.serialize(row).map_err(|e| failure(&e))?;
        }
        writer.flush().map_err(|e| failure(&e))?;
    }
    temp.as_file_mut().sync_all().map_err(|e| failure(&e))?;
    temp.persist(path).map_err(|e| failure(&e.error))?;
    Ok(())
}

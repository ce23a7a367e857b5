//! Ledger entry types for the bank ledger
//!
//! This module defines the immutable transaction record appended to an
//! account's history every time its balance changes, together with the
//! identifier aliases shared across the crate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account identifier
///
/// Account ids are compared lexicographically when two account locks
/// must be acquired together.
pub type AccountId = String;

/// Customer identifier
pub type CustomerId = String;

/// Transaction identifier (random v4 UUID)
pub type TransactionId = Uuid;

/// Kind of balance-affecting event recorded in an account's history
///
/// Transfers are recorded as one `Withdraw` entry on the source account and
/// one `Deposit` entry on the destination account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Credit to the account
    Deposit,

    /// Debit from the account
    Withdraw,
}

impl TransactionKind {
    /// Human-readable name, also used as the persisted tag
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdraw => "WITHDRAW",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEPOSIT" => Ok(TransactionKind::Deposit),
            "WITHDRAW" | "WITHDRAWAL" => Ok(TransactionKind::Withdraw),
            other => Err(format!("Unknown transaction kind '{}'", other)),
        }
    }
}

/// One immutable entry in an account's history
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Unique entry id
    pub id: TransactionId,

    /// Whether the entry credited or debited the account
    pub kind: TransactionKind,

    /// Strictly positive amount moved by this entry
    pub amount: Decimal,

    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,

    /// Free-text description, e.g. "Transfer to A2"
    pub description: String,
}

impl Transaction {
    /// Create a new entry stamped with a fresh id and the current time
    pub fn new(kind: TransactionKind, amount: Decimal, description: impl Into<String>) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            kind,
            amount,
            timestamp: Utc::now(),
            description: description.into(),
        }
    }

    /// The amount with the sign it contributes to the balance
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Deposit => self.amount,
            TransactionKind::Withdraw => -self.amount,
        }
    }
}

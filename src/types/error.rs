//! Error types for the bank ledger
//!
//! This module defines every error that can surface from the ledger engine
//! and its stores. The CSV readers report row problems as plain messages.
//!
//! # Error Categories
//!
//! - **Lookup Errors**: unknown accounts or customers
//! - **Validation Errors**: non-positive amounts, self-transfers, bad customer data
//! - **Balance Errors**: insufficient funds, arithmetic overflow
//! - **Persistence Errors**: the store could not load or record state, or
//!   loaded a ledger that does not add up

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
///
/// None of these errors are retried inside the engine; they propagate to the
/// immediate caller, which decides on any retry policy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// The operation references an account id that does not exist
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The unknown account id
        account: String,
    },

    /// Amount is zero or negative
    ///
    /// Checked before any account lock is taken.
    #[error("Invalid amount {amount}: amounts must be positive")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Withdrawal exceeds the current balance
    ///
    /// The operation has no effect on the account.
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account id
        account: String,
        /// Balance at the time of the attempt
        balance: Decimal,
        /// Requested withdrawal amount
        requested: Decimal,
    },

    /// The account store could not durably load or record state
    #[error("Persistence failure: {message}")]
    PersistenceFailure {
        /// Description of the failure
        message: String,
    },

    /// A transfer names the same account on both sides
    #[error("Cannot transfer from account {account} to itself")]
    SameAccount {
        /// Account id
        account: String,
    },

    /// Account creation with an id that is already taken
    #[error("Account {account} already exists")]
    AccountAlreadyExists {
        /// Account id
        account: String,
    },

    /// Account creation for a customer the directory does not know
    #[error("Customer {customer} does not exist")]
    CustomerNotFound {
        /// Customer id
        customer: String,
    },

    /// Customer registration with an id that is already taken
    #[error("Customer with id {customer} already exists")]
    DuplicateCustomer {
        /// Customer id
        customer: String,
    },

    /// Customer email does not look like an email address
    #[error("Invalid email format: '{email}'")]
    InvalidEmail {
        /// The rejected email
        email: String,
    },

    /// Customer phone number is not 8-15 digits with an optional leading '+'
    #[error("Invalid phone number format: '{phone}'")]
    InvalidPhone {
        /// The rejected phone number
        phone: String,
    },

    /// Unknown account kind tag
    #[error("Invalid account kind '{kind}'")]
    InvalidAccountKind {
        /// The rejected tag
        kind: String,
    },

    /// Arithmetic overflow would occur
    ///
    /// The operation is rejected with the account unchanged.
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account id
        account: String,
    },

    /// A loaded account's balance disagrees with its transaction history, or
    /// the history itself is not a valid ledger
    #[error("Ledger mismatch for account {account}: {message}")]
    LedgerMismatch {
        /// Account id
        account: String,
        /// What is inconsistent
        message: String,
    },
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an AccountNotFound error
    pub fn account_not_found(account: &str) -> Self {
        LedgerError::AccountNotFound {
            account: account.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &str, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account: account.to_string(),
            balance,
            requested,
        }
    }

    /// Create a PersistenceFailure error with context
    pub fn persistence_failure(context: &str, cause: impl std::fmt::Display) -> Self {
        LedgerError::PersistenceFailure {
            message: format!("{}: {}", context, cause),
        }
    }

    /// Create a SameAccount error
    pub fn same_account(account: &str) -> Self {
        LedgerError::SameAccount {
            account: account.to_string(),
        }
    }

    /// Create an AccountAlreadyExists error
    pub fn account_already_exists(account: &str) -> Self {
        LedgerError::AccountAlreadyExists {
            account: account.to_string(),
        }
    }

    /// Create a CustomerNotFound error
    pub fn customer_not_found(customer: &str) -> Self {
        LedgerError::CustomerNotFound {
            customer: customer.to_string(),
        }
    }

    /// Create a DuplicateCustomer error
    pub fn duplicate_customer(customer: &str) -> Self {
        LedgerError::DuplicateCustomer {
            customer: customer.to_string(),
        }
    }

    /// Create an InvalidAccountKind error
    pub fn invalid_account_kind(kind: &str) -> Self {
        LedgerError::InvalidAccountKind {
            kind: kind.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }

    /// Create a LedgerMismatch error
    pub fn ledger_mismatch(account: &str, message: impl Into<String>) -> Self {
        LedgerError::LedgerMismatch {
            account: account.to_string(),
            message: message.into(),
        }
    }

    /// Whether the error was caused by the store rather than by the request
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, LedgerError::PersistenceFailure { .. })
    }
}

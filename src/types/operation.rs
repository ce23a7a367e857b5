//! Ledger operation requests
//!
//! A `LedgerOperation` is one parsed request to the transaction engine, as
//! read from an operations CSV file by the processing strategies.

use super::account::AccountKind;
use super::transaction::{AccountId, CustomerId};
use rust_decimal::Decimal;

/// One request to the transaction engine
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerOperation {
    /// Open a new account for an existing customer
    Open {
        account: AccountId,
        customer: CustomerId,
        kind: AccountKind,
        /// Applied as an initial deposit when greater than zero
        initial_balance: Decimal,
    },

    /// Credit an account
    Deposit { account: AccountId, amount: Decimal },

    /// Debit an account
    Withdraw { account: AccountId, amount: Decimal },

    /// Move funds between two accounts
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    },
}

impl LedgerOperation {
    /// The account this operation creates or debits
    ///
    /// Used by the batch processor to keep operations on the same account in
    /// their original order.
    pub fn primary_account(&self) -> &str {
        match self {
            LedgerOperation::Open { account, .. }
            | LedgerOperation::Deposit { account, .. }
            | LedgerOperation::Withdraw { account, .. } => account,
            LedgerOperation::Transfer { from, .. } => from,
        }
    }

    /// Every account the operation reads or writes, primary account first
    pub fn accounts(&self) -> Vec<&str> {
        match self {
            LedgerOperation::Transfer { from, to, .. } => vec![from.as_str(), to.as_str()],
            _ => vec![self.primary_account()],
        }
    }

    /// Short lowercase name of the operation, used in log output
    pub fn name(&self) -> &'static str {
        match self {
            LedgerOperation::Open { .. } => "open",
            LedgerOperation::Deposit { .. } => "deposit",
            LedgerOperation::Withdraw { .. } => "withdraw",
            LedgerOperation::Transfer { .. } => "transfer",
        }
    }
}

//! Transaction processing engine
//!
//! This module provides the TransactionEngine that applies ledger operations
//! against an [`AccountStore`] while holding the per-account locks from
//! [`AccountLocks`].
//!
//! Every mutating operation follows the same shape:
//! 1. validate the request (existence, amount) without taking any lock
//! 2. acquire the account lock, or both account locks in canonical order
//! 3. reload the account(s) from the store
//! 4. apply the change to the loaded value and save it back
//!
//! Guards are plain RAII values, so locks are released on every exit path,
//! including early returns through `?`.

use crate::core::lock_table::AccountLocks;
use crate::core::reporting::LedgerQueries;
use crate::core::traits::{AccountStore, CustomerDirectory};
use crate::types::{Account, AccountKind, LedgerError, LedgerOperation};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Transaction processing engine
///
/// Shared between worker threads behind an `Arc`. All methods take `&self`;
/// mutual exclusion comes from the lock table, not from `&mut`.
pub struct TransactionEngine {
    accounts: Arc<dyn AccountStore>,
    customers: Arc<dyn CustomerDirectory>,
    locks: AccountLocks,
}

impl TransactionEngine {
    /// Create an engine over the given store and customer directory
    pub fn new(accounts: Arc<dyn AccountStore>, customers: Arc<dyn CustomerDirectory>) -> Self {
        TransactionEngine {
            accounts,
            customers,
            locks: AccountLocks::new(),
        }
    }

    /// Open a new account for an existing customer
    ///
    /// A positive `initial_balance` is recorded as the account's first deposit.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `initial_balance` is negative
    /// - `CustomerNotFound` if the directory does not know `customer_id`
    /// - `AccountAlreadyExists` if `account_id` is taken
    /// - `PersistenceFailure` if the store rejects the save
    pub fn create_account(
        &self,
        account_id: &str,
        customer_id: &str,
        kind: AccountKind,
        initial_balance: Decimal,
    ) -> Result<Account, LedgerError> {
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(initial_balance));
        }
        if !self.customers.contains(customer_id) {
            return Err(LedgerError::customer_not_found(customer_id));
        }

        let lock = self.locks.handle(account_id);
        let _guard = lock.lock();

        if self.accounts.find_by_id(account_id)?.is_some() {
            return Err(LedgerError::account_already_exists(account_id));
        }

        let mut account = Account::new(account_id, customer_id, kind);
        if initial_balance > Decimal::ZERO {
            account.deposit_with(
                initial_balance,
                format!("Initial deposit to account {}", account_id),
            )?;
        }
        self.persist(&account)?;

        tracing::debug!(
            account = account_id,
            customer = customer_id,
            kind = %kind,
            balance = %account.balance(),
            "opened account"
        );
        Ok(account)
    }

    /// Deposit `amount` into an existing account
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the account does not exist
    /// - `InvalidAmount` if `amount <= 0`
    /// - `ArithmeticOverflow` if the balance would overflow
    /// - `PersistenceFailure` if the store rejects the save
    pub fn deposit(&self, account_id: &str, amount: Decimal) -> Result<(), LedgerError> {
        self.require_account(account_id)?;
        ensure_positive(amount)?;

        let lock = self.locks.handle(account_id);
        let _guard = lock.lock();

        let mut account = self.load(account_id)?;
        account.deposit(amount)?;
        self.persist(&account)?;

        tracing::debug!(account = account_id, %amount, balance = %account.balance(), "deposit applied");
        Ok(())
    }

    /// Withdraw `amount` from an existing account
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the account does not exist
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InsufficientFunds` if the balance does not cover `amount`
    /// - `PersistenceFailure` if the store rejects the save
    pub fn withdraw(&self, account_id: &str, amount: Decimal) -> Result<(), LedgerError> {
        self.require_account(account_id)?;
        ensure_positive(amount)?;

        let lock = self.locks.handle(account_id);
        let _guard = lock.lock();

        let mut account = self.load(account_id)?;
        account.withdraw(amount)?;
        self.persist(&account)?;

        tracing::debug!(account = account_id, %amount, balance = %account.balance(), "withdrawal applied");
        Ok(())
    }

    /// Move `amount` from one account to another
    ///
    /// Both account locks are held for the whole critical section, acquired in
    /// lexicographic id order whichever direction the money moves. The source
    /// is debited before the destination is credited, so an `InsufficientFunds`
    /// failure leaves both accounts untouched.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if either account does not exist
    /// - `InvalidAmount` if `amount <= 0`
    /// - `SameAccount` if `from == to`
    /// - `InsufficientFunds` if the source balance does not cover `amount`
    /// - `PersistenceFailure` if the store rejects either save; when the
    ///   destination save fails the source is restored to its previous state
    pub fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<(), LedgerError> {
        self.require_account(from)?;
        self.require_account(to)?;
        ensure_positive(amount)?;
        if from == to {
            return Err(LedgerError::same_account(from));
        }

        let pair = self.locks.pair(from, to);
        let _guard = pair.lock();

        let mut source = self.load(from)?;
        let mut target = self.load(to)?;
        let source_before = source.clone();

        source.withdraw_with(amount, format!("Transfer to {}", to))?;
        target.deposit_with(amount, format!("Transfer from {}", from))?;

        self.persist(&source)?;
        if let Err(err) = self.persist(&target) {
            tracing::error!(from, to, %amount, error = %err, "destination save failed, restoring source");
            if let Err(restore_err) = self.persist(&source_before) {
                tracing::error!(account = from, error = %restore_err, "failed to restore source account");
            }
            return Err(err);
        }

        tracing::debug!(from, to, %amount, "transfer applied");
        Ok(())
    }

    /// Apply one parsed operation
    pub fn execute(&self, operation: &LedgerOperation) -> Result<(), LedgerError> {
        match operation {
            LedgerOperation::Open {
                account,
                customer,
                kind,
                initial_balance,
            } => self
                .create_account(account, customer, *kind, *initial_balance)
                .map(|_| ()),
            LedgerOperation::Deposit { account, amount } => self.deposit(account, *amount),
            LedgerOperation::Withdraw { account, amount } => self.withdraw(account, *amount),
            LedgerOperation::Transfer { from, to, amount } => self.transfer(from, to, *amount),
        }
    }

    /// Snapshot of one account, without taking its lock
    pub fn get_account(&self, account_id: &str) -> Result<Option<Account>, LedgerError> {
        self.accounts.find_by_id(account_id)
    }

    /// Snapshot of every account sorted by id
    pub fn get_all_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let mut accounts = self.accounts.find_all()?;
        accounts.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(accounts)
    }

    /// Read-only reporting over the engine's store
    pub fn queries(&self) -> LedgerQueries<'_> {
        LedgerQueries::new(self.accounts.as_ref())
    }

    fn require_account(&self, account_id: &str) -> Result<(), LedgerError> {
        match self.accounts.find_by_id(account_id)? {
            Some(_) => Ok(()),
            None => Err(LedgerError::account_not_found(account_id)),
        }
    }

    // The account may have been deleted between the existence check and
    // acquiring its lock.
    fn load(&self, account_id: &str) -> Result<Account, LedgerError> {
        self.accounts
            .find_by_id(account_id)?
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    fn persist(&self, account: &Account) -> Result<(), LedgerError> {
        self.accounts.save(account).map_err(|err| {
            if err.is_persistence_failure() {
                err
            } else {
                LedgerError::persistence_failure(&format!("saving account {}", account.id()), err)
            }
        })
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(amount));
    }
    Ok(())
}

//! Account-related types for the bank ledger
//!
//! This module defines the Account structure, its balance rules, and the
//! closed set of account kinds.

use super::error::LedgerError;
use super::transaction::{AccountId, CustomerId, Transaction, TransactionKind};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Kind of account
///
/// Both kinds share the same withdrawal rule (no overdraft); the tag is kept
/// so a kind-specific policy can be added without changing the data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Savings,
    Current,
}

impl AccountKind {
    /// Persisted tag
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Savings => "SAVINGS",
            AccountKind::Current => "CURRENT",
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            AccountKind::Savings => "Savings",
            AccountKind::Current => "Current",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SAVINGS" => Ok(AccountKind::Savings),
            "CURRENT" => Ok(AccountKind::Current),
            _ => Err(LedgerError::invalid_account_kind(value)),
        }
    }
}

/// Customer account state
///
/// An `Account` value is a transient view of what the account store holds:
/// the engine loads it, mutates it through [`Account::deposit`] or
/// [`Account::withdraw`], and saves it back while holding the account's lock.
///
/// Invariants:
/// - `balance` equals the signed sum of `transactions`
/// - `balance` is never negative
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    customer_id: CustomerId,
    kind: AccountKind,
    balance: Decimal,
    transactions: Vec<Transaction>,
}

impl Account {
    /// Create a new account with zero balance and no history
    pub fn new(id: impl Into<AccountId>, customer_id: impl Into<CustomerId>, kind: AccountKind) -> Self {
        Account {
            id: id.into(),
            customer_id: customer_id.into(),
            kind,
            balance: Decimal::ZERO,
            transactions: Vec::new(),
        }
    }

    /// Rebuild an account from persisted state
    ///
    /// # Errors
    ///
    /// Returns `LedgerMismatch` if the balance is negative or differs from the
    /// signed sum of `transactions`, if an entry has a non-positive amount, or
    /// if the entries do not sum without overflow.
    pub fn restore(
        id: impl Into<AccountId>,
        customer_id: impl Into<CustomerId>,
        kind: AccountKind,
        balance: Decimal,
        transactions: Vec<Transaction>,
    ) -> Result<Self, LedgerError> {
        let account = Account {
            id: id.into(),
            customer_id: customer_id.into(),
            kind,
            balance,
            transactions,
        };

        if let Some(entry) = account
            .transactions
            .iter()
            .find(|entry| entry.amount <= Decimal::ZERO)
        {
            return Err(LedgerError::ledger_mismatch(
                &account.id,
                format!("transaction {} has non-positive amount {}", entry.id, entry.amount),
            ));
        }

        let ledger = account.ledger_total().map_err(|_| {
            LedgerError::ledger_mismatch(&account.id, "transaction amounts overflow")
        })?;
        if balance < Decimal::ZERO || ledger != balance {
            return Err(LedgerError::ledger_mismatch(
                &account.id,
                format!("stored balance {}, transactions sum to {}", balance, ledger),
            ));
        }

        Ok(account)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Copy of the transaction history in chronological order
    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    /// Number of recorded transactions
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Signed sum of every recorded transaction
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` if the sum does not fit in a `Decimal`
    pub fn ledger_total(&self) -> Result<Decimal, LedgerError> {
        self.transactions
            .iter()
            .try_fold(Decimal::ZERO, |total, entry| {
                total
                    .checked_add(entry.signed_amount())
                    .ok_or_else(|| LedgerError::arithmetic_overflow("ledger total", &self.id))
            })
    }

    /// Deposit funds into the account
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `ArithmeticOverflow` if the balance would overflow
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        let description = format!("Deposit to account {}", self.id);
        self.deposit_with(amount, description)
    }

    /// Deposit funds, recording `description` on the new entry
    pub fn deposit_with(
        &mut self,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<(), LedgerError> {
        ensure_positive(amount)?;

        let new_balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", &self.id))?;

        self.balance = new_balance;
        self.transactions
            .push(Transaction::new(TransactionKind::Deposit, amount, description));

        Ok(())
    }

    /// Withdraw funds from the account
    ///
    /// Savings and current accounts use the same rule: the balance must cover
    /// the full amount.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InsufficientFunds` if `balance < amount`
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        let description = format!(
            "Withdraw from {} account {}",
            self.kind.display_name(),
            self.id
        );
        self.withdraw_with(amount, description)
    }

    /// Withdraw funds, recording `description` on the new entry
    pub fn withdraw_with(
        &mut self,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<(), LedgerError> {
        ensure_positive(amount)?;

        if self.balance < amount {
            return Err(LedgerError::insufficient_funds(&self.id, self.balance, amount));
        }

        // Cannot go negative after the check above
        self.balance -= amount;
        self.transactions
            .push(Transaction::new(TransactionKind::Withdraw, amount, description));

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account{{id='{}', customerId='{}', kind={}, balance={:.2}}}",
            self.id, self.customer_id, self.kind, self.balance
        )
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn account_with(balance: Decimal) -> Account {
        let mut account = Account::new("A1", "C1", AccountKind::Savings);
        if balance > Decimal::ZERO {
            account.deposit(balance).unwrap();
        }
        account
    }

    #[test]
    fn test_new_account_is_empty() {
        let account = Account::new("A1", "C1", AccountKind::Current);

        assert_eq!(account.id(), "A1");
        assert_eq!(account.customer_id(), "C1");
        assert_eq!(account.kind(), AccountKind::Current);
        assert_eq!(account.balance(), Decimal::ZERO);
        assert!(account.transactions().is_empty());
    }

    #[test]
    fn test_deposit_increases_balance_and_records_entry() {
        let mut account = account_with(Decimal::ZERO);

        account.deposit(Decimal::new(10050, 2)).unwrap();

        assert_eq!(account.balance(), Decimal::new(10050, 2));
        let history = account.transactions();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, TransactionKind::Deposit);
        assert_eq!(history[0].amount, Decimal::new(10050, 2));
        assert_eq!(history[0].description, "Deposit to account A1");
    }

    #[test]
    fn test_withdraw_decreases_balance_and_records_entry() {
        let mut account = account_with(Decimal::new(500000, 2));

        account.withdraw(Decimal::new(150000, 2)).unwrap();

        assert_eq!(account.balance(), Decimal::new(350000, 2));
        let history = account.transactions();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].kind, TransactionKind::Withdraw);
        assert_eq!(history[1].description, "Withdraw from Savings account A1");
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let mut account = account_with(Decimal::new(100, 0));

        account.withdraw(Decimal::new(100, 0)).unwrap();

        assert_eq!(account.balance(), Decimal::ZERO);
    }

    #[rstest]
    #[case::zero(Decimal::ZERO)]
    #[case::negative(Decimal::new(-1, 2))]
    #[case::large_negative(Decimal::new(-100000, 0))]
    fn test_non_positive_amounts_are_rejected(#[case] amount: Decimal) {
        let mut account = account_with(Decimal::new(1000, 0));
        let before = account.clone();

        assert_eq!(
            account.deposit(amount),
            Err(LedgerError::InvalidAmount { amount })
        );
        assert_eq!(
            account.withdraw(amount),
            Err(LedgerError::InvalidAmount { amount })
        );
        assert_eq!(account, before);
    }

    #[rstest]
    #[case::savings(AccountKind::Savings)]
    #[case::current(AccountKind::Current)]
    fn test_withdraw_with_insufficient_funds(#[case] kind: AccountKind) {
        let mut account = Account::new("A1", "C1", kind);
        account.deposit(Decimal::new(350000, 2)).unwrap();

        let result = account.withdraw(Decimal::new(99999900, 2));

        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(account.balance(), Decimal::new(350000, 2));
        assert_eq!(account.transaction_count(), 1);
    }

    #[test]
    fn test_deposit_overflow_leaves_account_unchanged() {
        let mut account = account_with(Decimal::MAX);

        let result = account.deposit(Decimal::ONE);

        assert!(matches!(result, Err(LedgerError::ArithmeticOverflow { .. })));
        assert_eq!(account.balance(), Decimal::MAX);
        assert_eq!(account.transaction_count(), 1);
    }

    #[test]
    fn test_balance_matches_ledger_after_mixed_operations() {
        let mut account = account_with(Decimal::ZERO);
        let steps = [
            (true, Decimal::new(1000, 0)),
            (false, Decimal::new(250, 0)),
            (true, Decimal::new(1275, 1)),
            (false, Decimal::new(999999, 0)),
            (false, Decimal::new(8775, 1)),
            (true, Decimal::new(1, 2)),
        ];

        for (is_deposit, amount) in steps {
            let _ = if is_deposit {
                account.deposit(amount)
            } else {
                account.withdraw(amount)
            };
            assert!(account.balance() >= Decimal::ZERO);
            assert_eq!(account.balance(), account.ledger_total().unwrap());
        }

        assert_eq!(account.balance(), Decimal::new(1, 2));
    }

    #[test]
    fn test_transactions_is_a_copy() {
        let mut account = account_with(Decimal::new(10, 0));
        let mut history = account.transactions();
        history.clear();

        account.deposit(Decimal::ONE).unwrap();

        assert_eq!(account.transactions().len(), 2);
    }

    #[test]
    fn test_restore_accepts_consistent_state() {
        let source = account_with(Decimal::new(4200, 2));

        let restored = Account::restore(
            "A1",
            "C1",
            AccountKind::Savings,
            Decimal::new(4200, 2),
            source.transactions(),
        )
        .unwrap();

        assert_eq!(restored, source);
    }

    #[test]
    fn test_restore_rejects_balance_that_disagrees_with_history() {
        let source = account_with(Decimal::new(4200, 2));

        let result = Account::restore(
            "A1",
            "C1",
            AccountKind::Savings,
            Decimal::new(5000, 2),
            source.transactions(),
        );

        assert!(matches!(result, Err(LedgerError::LedgerMismatch { .. })));
    }

    #[rstest]
    #[case::zero(Decimal::ZERO)]
    #[case::negative(Decimal::new(-10, 0))]
    fn test_restore_rejects_non_positive_entries(#[case] amount: Decimal) {
        let mut entry = Transaction::new(TransactionKind::Withdraw, Decimal::ONE, "tampered");
        entry.amount = amount;
        let balance = -amount;

        let result = Account::restore("A1", "C1", AccountKind::Savings, balance, vec![entry]);

        assert!(matches!(result, Err(LedgerError::LedgerMismatch { .. })));
    }

    #[test]
    fn test_restore_rejects_overflowing_history() {
        let history = vec![
            Transaction::new(TransactionKind::Deposit, Decimal::MAX, "first"),
            Transaction::new(TransactionKind::Deposit, Decimal::MAX, "second"),
        ];

        let result = Account::restore("A1", "C1", AccountKind::Savings, Decimal::MAX, history);

        assert!(matches!(result, Err(LedgerError::LedgerMismatch { .. })));
    }

    #[test]
    fn test_ledger_total_reports_overflow() {
        let mut account = account_with(Decimal::MAX);
        account
            .transactions
            .push(Transaction::new(TransactionKind::Deposit, Decimal::MAX, "again"));

        assert!(matches!(
            account.ledger_total(),
            Err(LedgerError::ArithmeticOverflow { .. })
        ));
    }

    #[rstest]
    #[case("savings", AccountKind::Savings)]
    #[case("CURRENT", AccountKind::Current)]
    #[case(" Current ", AccountKind::Current)]
    fn test_account_kind_parsing(#[case] input: &str, #[case] expected: AccountKind) {
        assert_eq!(input.parse::<AccountKind>().unwrap(), expected);
    }

    #[test]
    fn test_account_kind_parsing_rejects_unknown() {
        assert!(matches!(
            "checking".parse::<AccountKind>(),
            Err(LedgerError::InvalidAccountKind { .. })
        ));
    }
}

//! CSV format handling for ledger operations, customers, and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserializing operation rows
//! - Conversion from CSV records to [`LedgerOperation`]
//! - Customer file parsing
//! - Account and statement output serialization
//!
//! Conversion and output functions do no file I/O of their own, so they are
//! tested against in-memory buffers.

use crate::types::{Account, AccountKind, Customer, LedgerOperation};
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::{Read, Write};
use std::str::FromStr;

/// Header of the operations file
pub const OPERATIONS_HEADER: [&str; 6] = [
    "type",
    "account",
    "counterparty",
    "amount",
    "customer",
    "kind",
];

/// CSV record structure for deserialization
///
/// Matches the operations file with columns:
/// `type, account, counterparty, amount, customer, kind`.
/// Which of the optional columns are required depends on `type`:
///
/// | type     | required                  | optional |
/// |----------|---------------------------|----------|
/// | open     | account, customer, kind   | amount (initial balance, default 0) |
/// | deposit  | account, amount           |          |
/// | withdraw | account, amount           |          |
/// | transfer | account, counterparty, amount |      |
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub op_type: String,
    pub account: String,
    pub counterparty: Option<String>,
    pub amount: Option<String>,
    pub customer: Option<String>,
    pub kind: Option<String>,
}

/// CSV record structure for the customers file (`id,name,email,phone`)
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<CustomerRecord> for Customer {
    fn from(record: CustomerRecord) -> Self {
        Customer::new(record.id, record.name, record.email, record.phone)
    }
}

/// Convert a CsvRecord to a LedgerOperation
///
/// This function:
/// - Parses the operation type (case-insensitive, `withdrawal` is accepted)
/// - Parses the amount into a Decimal (if present)
/// - Validates that the columns the operation needs are present
///
/// Amount signs are not checked here; the engine rejects non-positive
/// amounts with `InvalidAmount`.
///
/// # Returns
///
/// Result containing either:
/// - Ok(LedgerOperation) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerOperation, String> {
    let account = required(Some(csv_record.account), "account", &csv_record.op_type)?;
    let amount = parse_amount(csv_record.amount.as_deref(), &account)?;

    match csv_record.op_type.to_lowercase().as_str() {
        "open" => {
            let customer = required(csv_record.customer, "customer", "open")?;
            let kind = required(csv_record.kind, "kind", "open")?;
            let kind = AccountKind::from_str(&kind).map_err(|e| e.to_string())?;
            Ok(LedgerOperation::Open {
                account,
                customer,
                kind,
                initial_balance: amount.unwrap_or(Decimal::ZERO),
            })
        }
        "deposit" => Ok(LedgerOperation::Deposit {
            amount: amount.ok_or_else(|| missing_amount("deposit", &account))?,
            account,
        }),
        "withdraw" | "withdrawal" => Ok(LedgerOperation::Withdraw {
            amount: amount.ok_or_else(|| missing_amount("withdraw", &account))?,
            account,
        }),
        "transfer" => {
            let to = required(csv_record.counterparty, "counterparty", "transfer")?;
            Ok(LedgerOperation::Transfer {
                amount: amount.ok_or_else(|| missing_amount("transfer", &account))?,
                from: account,
                to,
            })
        }
        _ => Err(format!(
            "Invalid operation type: '{}' for account {}",
            csv_record.op_type, account
        )),
    }
}

fn required(value: Option<String>, column: &str, op_type: &str) -> Result<String, String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(format!("'{}' operation requires column '{}'", op_type, column)),
    }
}

fn parse_amount(amount: Option<&str>, account: &str) -> Result<Option<Decimal>, String> {
    match amount {
        Some(amount_str) if !amount_str.trim().is_empty() => Decimal::from_str(amount_str.trim())
            .map(Some)
            .map_err(|_| format!("Invalid amount '{}' for account {}", amount_str, account)),
        _ => Ok(None),
    }
}

fn missing_amount(op_type: &str, account: &str) -> String {
    format!("'{}' operation for account {} requires an amount", op_type, account)
}

/// Parse a customers CSV (`id,name,email,phone`)
///
/// Rows that cannot be parsed are logged with their line number and skipped.
/// Contact validation happens when the customer is registered with the
/// directory.
pub fn read_customers_csv<R: Read>(input: R) -> Vec<Customer> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);

    reader
        .deserialize::<CustomerRecord>()
        .enumerate()
        .filter_map(|(index, row)| match row {
            Ok(record) => Some(Customer::from(record)),
            Err(e) => {
                tracing::warn!(line = index + 2, error = %e, "skipping malformed customer row");
                None
            }
        })
        .collect()
}

/// Write account states to CSV format
///
/// Writes accounts with columns: account, customer, kind, balance, transactions.
/// Accounts are sorted by id for deterministic output; balances are written
/// with two decimal places.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["account", "customer", "kind", "balance", "transactions"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by(|a, b| a.id().cmp(b.id()));

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.id().to_string(),
                account.customer_id().to_string(),
                account.kind().to_string(),
                format!("{:.2}", account.balance()),
                account.transaction_count().to_string(),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write one account's history as CSV in chronological order
///
/// Columns: id, timestamp (RFC 3339), kind, amount, description.
pub fn write_statement_csv(account: &Account, output: &mut dyn Write) -> Result<(), String> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "timestamp", "kind", "amount", "description"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for entry in account.transactions() {
        writer
            .write_record(&[
                entry.id.to_string(),
                entry.timestamp.to_rfc3339(),
                entry.kind.to_string(),
                format!("{:.2}", entry.amount),
                entry.description,
            ])
            .map_err(|e| format!("Failed to write statement record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

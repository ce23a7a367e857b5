//! CSV-file customer directory
//!
//! `CsvCustomerDirectory` keeps registered customers in `customers.csv`
//! (`id,name,email,phone`) next to the account store's files, so accounts
//! reopened from a data directory still find their owners.
//!
//! Lookups are served from memory. `register` validates the customer, rewrites
//! the file through a temporary file and an atomic rename, and only then makes
//! the customer visible.

use crate::core::customer_directory::{validate_contact, InMemoryCustomerDirectory};
use crate::core::traits::CustomerDirectory;
use crate::io::csv_store::{read_rows, replace_file};
use crate::types::{Customer, LedgerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

const CUSTOMERS_FILE: &str = "customers.csv";
const CUSTOMERS_HEADER: [&str; 4] = ["id", "name", "email", "phone"];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CustomerRow {
    id: String,
    name: String,
    email: String,
    phone: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        CustomerRow {
            id: customer.id.clone(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
        }
    }
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer::new(row.id, row.name, row.email, row.phone)
    }
}

/// Customer directory persisted as a CSV file
#[derive(Debug)]
pub struct CsvCustomerDirectory {
    dir: PathBuf,
    customers: InMemoryCustomerDirectory,
    file_lock: Mutex<()>,
}

impl CsvCustomerDirectory {
    /// Open the directory in `dir`, loading `customers.csv` or creating it empty
    ///
    /// # Errors
    ///
    /// `PersistenceFailure` if the file cannot be read or written, or if a
    /// stored customer fails validation.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            LedgerError::persistence_failure(&format!("creating {}", dir.display()), e)
        })?;

        let directory = CsvCustomerDirectory {
            dir,
            customers: InMemoryCustomerDirectory::new(),
            file_lock: Mutex::new(()),
        };

        let path = directory.path();
        if path.exists() {
            for row in read_rows::<CustomerRow>(&path)? {
                let id = row.id.clone();
                directory.customers.register(row.into()).map_err(|e| {
                    LedgerError::persistence_failure(&format!("loading customer {}", id), e)
                })?;
            }
        } else {
            replace_file::<CustomerRow>(&directory.dir, &path, &CUSTOMERS_HEADER, &[])?;
        }

        tracing::debug!(
            dir = %directory.dir.display(),
            customers = directory.customers.all().len(),
            "opened csv customer directory"
        );
        Ok(directory)
    }

    pub fn get(&self, customer_id: &str) -> Option<Customer> {
        self.customers.get(customer_id)
    }

    /// All registered customers sorted by id
    pub fn all(&self) -> Vec<Customer> {
        self.customers.all()
    }

    fn path(&self) -> PathBuf {
        self.dir.join(CUSTOMERS_FILE)
    }

    fn lock_file(&self) -> MutexGuard<'_, ()> {
        self.file_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CustomerDirectory for CsvCustomerDirectory {
    fn contains(&self, customer_id: &str) -> bool {
        self.customers.contains(customer_id)
    }

    /// Validate, persist, then register `customer`
    ///
    /// # Errors
    ///
    /// - `DuplicateCustomer`, `InvalidEmail` or `InvalidPhone` as for the
    ///   in-memory directory; nothing is written
    /// - `PersistenceFailure` if the file cannot be replaced; the customer is
    ///   not registered
    fn register(&self, customer: Customer) -> Result<(), LedgerError> {
        let _guard = self.lock_file();

        if self.customers.contains(&customer.id) {
            return Err(LedgerError::duplicate_customer(&customer.id));
        }
        validate_contact(&customer)?;

        let mut rows: Vec<CustomerRow> = self.customers.all().iter().map(CustomerRow::from).collect();
        rows.push(CustomerRow::from(&customer));
        replace_file(&self.dir, &self.path(), &CUSTOMERS_HEADER, &rows)?;

        self.customers.register(customer)
    }
}

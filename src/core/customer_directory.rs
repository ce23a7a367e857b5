//! In-memory customer directory
//!
//! Registers customers after validating their contact details and answers the
//! existence check the transaction engine performs before opening an account.

use crate::core::traits::CustomerDirectory;
use crate::types::{Customer, CustomerId, LedgerError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+$").expect("email pattern is valid")
});

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{8,15}$").expect("phone pattern is valid"));

/// Thread-safe customer registry
#[derive(Debug, Default)]
pub struct InMemoryCustomerDirectory {
    customers: DashMap<CustomerId, Customer>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self {
            customers: DashMap::new(),
        }
    }

    /// Register a new customer
    ///
    /// # Errors
    ///
    /// - `DuplicateCustomer` if the id is already registered
    /// - `InvalidEmail` if the email is malformed
    /// - `InvalidPhone` unless the phone is 8-15 digits with an optional leading '+'
    pub fn register(&self, customer: Customer) -> Result<(), LedgerError> {
        match self.customers.entry(customer.id.clone()) {
            Entry::Occupied(_) => Err(LedgerError::duplicate_customer(&customer.id)),
            Entry::Vacant(slot) => {
                validate_contact(&customer)?;
                tracing::debug!(customer = %customer.id, "registered customer");
                slot.insert(customer);
                Ok(())
            }
        }
    }

    pub fn get(&self, customer_id: &str) -> Option<Customer> {
        self.customers
            .get(customer_id)
            .map(|entry| entry.value().clone())
    }

    /// All registered customers sorted by id
    pub fn all(&self) -> Vec<Customer> {
        let mut customers: Vec<Customer> = self
            .customers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        customers.sort_by(|a, b| a.id.cmp(&b.id));
        customers
    }
}

/// Check the email and phone formats of `customer`
pub(crate) fn validate_contact(customer: &Customer) -> Result<(), LedgerError> {
    if !EMAIL_PATTERN.is_match(&customer.email) {
        return Err(LedgerError::InvalidEmail {
            email: customer.email.clone(),
        });
    }
    if !PHONE_PATTERN.is_match(&customer.phone) {
        return Err(LedgerError::InvalidPhone {
            phone: customer.phone.clone(),
        });
    }
    Ok(())
}

impl CustomerDirectory for InMemoryCustomerDirectory {
    fn contains(&self, customer_id: &str) -> bool {
        self.customers.contains_key(customer_id)
    }

    fn register(&self, customer: Customer) -> Result<(), LedgerError> {
        InMemoryCustomerDirectory::register(self, customer)
    }
}

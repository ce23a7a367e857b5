//! Customer record consumed by the customer directory

use super::transaction::CustomerId;

/// A bank customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Customer {
    pub fn new(
        id: impl Into<CustomerId>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Customer {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

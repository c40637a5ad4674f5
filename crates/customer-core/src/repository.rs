use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Customer, CustomerError};

/// Ordered in-memory customer collection shared behind one lock.
///
/// Clones share the same storage. Lookups by identifier resolve to the last
/// matching record, since insertion does not enforce unique identifiers.
#[derive(Debug, Clone, Default)]
pub struct CustomerRepository {
    customers: Arc<Mutex<Vec<Customer>>>,
}

fn last_index_of(customers: &[Customer], id: &str) -> Option<usize> {
    customers.iter().rposition(|customer| customer.id == id)
}

impl CustomerRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_customers(customers: Vec<Customer>) -> Self {
        Self { customers: Arc::new(Mutex::new(customers)) }
    }

    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<Customer> {
        let customers = self.customers.lock();
        last_index_of(&customers, id).map(|index| customers[index].clone())
    }

    pub fn append(&self, customer: Customer) {
        tracing::debug!(id = %customer.id, "appending customer");
        self.customers.lock().push(customer);
    }

    /// Overwrite the mutable fields of the record matching `id`.
    ///
    /// # Errors
    /// Returns [`CustomerError::NotFound`] when no record carries `id`.
    pub fn update_by_id(&self, id: &str, fields: &Customer) -> Result<Customer, CustomerError> {
        let mut customers = self.customers.lock();
        let index = last_index_of(&customers, id).ok_or(CustomerError::NotFound)?;
        customers[index].apply_update(fields);
        tracing::debug!(id, index, "updated customer");
        Ok(customers[index].clone())
    }

    /// Remove the record matching `id`.
    ///
    /// # Errors
    /// Returns [`CustomerError::NotFound`] when no record carries `id`.
    pub fn remove_by_id(&self, id: &str) -> Result<Customer, CustomerError> {
        let mut customers = self.customers.lock();
        let index = last_index_of(&customers, id).ok_or(CustomerError::NotFound)?;
        tracing::debug!(id, index, "removing customer by id");
        Ok(customers.remove(index))
    }

    /// Remove by 1-based position given as text; `0` addresses the first
    /// record as well.
    ///
    /// # Errors
    /// Returns [`CustomerError::InvalidIndex`] when `index` is not a
    /// non-negative integer and [`CustomerError::NotFound`] when the position
    /// is past the end of the collection.
    pub fn remove_at_position(&self, index: &str) -> Result<Customer, CustomerError> {
        let position = index.parse::<usize>().map_err(|_| CustomerError::InvalidIndex)?;
        let position = position.saturating_sub(1);

        let mut customers = self.customers.lock();
        if position >= customers.len() {
            return Err(CustomerError::NotFound);
        }
        tracing::debug!(position, "removing customer by position");

        let tail = customers.split_off(position + 1);
        let removed = customers.pop().ok_or(CustomerError::NotFound)?;
        customers.extend(tail);
        Ok(removed)
    }

    #[must_use]
    pub fn list(&self) -> Vec<Customer> {
        self.customers.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.customers.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customers.lock().is_empty()
    }

    pub fn clear(&self) {
        self.customers.lock().clear();
    }
}

use customer_core::{validate_id, Customer, CustomerError, CustomerRepository};

pub const DELETED_MESSAGE: &str = "Customer deleted successfuly";

/// How `DELETE /customer/:id` resolves the path identifier to a record.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub enum DeleteMode {
    /// Remove the record whose identifier matches, like read and update do.
    #[default]
    Identifier,
    /// Treat the identifier as a 1-based position in the collection.
    LegacyPosition,
}

impl DeleteMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::LegacyPosition => "legacy-position",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CustomerApi {
    repository: CustomerRepository,
    delete_mode: DeleteMode,
}

impl CustomerApi {
    #[must_use]
    pub fn new(repository: CustomerRepository, delete_mode: DeleteMode) -> Self {
        Self { repository, delete_mode }
    }

    /// Validate and append one customer.
    ///
    /// # Errors
    /// Returns the first validation failure of the submitted record.
    pub fn create(&self, customer: Customer) -> Result<Customer, CustomerError> {
        customer.validate()?;
        self.repository.append(customer.clone());
        tracing::info!(id = %customer.id, "customer created");
        Ok(customer)
    }

    #[must_use]
    pub fn list(&self) -> Vec<Customer> {
        self.repository.list()
    }

    /// Fetch one customer by its path identifier.
    ///
    /// # Errors
    /// Returns an identifier validation error, or [`CustomerError::NotFound`].
    pub fn get(&self, id: &str) -> Result<Customer, CustomerError> {
        validate_id(id)?;
        self.repository.find_by_id(id).ok_or(CustomerError::NotFound)
    }

    /// Replace the mutable fields of the customer stored under `id`.
    ///
    /// Callers resolve `id` with [`CustomerApi::get`] first, so an unknown or
    /// malformed identifier is reported before anything about the body. The
    /// submitted record is returned as received.
    ///
    /// # Errors
    /// Returns the first validation failure of the submitted record, or
    /// [`CustomerError::NotFound`] when no record is stored under `id`.
    pub fn update(&self, id: &str, customer: Customer) -> Result<Customer, CustomerError> {
        customer.validate()?;
        self.repository.update_by_id(id, &customer)?;
        tracing::info!(id, "customer updated");
        Ok(customer)
    }

    /// Delete an existing customer according to the configured [`DeleteMode`].
    ///
    /// # Errors
    /// Returns an identifier validation error or [`CustomerError::NotFound`].
    /// In [`DeleteMode::LegacyPosition`] a position past the end of the
    /// collection is also reported as [`CustomerError::NotFound`].
    pub fn delete(&self, id: &str) -> Result<Customer, CustomerError> {
        self.get(id)?;
        let removed = match self.delete_mode {
            DeleteMode::Identifier => self.repository.remove_by_id(id)?,
            DeleteMode::LegacyPosition => self.repository.remove_at_position(id)?,
        };
        tracing::info!(
            id,
            removed_id = %removed.id,
            mode = self.delete_mode.as_str(),
            "customer deleted"
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use customer_core::CustomerField;

    use super::*;

    fn augusto() -> Customer {
        Customer {
            id: "1".to_string(),
            name: "Augusto".to_string(),
            surname: "Giavedoni".to_string(),
            email: "augusto.giavedoni@gmail.com".to_string(),
            birthdate: "2000-02-20".to_string(),
        }
    }

    fn john() -> Customer {
        Customer {
            id: "2".to_string(),
            name: "John".to_string(),
            surname: "Wick".to_string(),
            email: "john.wick@gmail.com".to_string(),
            birthdate: "2014-10-24".to_string(),
        }
    }

    fn augusto_updated() -> Customer {
        Customer {
            name: "Augusto Patricio".to_string(),
            email: "augusto.giavedoni@outlook.com".to_string(),
            ..augusto()
        }
    }

    fn seeded(mode: DeleteMode) -> Result<CustomerApi, CustomerError> {
        let api = CustomerApi::new(CustomerRepository::new(), mode);
        api.create(augusto())?;
        api.create(john())?;
        Ok(api)
    }

    #[test]
    fn create_echoes_and_lists_in_order() -> Result<(), CustomerError> {
        let api = CustomerApi::default();
        assert_eq!(api.create(augusto())?, augusto());
        assert_eq!(api.create(john())?, john());
        assert_eq!(api.list(), vec![augusto(), john()]);
        Ok(())
    }

    #[test]
    fn create_rejects_invalid_record_without_appending() {
        let api = CustomerApi::default();
        let result = api.create(Customer { surname: String::new(), ..augusto() });
        assert_eq!(result, Err(CustomerError::EmptyField(CustomerField::Surname)));
        assert!(api.list().is_empty());
    }

    #[test]
    fn get_validates_identifier_before_lookup() -> Result<(), CustomerError> {
        let api = seeded(DeleteMode::Identifier)?;
        assert_eq!(api.get("1")?, augusto());
        assert_eq!(api.get(""), Err(CustomerError::EmptyIdentifier));
        assert_eq!(api.get("/"), Err(CustomerError::InvalidIdentifier));
        assert_eq!(api.get("3"), Err(CustomerError::NotFound));
        Ok(())
    }

    #[test]
    fn update_persists_new_fields() -> Result<(), CustomerError> {
        let api = seeded(DeleteMode::Identifier)?;
        assert_eq!(api.update("1", augusto_updated())?, augusto_updated());
        assert_eq!(api.get("1")?, augusto_updated());
        assert_eq!(api.get("2")?, john());
        Ok(())
    }

    #[test]
    fn update_validates_body_then_reports_missing_record() -> Result<(), CustomerError> {
        let api = seeded(DeleteMode::Identifier)?;
        let invalid = Customer { email: "a.a".to_string(), ..augusto() };
        assert_eq!(api.get("3"), Err(CustomerError::NotFound));
        assert_eq!(api.update("3", augusto_updated()), Err(CustomerError::NotFound));
        assert_eq!(api.update("1", invalid), Err(CustomerError::InvalidEmail));
        assert_eq!(api.list(), vec![augusto(), john()]);
        Ok(())
    }

    #[test]
    fn delete_by_identifier_ignores_position() -> Result<(), CustomerError> {
        let api = CustomerApi::default();
        api.create(Customer { id: "10".to_string(), ..augusto() })?;
        api.create(Customer { id: "20".to_string(), ..john() })?;

        assert_eq!(api.delete("20")?.name, "John");
        assert_eq!(api.delete("20"), Err(CustomerError::NotFound));
        assert_eq!(api.delete("x"), Err(CustomerError::InvalidIdentifier));
        assert_eq!(api.list().len(), 1);
        Ok(())
    }

    #[test]
    fn delete_in_legacy_mode_uses_position() -> Result<(), CustomerError> {
        let api = CustomerApi::new(CustomerRepository::new(), DeleteMode::LegacyPosition);
        api.create(Customer { id: "2".to_string(), ..augusto() })?;
        api.create(Customer { id: "1".to_string(), ..john() })?;

        // Id "2" exists, but position 2 holds the record with id "1".
        assert_eq!(api.delete("2")?.name, "John");
        assert_eq!(api.list().len(), 1);
        assert_eq!(api.delete("2"), Err(CustomerError::NotFound));
        Ok(())
    }
}

//! Customer store and the load/submit/delete workflows.
//!
//! This module holds the in-memory customer list and the rules for how
//! each API operation mutates it. The remote API is reached through the
//! [`CustomerApi`] trait so the rules can be exercised without a network.

use super::errors::{ApiError, ApiResult, SubmitError, ValidationError};
use super::models::{Customer, Field, NewCustomer};
use serde::Deserialize;
use tracing::{info, warn};

/// Notice shown when the create form is submitted with an empty field.
pub const FILL_ALL_FIELDS_NOTICE: &str = "Please fill in all fields!";
/// Notice shown when a delete request fails.
pub const DELETE_FAILED_NOTICE: &str = "Error deleting customer!";

/// Operations offered by the remote customer API.
pub trait CustomerApi {
    /// Fetches the full customer collection.
    fn list_customers(&self) -> ApiResult<Vec<Customer>>;
    /// Creates a customer and returns the server's record.
    fn create_customer(&self, customer: &NewCustomer) -> ApiResult<Customer>;
    /// Deletes the customer with the given id.
    fn delete_customer(&self, id: &str) -> ApiResult<()>;
}

/// Ordered, in-memory list of customers backing the rendered view.
///
/// Records enter by bulk replace or append and leave by id filter; they
/// are never edited in place.
///
/// # Examples
///
/// ```
/// use custman::domain::CustomerStore;
///
/// let store = CustomerStore::default();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerStore {
    customers: Vec<Customer>,
}

impl CustomerStore {
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Customer> {
        self.customers.get(index)
    }

    /// Replaces the whole list with `customers`, keeping their order.
    pub fn replace_all(&mut self, customers: Vec<Customer>) {
        self.customers = customers;
    }

    /// Appends a record at the end of the list.
    pub fn append(&mut self, customer: Customer) {
        self.customers.push(customer);
    }

    /// Drops every record whose id equals `id` and returns how many were removed.
    pub fn remove_by_id(&mut self, id: &str) -> usize {
        let before = self.customers.len();
        self.customers.retain(|c| c.id != id);
        before - self.customers.len()
    }
}

/// What happens to the local record when a delete request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Remove the record locally whatever the request outcome.
    #[default]
    OptimisticAlways,
    /// Keep the record when the request fails.
    RevertOnFailure,
}

impl std::str::FromStr for DeletePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "optimistic_always" | "optimistic" => Ok(Self::OptimisticAlways),
            "revert_on_failure" | "revert" => Ok(Self::RevertOnFailure),
            other => Err(format!(
                "unsupported delete policy `{other}` (expected optimistic_always|revert_on_failure)"
            )),
        }
    }
}

/// Result of a delete action. The request may have failed even when the
/// record was removed locally.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub removed: usize,
    pub error: Option<ApiError>,
}

impl DeleteOutcome {
    /// Blocking notice the user must see, if any.
    pub fn notice(&self) -> Option<&'static str> {
        self.error.as_ref().map(|_| DELETE_FAILED_NOTICE)
    }
}

/// Applies the three API operations to a [`CustomerStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerService {
    pub delete_policy: DeletePolicy,
}

impl CustomerService {
    pub fn new(delete_policy: DeletePolicy) -> Self {
        Self { delete_policy }
    }

    /// Fetches all customers and replaces the store with them.
    ///
    /// On failure the store is left untouched and the error is returned.
    pub fn load(&self, api: &dyn CustomerApi, store: &mut CustomerStore) -> ApiResult<usize> {
        let customers = api.list_customers().inspect_err(|e| {
            warn!(error = %e, "failed to load customers");
        })?;
        let count = customers.len();
        store.replace_all(customers);
        info!(count, "loaded customers");
        Ok(count)
    }

    /// Validates the form values, creates the customer and appends it.
    ///
    /// Returns the created record. No request is sent when validation fails,
    /// and the store is only mutated after a successful response.
    pub fn submit(
        &self,
        api: &dyn CustomerApi,
        store: &mut CustomerStore,
        name: &str,
        email: &str,
    ) -> Result<Customer, SubmitError> {
        let request = validate_form(name, email)?;
        let created = api.create_customer(&request).inspect_err(|e| {
            warn!(error = %e, "failed to create customer");
        })?;
        store.append(created.clone());
        info!(id = %created.id, "created customer");
        Ok(created)
    }

    /// Sends a delete request for `id` and removes the record locally
    /// according to the configured [`DeletePolicy`].
    pub fn delete(&self, api: &dyn CustomerApi, store: &mut CustomerStore, id: &str) -> DeleteOutcome {
        let error = api.delete_customer(id).err();
        if let Some(ref e) = error {
            warn!(id, error = %e, policy = ?self.delete_policy, "delete request failed");
        }

        let removed = match (&error, self.delete_policy) {
            (Some(_), DeletePolicy::RevertOnFailure) => 0,
            _ => store.remove_by_id(id),
        };
        info!(id, removed, "removed customer from list");

        DeleteOutcome { removed, error }
    }
}

/// Checks that both fields are non-empty and builds the create request.
pub fn validate_form(name: &str, email: &str) -> Result<NewCustomer, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyField(Field::Name));
    }
    if email.is_empty() {
        return Err(ValidationError::EmptyField(Field::Email));
    }
    Ok(NewCustomer { name: name.to_string(), email: email.to_string() })
}

//! HTTP client for the remote customer API.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::debug;

use crate::domain::{ApiError, ApiResult, Customer, CustomerApi, NewCustomer};

/// Blocking reqwest implementation of [`CustomerApi`].
#[derive(Debug, Clone)]
pub struct HttpCustomerApi {
    client: Client,
    base_url: String,
}

impl HttpCustomerApi {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_request_error(error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout
        } else if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }

    fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(ApiError::Status { status: status.as_u16(), body })
    }
}

impl CustomerApi for HttpCustomerApi {
    fn list_customers(&self) -> ApiResult<Vec<Customer>> {
        let url = self.url("/customers");
        debug!(%url, "GET customers");

        let response = self.client.get(&url).send().map_err(Self::map_request_error)?;
        let response = Self::check_status(response)?;
        let customers: Vec<Customer> = response.json().map_err(|e| ApiError::Decode(e.to_string()))?;

        debug!(count = customers.len(), "GET customers finished");
        Ok(customers)
    }

    fn create_customer(&self, customer: &NewCustomer) -> ApiResult<Customer> {
        let url = self.url("/customer");
        debug!(%url, name = %customer.name, "POST customer");

        let response = self
            .client
            .post(&url)
            .json(customer)
            .send()
            .map_err(Self::map_request_error)?;
        let response = Self::check_status(response)?;
        let created: Customer = response.json().map_err(|e| ApiError::Decode(e.to_string()))?;

        debug!(id = %created.id, "POST customer finished");
        Ok(created)
    }

    fn delete_customer(&self, id: &str) -> ApiResult<()> {
        let url = self.url("/customer");
        debug!(%url, id, "DELETE customer");

        let response = self
            .client
            .delete(&url)
            .query(&[("id", id)])
            .send()
            .map_err(Self::map_request_error)?;
        Self::check_status(response)?;

        debug!(id, "DELETE customer finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = HttpCustomerApi::new("http://localhost:3333/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:3333");
        assert_eq!(api.url("/customers"), "http://localhost:3333/customers");
    }
}

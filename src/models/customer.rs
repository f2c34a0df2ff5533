//! Customer entity and the cache keys it is stored under.

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// A customer record, cached both individually and in the customer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Assigned by the repository on insert; ignored in create requests
    #[serde(default)]
    pub id: i32,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub mark: Option<i32>,
}

impl Customer {
    pub fn new(
        id: i32,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        mark: i32,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: Some(last_name.into()),
            mark: Some(mark),
        }
    }

    /// Validates a customer received over HTTP.
    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() {
            return Err(CacheError::BadRequest(
                "firstName cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cache key scheme for customers.
pub struct CustomerCacheKeys;

impl CustomerCacheKeys {
    /// Key of the list entry holding every customer
    pub const LIST: &'static str = "CustomerList";

    /// Key of the entry holding a single customer
    pub fn item(customer_id: i32) -> String {
        format!("Customer-{}", customer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_json_is_camel_case() {
        let customer = Customer::new(1, "Ahmed", "Qaid", 20);
        let json = serde_json::to_string(&customer).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"firstName":"Ahmed","lastName":"Qaid","mark":20}"#
        );
    }

    #[test]
    fn test_customer_deserialize_minimal() {
        let customer: Customer = serde_json::from_str(r#"{"firstName":"Mona"}"#).unwrap();
        assert_eq!(customer.id, 0);
        assert_eq!(customer.first_name, "Mona");
        assert!(customer.last_name.is_none());
        assert!(customer.mark.is_none());
    }

    #[test]
    fn test_validate_blank_first_name() {
        let mut customer = Customer::new(1, "  ", "X", 1);
        assert!(matches!(customer.validate(), Err(CacheError::BadRequest(_))));
        customer.first_name = "Ali".to_string();
        assert!(customer.validate().is_ok());
    }

    #[test]
    fn test_cache_keys() {
        assert_eq!(CustomerCacheKeys::LIST, "CustomerList");
        assert_eq!(CustomerCacheKeys::item(42), "Customer-42");
    }
}

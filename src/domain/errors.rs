use std::collections::BTreeMap;

use thiserror::Error;

/// Field name -> human-readable messages, as returned to API clients.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Single-field validation failure.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        DomainError::Validation(errors)
    }

    pub fn unknown_product(product_id: i32) -> Self {
        DomainError::field(
            "products",
            format!("Invalid pk \"{product_id}\" - object does not exist."),
        )
    }
}

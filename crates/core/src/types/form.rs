//! Form validation shared by the catalog and checkout inputs.

use crate::EmailError;

/// A submitted form failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A required field was left empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email field does not hold an email address.
    #[error("invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Require a field to contain something other than whitespace.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::MissingField(field))
    } else {
        Ok(())
    }
}

//! Owner name validation for key registration

use thiserror::Error;

/// Errors that can occur when validating a key owner's name
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OwnerNameValidationError {
    #[error("Owner name cannot be empty")]
    Empty,

    #[error("Owner name exceeds maximum length of {0} characters")]
    TooLong(usize),

    #[error("Owner name contains a control character")]
    ControlCharacter,
}

const MAX_OWNER_NAME_LENGTH: usize = 100;

/// Validate the display label attached to an issued key
///
/// Rules:
/// - Cannot be empty or whitespace only
/// - Maximum 100 characters
/// - No control characters
pub fn validate_owner_name(name: &str) -> Result<(), OwnerNameValidationError> {
    if name.trim().is_empty() {
        return Err(OwnerNameValidationError::Empty);
    }

    if name.chars().count() > MAX_OWNER_NAME_LENGTH {
        return Err(OwnerNameValidationError::TooLong(MAX_OWNER_NAME_LENGTH));
    }

    if name.chars().any(char::is_control) {
        return Err(OwnerNameValidationError::ControlCharacter);
    }

    Ok(())
}

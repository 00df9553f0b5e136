//! Input validation for key generation requests.

/// Maximum owner name length, in characters.
pub const MAX_OWNER_NAME_LEN: usize = 255;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// A generate request was rejected before anything was persisted.
///
/// The messages are shown to the caller verbatim so they can correct the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("owner_name must be a non-empty string")]
    EmptyOwnerName,

    #[error("owner_name must be 1-255 characters")]
    OwnerNameTooLong,

    #[error("owner_name must contain only alphanumeric characters, hyphens, and underscores")]
    OwnerNameCharset,

    #[error("description must be 1000 characters or less")]
    DescriptionTooLong,
}

/// Validate an owner name.
///
/// Names must contain at least one alphanumeric character; hyphens and
/// underscores are allowed around them.
pub fn validate_owner_name(owner_name: &str) -> Result<(), ValidationError> {
    if owner_name.is_empty() {
        return Err(ValidationError::EmptyOwnerName);
    }
    if owner_name.chars().count() > MAX_OWNER_NAME_LEN {
        return Err(ValidationError::OwnerNameTooLong);
    }

    let allowed = owner_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    let has_alphanumeric = owner_name.chars().any(char::is_alphanumeric);

    if !allowed || !has_alphanumeric {
        return Err(ValidationError::OwnerNameCharset);
    }

    Ok(())
}

pub fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => {
            Err(ValidationError::DescriptionTooLong)
        }
        _ => Ok(()),
    }
}

/// Errors returned by registry operations.
///
/// Both variants carry the patient identifier the caller supplied so the menu can
/// report it back without holding on to its own copy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("patient ID {0} already exists")]
    AlreadyExists(String),
    #[error("no record found for patient ID {0}")]
    NotFound(String),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Errors raised while turning user text into a [`crate::Moment`].
#[derive(Debug, thiserror::Error)]
pub enum DateTimeError {
    #[error("invalid date/time {input:?} (expected YYYY-MM-DD HH:MM): {source}")]
    Invalid {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Non-empty text wrapper used for habit names
///
/// Wrapping the name in its own type means a constructed counter can never
/// carry an empty name - the check happens once, at the boundary.

use crate::domain::DomainError;

/// A string that is guaranteed to contain at least one character
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Create a non-empty text value, rejecting empty input
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.is_empty() {
            return Err(DomainError::EmptyName);
        }
        Ok(Self(text))
    }

    /// Borrow the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

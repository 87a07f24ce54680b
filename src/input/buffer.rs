//! Pending line text

use crate::error::InputError;

/// The not-yet-submitted line
///
/// Owned by the input loop and only touched from its handle step.
#[derive(Debug, Default)]
pub struct InputBuffer {
    text: String,
    /// Maximum length in characters
    limit: Option<usize>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer that rejects appends past `limit` characters
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            text: String::new(),
            limit,
        }
    }

    /// Append a text unit verbatim
    pub fn push_str(&mut self, unit: &str) -> Result<(), InputError> {
        if let Some(limit) = self.limit {
            if self.text.chars().count() + unit.chars().count() > limit {
                return Err(InputError::BufferFull {
                    limit,
                    token: unit.to_string(),
                });
            }
        }
        self.text.push_str(unit);
        Ok(())
    }

    /// Append a single space
    pub fn push_space(&mut self) -> Result<(), InputError> {
        self.push_str(" ")
    }

    /// Return the contents and leave the buffer empty
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

//! Enrollment ID (matrícula)
//!
//! Unique, human-assigned login identifier of an account.

use std::fmt;

use crate::error::{AuthError, AuthResult};

const MAX_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnrollmentId(String);

impl EnrollmentId {
    /// Trim and validate user input
    pub fn new(raw: &str) -> AuthResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AuthError::Validation("Matrícula é obrigatória".to_string()));
        }
        if trimmed.chars().count() > MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "Matrícula deve ter no máximo {} caracteres",
                MAX_LENGTH
            )));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(AuthError::Validation(
                "Matrícula não pode conter espaços".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Restore from storage without validation
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

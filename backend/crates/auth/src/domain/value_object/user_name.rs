//! User Name Value Object
//!
//! The account handle used for login and display.
//!
//! ## Rules
//! - NFKC normalization, trim, then lowercase. Only the lowercase form is
//!   stored, so uniqueness is case-insensitive.
//! - ASCII only: a-z, 0-9, `_`, `.`, `-`
//! - Length 3 to 30 after normalization
//! - Starts and ends with a letter, digit or `_`
//! - No consecutive dots

use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

/// Allowed special characters in user name
const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name cannot be empty")]
    Empty,

    #[error("User name is too short ({length} chars, minimum {min})")]
    TooShort { length: usize, min: usize },

    #[error("User name is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("Invalid character '{char}' at position {position}. Only a-z, 0-9, _, ., - are allowed")]
    InvalidCharacter { char: char, position: usize },

    #[error("User name must start and end with a-z, 0-9, or _")]
    InvalidBoundary,

    #[error("User name cannot contain consecutive dots (..)")]
    ConsecutiveDots,
}

/// Validated, lowercase user name
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    /// Normalize and validate raw input
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let canonical = input
            .as_ref()
            .nfkc()
            .collect::<String>()
            .trim()
            .to_lowercase();
        Self::validate(&canonical)?;
        Ok(Self(canonical))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(canonical: &str) -> Result<(), UserNameError> {
        if canonical.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = canonical.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        for (position, ch) in canonical.chars().enumerate() {
            if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ALLOWED_SPECIAL_CHARS.contains(&ch))
            {
                return Err(UserNameError::InvalidCharacter { char: ch, position });
            }
        }

        let boundary_ok = |c: Option<char>| {
            c.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        };
        if !boundary_ok(canonical.chars().next()) || !boundary_ok(canonical.chars().next_back()) {
            return Err(UserNameError::InvalidBoundary);
        }

        if canonical.contains("..") {
            return Err(UserNameError::ConsecutiveDots);
        }

        Ok(())
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserName").field(&self.0).finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

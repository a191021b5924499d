//! Email address type used by the login, registration and password-reset forms.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Reasons an email address is rejected before it is sent to the backend.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email is required")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must contain exactly one @")]
    BadAtCount,
    #[error("email must not contain spaces")]
    ContainsWhitespace,
    #[error("email is missing the part before @")]
    EmptyLocalPart,
    #[error("email domain is empty or has an empty label")]
    BadDomain,
}

/// A syntactically plausible email address.
///
/// Only cheap structural checks are made; the backend remains the authority
/// on whether an account exists. Leading and trailing whitespace is trimmed,
/// since pasted addresses often carry it.
///
/// ```
/// use hris_core::Email;
///
/// assert_eq!(Email::parse("  hr@acme.co.id ").unwrap().as_str(), "hr@acme.co.id");
/// assert!(Email::parse("admin@localhost").is_ok());
/// assert!(Email::parse("hr@acme..com").is_err());
/// assert!(Email::parse("h r@acme.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Parse and trim an email address.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first structural problem found.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        let mut parts = s.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(EmailError::BadAtCount);
        };
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        // Single-label hosts such as `localhost` are fine.
        if domain.split('.').any(str::is_empty) {
            return Err(EmailError::BadDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// The address as entered, minus surrounding whitespace.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_common_addresses() {
        assert!(Email::parse("budi@perusahaan.co.id").is_ok());
        assert!(Email::parse("first.last+hr@example.com").is_ok());
    }

    #[test]
    fn test_parse_accepts_single_label_domain() {
        assert_eq!(Email::parse("admin@localhost").unwrap().as_str(), "admin@localhost");
        assert!(Email::parse("hr@intranet").is_ok());
    }

    #[test]
    fn test_parse_trims() {
        let email = Email::parse("\tadmin@example.com  ").unwrap();
        assert_eq!(email.as_str(), "admin@example.com");
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        assert_eq!(Email::parse("a@b@c.com"), Err(EmailError::BadAtCount));
        assert_eq!(Email::parse("nobody"), Err(EmailError::BadAtCount));
        assert_eq!(Email::parse("@example.com"), Err(EmailError::EmptyLocalPart));
        assert_eq!(Email::parse("user@"), Err(EmailError::BadDomain));
        assert_eq!(Email::parse("user@example."), Err(EmailError::BadDomain));
        assert_eq!(Email::parse("user@.example.com"), Err(EmailError::BadDomain));
        assert_eq!(Email::parse("user@example..com"), Err(EmailError::BadDomain));
        assert_eq!(
            Email::parse("us er@example.com"),
            Err(EmailError::ContainsWhitespace)
        );
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { .. })));
    }
}

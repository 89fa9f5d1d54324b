/*!
 * Credentials
 * Login/password pair attached to a locator
 */

use std::fmt;

use crate::core::limits::PASSWORD_MASK_CHAR;

/// Login and password
///
/// Equality is exact (case-sensitive) on both fields; use [`Credentials::matches`]
/// to compare case-insensitively.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Credentials {
    login: String,
    password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    #[inline]
    pub fn login(&self) -> &str {
        &self.login
    }

    #[inline]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// True if both login and password are empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.login.is_empty() && self.password.is_empty()
    }

    /// Password with every character replaced by the mask character
    pub fn masked_password(&self) -> String {
        std::iter::repeat(PASSWORD_MASK_CHAR)
            .take(self.password.chars().count())
            .collect()
    }

    /// Compare with another pair, optionally ignoring case
    #[must_use]
    pub fn matches(&self, other: &Credentials, case_sensitive: bool) -> bool {
        if case_sensitive {
            self == other
        } else {
            self.login.to_lowercase() == other.login.to_lowercase()
                && self.password.to_lowercase() == other.password.to_lowercase()
        }
    }
}

// Never print the password
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &self.masked_password())
            .finish()
    }
}

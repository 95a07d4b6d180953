//! Sign-in credentials.

use std::fmt;

/// Email and password used to open a session.
///
/// The password is never exposed in Debug output.
///
/// # Example
///
/// ```
/// use talentgate_core::Credentials;
///
/// let creds = Credentials::new("reviewer@example.org", "hunter2");
/// assert_eq!(creds.email(), "reviewer@example.org");
/// ```
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Returns the account email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing the sign-in request.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

//! Login and registration credentials.
//!
//! Credentials are transient: they are built from user input, sent once, and
//! dropped. The password is held as a [`SecretString`] so it never shows up
//! in `Debug` output or logs.

use secrecy::{ExposeSecret, SecretString};

use super::validation::{ValidationError, require};

/// Username and password for a single login or registration call.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Build credentials, requiring both fields to be present.
    ///
    /// The username is trimmed. The password is kept as typed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if either field is blank.
    pub fn new(username: &str, password: SecretString) -> Result<Self, ValidationError> {
        let username = require(username, "username")?;
        if password.expose_secret().is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        Ok(Self {
            username: username.to_owned(),
            password,
        })
    }

    /// The username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password.
    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A new account request: credentials plus a confirmed password.
#[derive(Debug, Clone)]
pub struct Registration {
    credentials: Credentials,
}

impl Registration {
    /// Minimum password length accepted for new accounts.
    pub const MIN_PASSWORD_LENGTH: usize = 6;

    /// Validate a registration form.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingField`] if any field is blank
    /// - [`ValidationError::PasswordMismatch`] if the confirmation differs
    /// - [`ValidationError::PasswordTooShort`] if the password is too short
    pub fn new(
        username: &str,
        password: SecretString,
        confirm_password: &SecretString,
    ) -> Result<Self, ValidationError> {
        let credentials = Credentials::new(username, password)?;
        if confirm_password.expose_secret().is_empty() {
            return Err(ValidationError::MissingField("confirm password"));
        }

        let password = credentials.password.expose_secret();

        if password != confirm_password.expose_secret() {
            return Err(ValidationError::PasswordMismatch);
        }

        if password.chars().count() < Self::MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: Self::MIN_PASSWORD_LENGTH,
            });
        }

        Ok(Self { credentials })
    }

    /// The validated credentials to send to the service.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Consume the registration and return its credentials.
    #[must_use]
    pub fn into_credentials(self) -> Credentials {
        self.credentials
    }
}

//! Credential verification against a fixed reference pair.
//!
//! There is no user store: the verifier holds exactly one accepted
//! email/password pair, supplied at startup.

use thiserror::Error;

/// Email/password pair presented by a caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthzError {
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Accepts only the reference pair it was built with.
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    reference: Credentials,
}

impl CredentialVerifier {
    pub fn new(reference: Credentials) -> Self {
        Self { reference }
    }

    /// Succeeds when both fields match the reference pair exactly.
    pub fn verify(&self, presented: &Credentials) -> Result<(), AuthzError> {
        let email_matches = presented.email == self.reference.email;
        let password_matches = presented.password == self.reference.password;

        if email_matches && password_matches {
            tracing::debug!(target: "inout-authz", email = %presented.email, "credentials accepted");
            Ok(())
        } else {
            tracing::warn!(target: "inout-authz", email = %presented.email, "credentials rejected");
            Err(AuthzError::InvalidCredentials)
        }
    }
}

//! Domain service for user accounts: registration and login.

use thiserror::Error;

use crate::services::token::TokenError;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already exists.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Conflict(String),

    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        if crate::db::is_unique_violation(&err) {
            Self::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string())
        } else {
            Self::Database(err.to_string())
        }
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TokenError> for AccountError {
    fn from(err: TokenError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Creates the account and returns a signed token for it.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Conflict`] if the email is taken.
    async fn register(&self, email: &str, name: &str, password: &str)
    -> Result<String, AccountError>;

    /// Checks the credentials and returns a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] if the email is unknown or
    /// the password does not match.
    async fn login(&self, email: &str, password: &str) -> Result<String, AccountError>;
}

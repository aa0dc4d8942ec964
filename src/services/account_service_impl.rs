//! `SeaORM` implementation of the `AccountService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::db::repositories::user::{hash_password, verify_password};
use crate::services::account_service::{AccountError, AccountService, DUPLICATE_EMAIL_MESSAGE};
use crate::services::token::TokenService;

pub struct SeaOrmAccountService {
    store: Store,
    tokens: TokenService,
    security: SecurityConfig,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store, tokens: TokenService, security: SecurityConfig) -> Self {
        Self {
            store,
            tokens,
            security,
        }
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<String, AccountError> {
        let users = self.store.users();

        if users.get_by_email(email).await?.is_some() {
            return Err(AccountError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let password = password.to_string();
        let security = self.security.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password(&password, Some(&security)))
                .await
                .map_err(|e| AccountError::Internal(format!("Hashing task failed: {e}")))??;

        // Losing a race to another registration trips the unique index,
        // which `From<DbErr>` maps to the same Conflict.
        let user = users.create(email, name, password_hash).await?;

        info!(user_id = user.id, "User registered");

        Ok(self.tokens.issue(&user)?)
    }

    async fn login(&self, email: &str, password: &str) -> Result<String, AccountError> {
        let Some((user, password_hash)) =
            self.store.users().get_by_email_with_password(email).await?
        else {
            warn!("Login failed");
            return Err(AccountError::InvalidCredentials);
        };

        let password = password.to_string();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password_hash, &password))
            .await
            .map_err(|e| AccountError::Internal(format!("Verification task failed: {e}")))??;

        if !valid {
            warn!("Login failed");
            return Err(AccountError::InvalidCredentials);
        }

        Ok(self.tokens.issue(&user)?)
    }
}

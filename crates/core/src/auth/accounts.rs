use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;
use crate::content::validate::{is_blank, ValidationError};
use crate::error::{ContentError, ContentResult};
use crate::store::KvStore;

pub const ACCOUNT_PREFIX: &str = "account:";
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Admin account stored under `account:{email}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Account fields safe to return to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Payload for provisioning an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAccount {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

fn account_key(email: &str) -> String {
    format!("{ACCOUNT_PREFIX}{}", normalize_email(email))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_new_account(input: &NewAccount) -> Result<(), ValidationError> {
    let email = input.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(ValidationError::MalformedEmail),
    }
    if input.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::WeakPassword(MIN_PASSWORD_LENGTH));
    }
    if is_blank(&input.name) {
        return Err(ValidationError::MissingName);
    }
    Ok(())
}

/// Provisions admin accounts and verifies their passwords.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn KvStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Whether any account has been provisioned yet.
    pub async fn has_accounts(&self) -> ContentResult<bool> {
        Ok(!self.store.scan_prefix(ACCOUNT_PREFIX).await?.is_empty())
    }

    /// First-run setup: create the initial admin. Refused once any account exists.
    ///
    /// The existence check and the write are separate store calls, so two
    /// concurrent first-run requests can both pass the check and each create an
    /// admin. Accepted: setup is a one-time operator step.
    pub async fn setup(&self, input: NewAccount) -> ContentResult<Account> {
        if self.has_accounts().await? {
            return Err(ContentError::Forbidden(
                "initial setup has already been completed".into(),
            ));
        }
        self.provision(input).await
    }

    /// Create an account with a hashed password.
    pub async fn provision(&self, input: NewAccount) -> ContentResult<Account> {
        validate_new_account(&input)?;

        let key = account_key(&input.email);
        if self.store.get(&key).await?.is_some() {
            return Err(ContentError::Conflict(format!(
                "account {} already exists",
                normalize_email(&input.email)
            )));
        }

        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ContentError::Internal(format!("hashing task failed: {e}")))??;

        let account = Account {
            id: Uuid::now_v7().to_string(),
            email: normalize_email(&input.email),
            name: input.name.trim().to_string(),
            password_hash,
            created_at: Utc::now(),
        };

        self.store.set(&key, serde_json::to_value(&account)?).await?;
        tracing::info!(account_id = %account.id, "account provisioned");
        Ok(account)
    }

    /// Check credentials. Unknown email and wrong password are indistinguishable.
    pub async fn login(&self, email: &str, password: &str) -> ContentResult<Account> {
        let Some(value) = self.store.get(&account_key(email)).await? else {
            return Err(AuthError::InvalidLogin.into());
        };
        let account: Account = serde_json::from_value(value)?;

        let hash = account.password_hash.clone();
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| ContentError::Internal(format!("verification task failed: {e}")))?;

        if verified {
            Ok(account)
        } else {
            Err(AuthError::InvalidLogin.into())
        }
    }
}

fn hash_password(password: &str) -> ContentResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ContentError::Internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

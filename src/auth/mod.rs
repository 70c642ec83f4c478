//! Email/password accounts against a Firebase Identity Toolkit
//! compatible REST API.

use std::time::Duration;

use anyhow::{Error, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::core::AppConfig;
use crate::kv::{KvStore, StorageKey};

/// The signed in user. Passed explicitly to everything that reads or
/// writes per-user data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl Session {
    /// A session for a user id that was authenticated elsewhere.
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: None,
            id_token: None,
        }
    }

    /// Name shown in greetings, the part of the email before the `@`.
    pub fn display_name(&self) -> &str {
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("User")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignUp,
    SignIn,
}

impl AuthAction {
    fn endpoint(&self) -> &'static str {
        match self {
            AuthAction::SignUp => "accounts:signUp",
            AuthAction::SignIn => "accounts:signInWithPassword",
        }
    }

    fn missing_fields_message(&self) -> &'static str {
        match self {
            AuthAction::SignUp => "Please fill in all fields",
            AuthAction::SignIn => "Please enter email and password",
        }
    }

    pub fn failure_title(&self) -> &'static str {
        match self {
            AuthAction::SignUp => "Signup Failed",
            AuthAction::SignIn => "Login Failed",
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: Option<String>,
    id_token: Option<String>,
}

#[derive(Clone, Debug)]
pub struct IdentityClient {
    api_hostname: String,
    api_key: String,
}

impl IdentityClient {
    pub fn new(api_hostname: &str, api_key: &str) -> Self {
        Self {
            api_hostname: api_hostname.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.identity_api_hostname, &config.identity_api_key)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, Error> {
        self.authenticate(AuthAction::SignUp, email, password).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, Error> {
        self.authenticate(AuthAction::SignIn, email, password).await
    }

    /// Provider errors come back with the provider's message as is
    /// (e.g. `INVALID_PASSWORD`) so they can be shown to the user.
    pub async fn authenticate(
        &self,
        action: AuthAction,
        email: &str,
        password: &str,
    ) -> Result<Session, Error> {
        validate_credentials(action, email, password)?;

        let url = format!("{}/v1/{}", self.api_hostname, action.endpoint());
        tracing::debug!("Authenticating {} via {}", email, url);

        let resp = reqwest::Client::new()
            .post(url)
            .query(&[("key", &self.api_key)])
            .timeout(Duration::from_secs(30))
            .json(&json!({
                "email": email.trim(),
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp.json().await?;
        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| format!("Identity provider returned {}", status));
            return Err(anyhow!(message));
        }

        let account: AccountResponse = serde_json::from_value(body)?;
        Ok(Session {
            user_id: account.local_id,
            email: account.email.or_else(|| Some(email.trim().to_string())),
            id_token: account.id_token,
        })
    }
}

/// Both fields are required before the provider is contacted.
pub fn validate_credentials(action: AuthAction, email: &str, password: &str) -> Result<(), Error> {
    if email.trim().is_empty() || password.is_empty() {
        bail!(action.missing_fields_message());
    }
    Ok(())
}

/// The session the CLI is signed in with, if any.
pub async fn current_session(kv: &impl KvStore) -> Result<Option<Session>, Error> {
    match kv.get(&StorageKey::CurrentUser).await? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub async fn save_session(kv: &impl KvStore, session: &Session) -> Result<(), Error> {
    kv.set(&StorageKey::CurrentUser, &serde_json::to_string(session)?)
        .await
}

pub async fn sign_out(kv: &impl KvStore) -> Result<(), Error> {
    kv.remove(&StorageKey::CurrentUser).await
}

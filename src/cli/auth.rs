use anyhow::{Result, anyhow};

use super::open_kv;
use crate::auth::{
    AuthAction, IdentityClient, Session, current_session, save_session, sign_out,
};
use crate::core::AppConfig;
use crate::kv::SqliteKv;

async fn authenticate(
    config: &AppConfig,
    action: AuthAction,
    email: &str,
    password: &str,
) -> Result<()> {
    let client = IdentityClient::from_config(config);
    let session = client
        .authenticate(action, email, password)
        .await
        .map_err(|e| anyhow!("{}: {}", action.failure_title(), e))?;

    let kv = open_kv(config).await?;
    save_session(&kv, &session).await?;
    println!("Hello {}", session.display_name());
    Ok(())
}

pub async fn signup(config: &AppConfig, email: &str, password: &str) -> Result<()> {
    authenticate(config, AuthAction::SignUp, email, password).await
}

pub async fn login(config: &AppConfig, email: &str, password: &str) -> Result<()> {
    authenticate(config, AuthAction::SignIn, email, password).await
}

pub async fn logout(config: &AppConfig) -> Result<()> {
    let kv = open_kv(config).await?;
    sign_out(&kv).await?;
    println!("Signed out");
    Ok(())
}

pub async fn profile(config: &AppConfig) -> Result<()> {
    let kv = open_kv(config).await?;
    let session = require_session(&kv).await?;
    println!("{}", session.display_name());
    if let Some(email) = &session.email {
        println!("{}", email);
    }
    Ok(())
}

/// The signed in session or an error telling the user to log in.
pub async fn require_session(kv: &SqliteKv) -> Result<Session> {
    current_session(kv)
        .await?
        .ok_or(anyhow!("Not signed in. Run `login` or `signup` first."))
}

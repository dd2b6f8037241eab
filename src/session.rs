//! The signed-in principal.
//!
//! The session is an explicit object handed to whoever needs it, created
//! on sign-in and consumed on sign-out. It installs the bearer token into
//! the shared HTTP client and derives per-event [`Viewer`] snapshots for
//! the access resolver.

use crate::client::{self, Client, Event, LoginParams, LoginResponse, Viewer};
use anyhow::Result;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Session {
    pub user: String,
    pub access: i32,
    token: String,
    refresh_token: String,
}

impl Session {
    /// Signs in with a password or a saved refresh token.
    pub async fn init(params: LoginParams<'_>) -> Result<Self> {
        let resp = Client::login(params).await?;
        info!("signed in as {}", resp.user);
        Ok(Self::from_login(resp))
    }

    pub fn from_login(resp: LoginResponse) -> Self {
        Self {
            user: resp.user,
            access: resp.access,
            token: resp.token,
            refresh_token: resp.refresh_token,
        }
    }

    /// The token to persist for the next sign-in.
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Signs out and clears the installed token. The session is consumed;
    /// there is no half-authenticated state to revive.
    pub async fn teardown(self) -> Result<()> {
        Client::logout().await?;
        info!("signed out");
        Ok(())
    }

    /// Drops local credentials without calling the store, for when the
    /// transport is already gone.
    pub fn discard(self) -> Result<()> {
        client::set_access_token(None)
    }

    pub fn viewer(&self, event: &Event) -> Viewer {
        Viewer::for_event(self.user.clone(), self.access, event)
    }
}

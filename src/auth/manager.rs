use std::{sync::Arc, time::Duration};

use crate::{config::Auth as AuthConfig, error::AuthError};

use super::{
    RandomTokenGenerator, SessionStore, StaticCredentials,
    credential::{CredentialVerifier, HashedCredentials, Identity},
    token::TokenGenerator,
};

/// Orchestrates the session lifecycle: login mints a token, every protected
/// request resolves it back to an identity, logout revokes it. Each token
/// moves through `absent -> active -> (expired | revoked)`; the two terminal
/// states read back exactly like `absent`.
pub struct SessionManager {
    verifier: Arc<dyn CredentialVerifier>,
    store: Arc<dyn SessionStore>,
    tokens: Arc<dyn TokenGenerator>,
    ttl: Duration,
    key_prefix: String,
}

#[derive(Debug)]
pub struct SessionToken {
    pub token: String,
    pub identity: Identity,
}

impl SessionManager {
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        store: Arc<dyn SessionStore>,
        tokens: Arc<dyn TokenGenerator>,
        ttl: Duration,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            store,
            tokens,
            ttl,
            key_prefix: key_prefix.into(),
        }
    }

    pub fn from_config(
        config: &AuthConfig,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, String> {
        let verifier: Arc<dyn CredentialVerifier> = if config.hashed_credentials {
            Arc::new(HashedCredentials::new(config.credentials.clone())?)
        } else {
            Arc::new(StaticCredentials::new(config.credentials.clone()))
        };

        Ok(Self::new(
            verifier,
            store,
            Arc::new(RandomTokenGenerator),
            Duration::from_secs(config.ttl_seconds),
            config.token_key_prefix.clone(),
        ))
    }

    /// Verifies the credentials, then mints a fresh token and stores it with
    /// a fixed TTL. Verifier failures propagate untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionToken, AuthError> {
        let identity = self.verifier.verify(username, password)?;
        let token = self.tokens.generate();
        self.store
            .put(&self.store_key(&token), identity.as_str(), self.ttl)
            .await?;
        info!("session opened for {}", identity);
        Ok(SessionToken { token, identity })
    }

    /// Resolves a token to its identity. Never-issued, expired and revoked
    /// tokens all fail the same way, and the lookup leaves the session
    /// untouched: expiry is fixed at creation, not renewed on use.
    pub async fn check_token(&self, token: &str) -> Result<Identity, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::AuthRequired);
        }
        match self.store.get(&self.store_key(token)).await? {
            Some(user) => Ok(Identity::from_normalized(user)),
            None => Err(AuthError::AuthRequired),
        }
    }

    /// Revokes a token. Unconditionally idempotent: revoking an absent,
    /// expired or already-revoked token is not an error, and a store failure
    /// is not the caller's problem either.
    pub async fn logout(&self, token: &str) {
        let token = token.trim();
        if token.is_empty() {
            return;
        }
        if let Err(err) = self.store.delete(&self.store_key(token)).await {
            warn!("failed to delete session on logout: {err}");
        }
    }

    // Sessions share the store with unrelated cached data, so tokens are
    // namespaced under a fixed, caller-invisible prefix.
    fn store_key(&self, token: &str) -> String {
        format!("{}{}", self.key_prefix, token)
    }
}

use std::{collections::HashMap, fmt};

use argon2::{
    Argon2,
    password_hash::{PasswordHashString, PasswordVerifier},
};
use serde::Serialize;
use subtle::ConstantTimeEq;

use crate::error::AuthError;

/// Normalized username of an authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Checks a username/password pair against a source of truth. The session
/// manager only depends on this contract, so deployments can swap the static
/// table for an external identity provider.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> Result<Identity, AuthError>;
}

/// Username -> plaintext secret, loaded once at startup. A deliberate
/// tradeoff for small internal tools where access to the configuration is
/// already trusted; use [`HashedCredentials`] otherwise.
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new(users: HashMap<String, String>) -> Self {
        let users = users
            .into_iter()
            .map(|(username, secret)| (normalize(&username), secret))
            .collect();
        Self { users }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let username = normalize(username);
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput);
        }
        let Some(secret) = self.users.get(&username) else {
            return Err(AuthError::InvalidCredentials);
        };
        if secret.as_bytes().ct_eq(password.as_bytes()).into() {
            Ok(Identity(username))
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Same contract over argon2 PHC strings instead of plaintext secrets.
pub struct HashedCredentials {
    users: HashMap<String, PasswordHashString>,
}

impl HashedCredentials {
    pub fn new(users: HashMap<String, String>) -> Result<Self, String> {
        let mut parsed = HashMap::with_capacity(users.len());
        for (username, hash) in users {
            let hash = PasswordHashString::new(&hash)
                .map_err(|err| format!("invalid password hash for {username}: {err}"))?;
            parsed.insert(normalize(&username), hash);
        }
        Ok(Self { users: parsed })
    }
}

impl CredentialVerifier for HashedCredentials {
    fn verify(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let username = normalize(username);
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput);
        }
        let Some(hash) = self.users.get(&username) else {
            return Err(AuthError::InvalidCredentials);
        };
        let parsed_hash = hash.password_hash();
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;
        Ok(Identity(username))
    }
}

use crate::config::AuthConfig;
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Injected authentication capability guarding session creation. Swapping
/// the implementation (directory service, token introspection) never touches
/// the pipeline.
pub trait CredentialGate: Debug + Send + Sync {
    fn authenticate(&self, credentials: &Credentials) -> bool;
}

/// Gate backed by the configured username/password pair.
#[derive(Clone)]
pub struct ConfiguredCredentialGate {
    username: String,
    password: String,
}

impl ConfiguredCredentialGate {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }
}

impl Debug for ConfiguredCredentialGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredCredentialGate")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl CredentialGate for ConfiguredCredentialGate {
    fn authenticate(&self, credentials: &Credentials) -> bool {
        credentials.username == self.username && credentials.password == self.password
    }
}

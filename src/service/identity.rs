//! Identity collaborator: bearer credential to stable user id.

use crate::models::UserId;
use std::collections::HashMap;

/// Resolves a caller's credential. Used only for ownership checks.
pub trait IdentityProvider: Send + Sync {
    fn user_id(&self, credential: &str) -> Option<UserId>;
}

/// Fixed credential table, for tests and the event runner.
#[derive(Clone, Debug, Default)]
pub struct StaticIdentity {
    tokens: HashMap<String, UserId>,
}

impl StaticIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, credential: impl Into<String>, user: impl Into<UserId>) -> Self {
        self.tokens.insert(credential.into(), user.into());
        self
    }
}

impl IdentityProvider for StaticIdentity {
    fn user_id(&self, credential: &str) -> Option<UserId> {
        self.tokens.get(credential).cloned()
    }
}

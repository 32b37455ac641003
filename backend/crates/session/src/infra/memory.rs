//! In-memory principal directory
//!
//! Used by tests and local development. Lookups are case-insensitive on the
//! identifier and the email address, identifier first.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use platform::password::{ClearTextSecret, HashedSecret};

use crate::domain::entity::principal::Principal;
use crate::domain::repository::PrincipalDirectory;
use crate::domain::value_object::principal_id::PrincipalId;
use crate::error::{SessionError, SessionResult};

#[derive(Debug, Default)]
struct Inner {
    principals: HashMap<PrincipalId, (Principal, HashedSecret)>,
    by_identifier: HashMap<String, PrincipalId>,
    by_email: HashMap<String, PrincipalId>,
}

/// Principal directory held in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryPrincipalDirectory {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryPrincipalDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a principal reachable by `identifier` (and its email, if any)
    pub fn insert(
        &self,
        principal: Principal,
        identifier: &str,
        secret: &str,
    ) -> SessionResult<()> {
        let hashed = ClearTextSecret::new(secret.to_string())
            .map_err(|e| SessionError::Internal(e.to_string()))?
            .hash()
            .map_err(|e| SessionError::Internal(e.to_string()))?;

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner
            .by_identifier
            .insert(identifier.to_lowercase(), principal.id);
        if let Some(email) = &principal.email {
            inner.by_email.insert(email.to_lowercase(), principal.id);
        }
        inner.principals.insert(principal.id, (principal, hashed));

        Ok(())
    }

    /// Mark a principal's email confirmed; false when unknown or without email
    pub fn confirm_email(&self, id: PrincipalId) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner
            .principals
            .get_mut(&id)
            .is_some_and(|(principal, _)| principal.confirm_email())
    }
}

impl PrincipalDirectory for InMemoryPrincipalDirectory {
    async fn authenticate(
        &self,
        identifier: &str,
        secret: &ClearTextSecret,
    ) -> SessionResult<Option<Principal>> {
        let found = {
            let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            let needle = identifier.to_lowercase();
            // An identifier match beats another principal's email
            inner
                .by_identifier
                .get(&needle)
                .or_else(|| inner.by_email.get(&needle))
                .and_then(|id| inner.principals.get(id))
                .cloned()
        };

        match found {
            Some((principal, hashed)) if hashed.verify(secret) => Ok(Some(principal)),
            Some(_) => Ok(None),
            None => {
                HashedSecret::burn(secret);
                Ok(None)
            }
        }
    }

    async fn find_by_id(&self, id: PrincipalId) -> SessionResult<Option<Principal>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.principals.get(&id).map(|(principal, _)| principal.clone()))
    }
}

//! Repository Traits
//!
//! Interfaces onto the external user store. Implementations are in the
//! infrastructure layer.

use platform::password::ClearTextSecret;

use crate::domain::entity::principal::Principal;
use crate::domain::value_object::principal_id::PrincipalId;
use crate::error::SessionResult;

/// Principal directory trait
#[trait_variant::make(PrincipalDirectory: Send)]
pub trait LocalPrincipalDirectory {
    /// Resolve a principal from an identifier (user name or email) and secret.
    ///
    /// Returns `Ok(None)` for both an unknown identifier and a wrong secret.
    async fn authenticate(
        &self,
        identifier: &str,
        secret: &ClearTextSecret,
    ) -> SessionResult<Option<Principal>>;

    /// Find principal by ID
    async fn find_by_id(&self, id: PrincipalId) -> SessionResult<Option<Principal>>;
}

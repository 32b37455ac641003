//! Principal Entity
//!
//! An authenticated party as seen by this service. The external user store
//! owns the record; this service only reads it.

use crate::domain::value_object::{principal_id::PrincipalId, role::Role};

/// Principal entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// External store id
    pub id: PrincipalId,
    /// Role at lookup time
    pub role: Role,
    /// Display name
    pub name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Whether the email address has been confirmed
    pub email_confirmed: bool,
}

impl Principal {
    /// Create a principal with no profile attributes
    pub fn new(id: PrincipalId, role: Role) -> Self {
        Self {
            id,
            role,
            name: None,
            email: None,
            email_confirmed: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach an (unconfirmed) email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self.email_confirmed = false;
        self
    }

    /// Mark the email as confirmed; returns false when there is no email
    pub fn confirm_email(&mut self) -> bool {
        if self.email.is_none() {
            return false;
        }
        self.email_confirmed = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_principal_is_unconfirmed() {
        let p = Principal::new(PrincipalId::new(1), Role::User).with_email("a@example.com");
        assert!(!p.email_confirmed);
    }

    #[test]
    fn test_confirm_requires_email() {
        let mut bare = Principal::new(PrincipalId::new(1), Role::User);
        assert!(!bare.confirm_email());
        assert!(!bare.email_confirmed);

        let mut p = bare.with_email("a@example.com");
        assert!(p.confirm_email());
        assert!(p.email_confirmed);
    }
}

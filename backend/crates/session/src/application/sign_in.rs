//! Sign In Use Case
//!
//! Resolves a principal through the directory and issues a token pair.

use std::sync::Arc;

use platform::password::ClearTextSecret;

use crate::application::token_issuer::TokenIssuer;
use crate::domain::entity::{principal::Principal, token::TokenPair};
use crate::domain::repository::PrincipalDirectory;
use crate::error::{SessionError, SessionResult};

/// Longest identifier (user name or email) accepted before hitting the directory
const MAX_IDENTIFIER_LENGTH: usize = 254;

/// Sign in input
pub struct SignInInput {
    /// User name or email
    pub identifier: String,
    /// Secret
    pub secret: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub principal: Principal,
    pub tokens: TokenPair,
}

/// Sign in use case
pub struct SignInUseCase<D>
where
    D: PrincipalDirectory,
{
    directory: Arc<D>,
    issuer: Arc<TokenIssuer>,
}

impl<D> SignInUseCase<D>
where
    D: PrincipalDirectory,
{
    pub fn new(directory: Arc<D>, issuer: Arc<TokenIssuer>) -> Self {
        Self { directory, issuer }
    }

    pub async fn execute(&self, input: SignInInput) -> SessionResult<SignInOutput> {
        let identifier = input.identifier.trim();
        if identifier.is_empty() || identifier.len() > MAX_IDENTIFIER_LENGTH {
            return Err(SessionError::InvalidCredentials);
        }

        let secret =
            ClearTextSecret::new(input.secret).map_err(|_| SessionError::InvalidCredentials)?;

        let principal = self
            .directory
            .authenticate(identifier, &secret)
            .await?
            .ok_or(SessionError::InvalidCredentials)?;

        let tokens = self.issuer.issue(&principal)?;

        tracing::info!(
            principal_id = %principal.id,
            role = %principal.role,
            "Principal signed in"
        );

        Ok(SignInOutput { principal, tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::SessionConfig;
    use crate::domain::value_object::{
        principal_id::PrincipalId, role::Role, token_kind::TokenKind,
    };
    use crate::infra::memory::InMemoryPrincipalDirectory;
    use platform::clock::SystemClock;
    use platform::crypto::SigningKey;

    fn use_case() -> SignInUseCase<InMemoryPrincipalDirectory> {
        let directory = InMemoryPrincipalDirectory::new();
        directory
            .insert(
                Principal::new(PrincipalId::new(1), Role::User).with_name("u1"),
                "u1",
                "correct horse",
            )
            .unwrap();

        let issuer = TokenIssuer::new(
            &SessionConfig::new(SigningKey::random()),
            Arc::new(SystemClock),
        );
        SignInUseCase::new(Arc::new(directory), Arc::new(issuer))
    }

    fn input(identifier: &str, secret: &str) -> SignInInput {
        SignInInput {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_issues_tokens() {
        let uc = use_case();
        let out = uc.execute(input("u1", "correct horse")).await.unwrap();

        assert_eq!(out.principal.id, PrincipalId::new(1));
        let verified = uc
            .issuer
            .verify(&out.tokens.access_token, TokenKind::Access)
            .unwrap();
        assert_eq!(verified.principal_id, PrincipalId::new(1));
    }

    #[tokio::test]
    async fn test_unknown_identifier_and_wrong_secret_look_the_same() {
        let uc = use_case();

        let unknown = uc.execute(input("nobody", "correct horse")).await.unwrap_err();
        let wrong = uc.execute(input("u1", "battery staple")).await.unwrap_err();

        assert!(matches!(unknown, SessionError::InvalidCredentials));
        assert!(matches!(wrong, SessionError::InvalidCredentials));
        assert_eq!(unknown.to_app_error().message(), wrong.to_app_error().message());
    }

    #[tokio::test]
    async fn test_blank_input_is_invalid_credentials() {
        let uc = use_case();
        assert!(matches!(
            uc.execute(input("   ", "correct horse")).await,
            Err(SessionError::InvalidCredentials)
        ));
        assert!(matches!(
            uc.execute(input("u1", "")).await,
            Err(SessionError::InvalidCredentials)
        ));
    }
}

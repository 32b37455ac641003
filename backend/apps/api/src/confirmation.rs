//! Confirmation Check
//!
//! Adapts the principal directory to the notify crate: a subscriber key is a
//! principal id, and the watched state is "email confirmed".

use notify::{CheckOutcome, StatusCheck, SubscriberKey};
use session::domain::repository::PrincipalDirectory;
use session::models::principal_id::PrincipalId;

#[derive(Debug, Clone)]
pub struct EmailConfirmationCheck<D> {
    directory: D,
}

impl<D> EmailConfirmationCheck<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }
}

impl<D> StatusCheck for EmailConfirmationCheck<D>
where
    D: PrincipalDirectory + Send + Sync,
{
    async fn check(&self, key: &SubscriberKey) -> CheckOutcome {
        let Ok(id) = key.as_str().parse::<PrincipalId>() else {
            return CheckOutcome::NotFound;
        };

        match self.directory.find_by_id(id).await {
            Ok(Some(principal)) if principal.email_confirmed => CheckOutcome::Confirmed,
            Ok(Some(_)) => CheckOutcome::Pending,
            Ok(None) => CheckOutcome::NotFound,
            Err(e) => CheckOutcome::TransientError(e.to_string()),
        }
    }
}

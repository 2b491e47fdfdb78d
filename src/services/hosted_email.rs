//! Hosted email accounts on the shared-hosting platform.
//!
//! Unlike the best-effort provisioning run, creating a hosted account is
//! all-or-nothing: if the remote mailbox is created but the local record
//! cannot be saved, the remote mailbox is deleted again so the two sides
//! never drift apart silently.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    db::{DbError, DbPool},
    models::{
        CreateEmailAccount, Department, EmailAccount, EmailAccountStatus, Platform, TeamMember,
        credentials,
    },
    platforms::{HostedMailboxClient, MailboxRequest, PlatformError},
};

#[derive(Debug, Error)]
pub enum HostedEmailError {
    #[error("No enabled cpanel configuration found")]
    NotConfigured,

    #[error("No email account found")]
    NotFound,

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The remote mailbox was created but the local record was not; the
    /// mailbox has been rolled back (or the rollback failure logged).
    #[error("Failed to save email account to database: {0}")]
    Persistence(#[source] DbError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// A freshly created hosted account, password included for one-time
/// handover.
#[derive(Debug, Clone)]
pub struct HostedAccount {
    pub account: EmailAccount,
    pub password: String,
}

#[derive(Clone)]
pub struct HostedEmailService {
    db: Arc<DbPool>,
    client: Option<Arc<dyn HostedMailboxClient>>,
    domain: Option<String>,
}

impl HostedEmailService {
    pub fn new(db: Arc<DbPool>, client: Option<(Arc<dyn HostedMailboxClient>, String)>) -> Self {
        let (client, domain) = match client {
            Some((client, domain)) => (Some(client), Some(domain)),
            None => (None, None),
        };
        Self { db, client, domain }
    }

    fn client(&self) -> Result<(&Arc<dyn HostedMailboxClient>, &str), HostedEmailError> {
        match (&self.client, &self.domain) {
            (Some(client), Some(domain)) => Ok((client, domain)),
            _ => Err(HostedEmailError::NotConfigured),
        }
    }

    /// Create a hosted mailbox and record it locally.
    ///
    /// Remote creation happens first; a persistence failure afterwards
    /// triggers a compensating delete of the remote mailbox, preferring
    /// the address the platform confirmed over recomputing it. The
    /// original persistence error is returned either way.
    #[tracing::instrument(skip(self, member, department), fields(member_id = %member.id))]
    pub async fn create_account(
        &self,
        member: &TeamMember,
        department: Option<&Department>,
    ) -> Result<HostedAccount, HostedEmailError> {
        let (client, domain) = self.client()?;
        let department_code = department.map(|d| d.code.as_str()).unwrap_or_default();

        let request = MailboxRequest {
            local_part: credentials::local_part(
                &member.first_name,
                &member.last_name,
                department_code,
            ),
            domain: domain.to_string(),
            password: credentials::generate_password(credentials::DEFAULT_PASSWORD_LEN),
            display_name: member.full_name(),
        };

        let created = client.create_mailbox(&request).await?;
        info!(email = %created.email, "Hosted mailbox created");

        let saved = self
            .db
            .email_accounts()
            .create(CreateEmailAccount {
                team_member_id: member.id,
                email: created.email.clone(),
                platform: Platform::Cpanel,
            })
            .await;

        match saved {
            Ok(account) => Ok(HostedAccount {
                account,
                password: request.password,
            }),
            Err(db_err) => {
                // Prefer the address the platform reported; fall back to
                // the derived one if it reported none.
                let target = if created.email.is_empty() {
                    request.address()
                } else {
                    created.email
                };
                if let Err(rollback_err) = client.delete_mailbox(&target).await {
                    error!(
                        email = %target,
                        error = %rollback_err,
                        "Rollback of remote mailbox failed; manual cleanup required"
                    );
                }
                Err(HostedEmailError::Persistence(db_err))
            }
        }
    }

    /// Suspend logins for a hosted account remotely and mark it locally.
    #[tracing::instrument(skip(self))]
    pub async fn suspend_account(&self, account_id: Uuid, email: &str) -> Result<(), HostedEmailError> {
        let (client, _) = self.client()?;
        client.suspend_mailbox(email).await?;
        self.db
            .email_accounts()
            .set_status(account_id, EmailAccountStatus::Suspended)
            .await?;
        Ok(())
    }

    /// Delete a hosted account remotely, then drop the local record.
    #[tracing::instrument(skip(self), fields(%email))]
    pub async fn delete_account(&self, email: &str) -> Result<(), HostedEmailError> {
        let (client, _) = self.client()?;
        let account = self
            .db
            .email_accounts()
            .get_by_email(email)
            .await?
            .ok_or(HostedEmailError::NotFound)?;

        client.delete_mailbox(&account.email).await?;
        self.db.email_accounts().delete(account.id).await?;
        Ok(())
    }

    pub async fn accounts_for_member(
        &self,
        team_member_id: Uuid,
    ) -> Result<Vec<EmailAccount>, HostedEmailError> {
        Ok(self.db.email_accounts().get_by_member(team_member_id).await?)
    }
}

//! Team-member provisioning orchestrator.
//!
//! Walks a member through account creation on the configured platforms,
//! tracking partial success per platform and merging the outcome into the
//! managed-user aggregate. Remote failures are recorded in the outcome and
//! never abort the run; only missing configuration and persistence
//! failures surface as errors.

use std::{fmt, sync::Arc};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    db::{DbError, DbPool},
    models::{
        CreateChatAgent, CreateManagedUser, Department, ManagedUser, PlatformIdentity, TeamMember,
        credentials,
    },
    platforms::{ChatClient, MailboxClient, MailboxRequest},
};

#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// A requested step has no enabled platform configuration.
    #[error("No enabled {0} configuration found")]
    NotConfigured(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Which steps a provisioning run should perform.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvisionOptions {
    pub create_mailbox: bool,
    pub create_chat_agent: bool,
    pub assign_to_team: bool,
}

/// Step a recorded error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionStage {
    Mailbox,
    ChatAgent,
    TeamAssignment,
}

impl fmt::Display for ProvisionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mailbox => "mailbox",
            Self::ChatAgent => "chat_agent",
            Self::TeamAssignment => "team_assignment",
        };
        f.write_str(s)
    }
}

/// One recorded failure. Errors accumulate; a later failure never
/// overwrites an earlier one.
#[derive(Debug, Clone, Serialize)]
pub struct StageError {
    pub stage: ProvisionStage,
    pub message: String,
}

/// Mailbox sub-result. The password is returned exactly once, for the
/// operator to hand over; it is never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MailboxStep {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Chat-agent sub-result.
#[derive(Debug, Clone, Serialize)]
pub struct ChatAgentStep {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
}

/// Structured result of one provisioning run, returned verbatim to the
/// admin UI so the operator can retry just the failed platform.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionOutcome {
    /// Deterministically derived mailbox local part.
    pub username: String,
    /// Authoritative email after the run (newly generated if the mailbox
    /// step succeeded, else the member's pre-existing address).
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailcow: Option<MailboxStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chatwoot: Option<ChatAgentStep>,
    pub errors: Vec<StageError>,
}

/// Orchestrates multi-platform account creation for a member.
///
/// Clients are injected once at construction, resolved from configuration
/// by the caller; the orchestrator never consults configuration itself.
#[derive(Clone)]
pub struct ProvisioningService {
    db: Arc<DbPool>,
    mailbox: Option<Arc<dyn MailboxClient>>,
    mail_domain: Option<String>,
    chat: Option<Arc<dyn ChatClient>>,
}

impl ProvisioningService {
    pub fn new(
        db: Arc<DbPool>,
        mailbox: Option<(Arc<dyn MailboxClient>, String)>,
        chat: Option<Arc<dyn ChatClient>>,
    ) -> Self {
        let (mailbox, mail_domain) = match mailbox {
            Some((client, domain)) => (Some(client), Some(domain)),
            None => (None, None),
        };
        Self {
            db,
            mailbox,
            mail_domain,
            chat,
        }
    }

    /// Run the provisioning sequence for one member.
    ///
    /// Steps run strictly in order because the chat step depends on the
    /// email the mailbox step may have produced.
    #[tracing::instrument(
        skip(self, member, department, options),
        fields(member_id = %member.id)
    )]
    pub async fn provision(
        &self,
        member: &TeamMember,
        department: Option<&Department>,
        options: ProvisionOptions,
    ) -> Result<ProvisionOutcome, ProvisioningError> {
        let department_code = department.map(|d| d.code.as_str()).unwrap_or_default();
        let username =
            credentials::local_part(&member.first_name, &member.last_name, department_code);

        let mut outcome = ProvisionOutcome {
            username: username.clone(),
            email: member.email.clone(),
            mailcow: None,
            chatwoot: None,
            errors: Vec::new(),
        };
        let mut identities: Vec<PlatformIdentity> = Vec::new();

        if options.create_mailbox {
            self.create_mailbox_step(member, &username, &mut outcome, &mut identities)
                .await?;
        }

        if options.create_chat_agent {
            self.create_chat_agent_step(member, department, options, &mut outcome, &mut identities)
                .await?;
        }

        if !identities.is_empty() {
            self.upsert_managed_user(member, &outcome, identities)
                .await?;
        }

        Ok(outcome)
    }

    /// Create the mailbox and persist the new address immediately, so
    /// later steps and concurrent readers see it. A remote failure keeps
    /// the member's pre-existing email authoritative.
    async fn create_mailbox_step(
        &self,
        member: &TeamMember,
        username: &str,
        outcome: &mut ProvisionOutcome,
        identities: &mut Vec<PlatformIdentity>,
    ) -> Result<(), ProvisioningError> {
        let client = self
            .mailbox
            .as_ref()
            .ok_or(ProvisioningError::NotConfigured("mailcow"))?;
        let domain = self
            .mail_domain
            .as_ref()
            .ok_or(ProvisioningError::NotConfigured("mailcow"))?;

        let request = MailboxRequest {
            local_part: username.to_string(),
            domain: domain.clone(),
            password: credentials::generate_password(credentials::DEFAULT_PASSWORD_LEN),
            display_name: member.full_name(),
        };

        match client.create_mailbox(&request).await {
            Ok(created) => {
                self.db
                    .team_members()
                    .set_email(member.id, &created.email)
                    .await?;
                identities.push(PlatformIdentity::Mailcow {
                    email: created.email.clone(),
                });
                debug!(email = %created.email, "Mailbox created");
                outcome.email = Some(created.email.clone());
                outcome.mailcow = Some(MailboxStep {
                    success: true,
                    email: Some(created.email),
                    password: Some(request.password),
                });
            }
            Err(e) => {
                warn!(error = %e, "Mailbox creation failed");
                outcome.mailcow = Some(MailboxStep {
                    success: false,
                    email: None,
                    password: None,
                });
                outcome.errors.push(StageError {
                    stage: ProvisionStage::Mailbox,
                    message: e.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Create the chat agent with the now-authoritative email, then
    /// optionally assign it to the department's mapped team. A missing
    /// team mapping or failed assignment is recorded without failing the
    /// agent creation.
    async fn create_chat_agent_step(
        &self,
        member: &TeamMember,
        department: Option<&Department>,
        options: ProvisionOptions,
        outcome: &mut ProvisionOutcome,
        identities: &mut Vec<PlatformIdentity>,
    ) -> Result<(), ProvisioningError> {
        let client = self
            .chat
            .as_ref()
            .ok_or(ProvisioningError::NotConfigured("chatwoot"))?;

        let Some(email) = outcome.email.clone() else {
            outcome.chatwoot = Some(ChatAgentStep {
                success: false,
                agent_id: None,
                team_id: None,
            });
            outcome.errors.push(StageError {
                stage: ProvisionStage::ChatAgent,
                message: "Member has no email address to create an agent with".to_string(),
            });
            return Ok(());
        };

        let agent = match client.create_agent(&member.full_name(), &email).await {
            Ok(agent) => agent,
            Err(e) => {
                warn!(error = %e, "Chat agent creation failed");
                outcome.chatwoot = Some(ChatAgentStep {
                    success: false,
                    agent_id: None,
                    team_id: None,
                });
                outcome.errors.push(StageError {
                    stage: ProvisionStage::ChatAgent,
                    message: e.to_string(),
                });
                return Ok(());
            }
        };

        let link = self
            .db
            .chat_agents()
            .create(CreateChatAgent {
                team_member_id: member.id,
                agent_id: agent.id,
                email: email.clone(),
                team_id: None,
            })
            .await?;
        debug!(agent_id = agent.id, "Chat agent created");

        let mut assigned_team = None;
        if options.assign_to_team {
            match department.and_then(|d| d.chatwoot_team_id) {
                Some(team_id) => match client.add_agent_to_team(agent.id, team_id).await {
                    Ok(()) => {
                        self.db.chat_agents().set_team(link.id, team_id).await?;
                        assigned_team = Some(team_id);
                    }
                    Err(e) => {
                        warn!(error = %e, team_id, "Team assignment failed");
                        outcome.errors.push(StageError {
                            stage: ProvisionStage::TeamAssignment,
                            message: e.to_string(),
                        });
                    }
                },
                None => {
                    outcome.errors.push(StageError {
                        stage: ProvisionStage::TeamAssignment,
                        message: match department {
                            Some(d) => {
                                format!("Department '{}' has no chat team mapped", d.code)
                            }
                            None => "Member has no department to map a chat team from".to_string(),
                        },
                    });
                }
            }
        }

        identities.push(PlatformIdentity::Chatwoot {
            agent_id: agent.id,
            team_id: assigned_team,
        });
        outcome.chatwoot = Some(ChatAgentStep {
            success: true,
            agent_id: Some(agent.id),
            team_id: assigned_team,
        });
        Ok(())
    }

    /// Remove a member's remote chat agent ahead of deletion.
    ///
    /// The remote delete is best effort: a failure is logged and the local
    /// link is removed anyway, since the member record is about to go.
    /// Returns whether an agent link existed.
    #[tracing::instrument(skip(self), fields(member_id = %team_member_id))]
    pub async fn offboard_chat_agent(
        &self,
        team_member_id: uuid::Uuid,
    ) -> Result<bool, ProvisioningError> {
        let Some(link) = self.db.chat_agents().get_by_member(team_member_id).await? else {
            return Ok(false);
        };
        if let Some(client) = &self.chat {
            if let Err(e) = client.delete_agent(link.agent_id).await {
                warn!(
                    error = %e,
                    agent_id = link.agent_id,
                    "Remote chat agent removal failed; manual cleanup required"
                );
            }
        }
        self.db.chat_agents().delete(link.id).await?;
        Ok(true)
    }

    /// Merge the run's identities into the managed-user aggregate.
    /// Platform lists union; identity entries replace per key.
    async fn upsert_managed_user(
        &self,
        member: &TeamMember,
        outcome: &ProvisionOutcome,
        identities: Vec<PlatformIdentity>,
    ) -> Result<ManagedUser, ProvisioningError> {
        let full_name = member.full_name();
        match self.db.managed_users().get_by_member(member.id).await? {
            Some(mut existing) => {
                existing.merge(&full_name, outcome.email.as_deref(), identities);
                self.db.managed_users().update(&existing).await?;
                Ok(existing)
            }
            None => {
                let created = self
                    .db
                    .managed_users()
                    .create(CreateManagedUser {
                        team_member_id: member.id,
                        full_name,
                        email: outcome.email.clone(),
                        identities,
                    })
                    .await?;
                Ok(created)
            }
        }
    }
}

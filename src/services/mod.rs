//! Service layer sitting between the HTTP routes and the repositories.

mod directory;
mod hosted_email;
mod provisioning;

pub use directory::DirectoryService;
pub use hosted_email::{HostedAccount, HostedEmailError, HostedEmailService};
pub use provisioning::{
    ChatAgentStep, MailboxStep, ProvisionOptions, ProvisionOutcome, ProvisionStage,
    ProvisioningError, ProvisioningService, StageError,
};

use std::sync::Arc;

use crate::db::DbPool;

/// Aggregate handed to the router as shared state.
#[derive(Clone)]
pub struct Services {
    pub directory: DirectoryService,
    pub provisioning: ProvisioningService,
    pub hosted_email: HostedEmailService,
}

impl Services {
    pub fn new(
        db: Arc<DbPool>,
        provisioning: ProvisioningService,
        hosted_email: HostedEmailService,
    ) -> Self {
        Self {
            directory: DirectoryService::new(db),
            provisioning,
            hosted_email,
        }
    }
}

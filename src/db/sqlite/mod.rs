mod chat_agents;
mod common;
mod departments;
mod email_accounts;
mod managed_users;
mod team_members;

pub use chat_agents::SqliteChatAgentRepo;
pub use departments::SqliteDepartmentRepo;
pub use email_accounts::SqliteEmailAccountRepo;
pub use managed_users::SqliteManagedUserRepo;
pub use team_members::SqliteTeamMemberRepo;

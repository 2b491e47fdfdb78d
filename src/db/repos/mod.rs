mod chat_agents;
mod departments;
mod email_accounts;
mod managed_users;
mod team_members;

pub use chat_agents::*;
pub use departments::*;
pub use email_accounts::*;
pub use managed_users::*;
pub use team_members::*;

pub mod credentials;
mod department;
mod link_records;
mod managed_user;
mod team_member;

pub use department::{CreateDepartment, Department, SetTeamMapping};
pub use link_records::{
    ChatAgent, CreateChatAgent, CreateEmailAccount, EmailAccount, EmailAccountStatus,
};
pub use managed_user::{CreateManagedUser, ManagedUser, Platform, PlatformIdentity};
pub use team_member::{CreateTeamMember, MemberStatus, TeamMember, UpdateTeamMember};

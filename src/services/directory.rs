//! Local directory of team members, departments and managed users.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{DbError, DbPool, DbResult},
    models::{
        CreateDepartment, CreateTeamMember, Department, ManagedUser, TeamMember, UpdateTeamMember,
    },
};

#[derive(Clone)]
pub struct DirectoryService {
    db: Arc<DbPool>,
}

impl DirectoryService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    pub async fn create_member(&self, input: CreateTeamMember) -> DbResult<TeamMember> {
        if let Some(department_id) = input.department_id {
            self.db
                .departments()
                .get_by_id(department_id)
                .await?
                .ok_or(DbError::NotFound)?;
        }
        self.db.team_members().create(input).await
    }

    pub async fn get_member(&self, id: Uuid) -> DbResult<Option<TeamMember>> {
        self.db.team_members().get_by_id(id).await
    }

    /// Member together with its department, for callers that need the
    /// department code or chat-team mapping.
    pub async fn member_with_department(
        &self,
        id: Uuid,
    ) -> DbResult<Option<(TeamMember, Option<Department>)>> {
        let Some(member) = self.db.team_members().get_by_id(id).await? else {
            return Ok(None);
        };
        let department = match member.department_id {
            Some(department_id) => self.db.departments().get_by_id(department_id).await?,
            None => None,
        };
        Ok(Some((member, department)))
    }

    pub async fn list_members(&self) -> DbResult<Vec<TeamMember>> {
        self.db.team_members().list().await
    }

    pub async fn update_member(&self, id: Uuid, input: UpdateTeamMember) -> DbResult<TeamMember> {
        if let Some(department_id) = input.department_id {
            self.db
                .departments()
                .get_by_id(department_id)
                .await?
                .ok_or(DbError::NotFound)?;
        }
        self.db.team_members().update(id, input).await
    }

    pub async fn delete_member(&self, id: Uuid) -> DbResult<()> {
        self.db.team_members().delete(id).await
    }

    pub async fn create_department(&self, input: CreateDepartment) -> DbResult<Department> {
        self.db.departments().create(input).await
    }

    pub async fn list_departments(&self) -> DbResult<Vec<Department>> {
        self.db.departments().list().await
    }

    pub async fn set_team_mapping(
        &self,
        id: Uuid,
        chatwoot_team_id: Option<i64>,
    ) -> DbResult<Department> {
        self.db.departments().set_team_mapping(id, chatwoot_team_id).await
    }

    pub async fn list_managed_users(&self) -> DbResult<Vec<ManagedUser>> {
        self.db.managed_users().list().await
    }

    pub async fn managed_user_for_member(&self, id: Uuid) -> DbResult<Option<ManagedUser>> {
        self.db.managed_users().get_by_member(id).await
    }
}

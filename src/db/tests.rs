//! Repository tests against in-memory SQLite.

use uuid::Uuid;

use super::DbPool;
use crate::models::{
    CreateChatAgent, CreateDepartment, CreateEmailAccount, CreateManagedUser, CreateTeamMember,
    EmailAccountStatus, MemberStatus, Platform, PlatformIdentity, UpdateTeamMember,
};

/// Build a DbPool over in-memory SQLite with migrations applied.
pub async fn test_pool() -> DbPool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");

    let db = DbPool::from_sqlite(pool);
    db.run_migrations().await.expect("Migrations failed");
    db
}

fn member_input(first: &str, last: &str) -> CreateTeamMember {
    CreateTeamMember {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: None,
        phone: None,
        department_id: None,
        role: "member".to_string(),
    }
}

#[tokio::test]
async fn team_member_crud_roundtrip() {
    let db = test_pool().await;

    let created = db
        .team_members()
        .create(member_input("John", "Doe"))
        .await
        .unwrap();
    assert_eq!(created.status, MemberStatus::Active);

    let fetched = db
        .team_members()
        .get_by_id(created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.full_name(), "John Doe");

    let updated = db
        .team_members()
        .update(
            created.id,
            UpdateTeamMember {
                role: Some("admin".to_string()),
                status: Some(MemberStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.role, "admin");
    assert_eq!(updated.status, MemberStatus::Inactive);

    db.team_members().delete(created.id).await.unwrap();
    assert!(
        db.team_members()
            .get_by_id(created.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn set_email_overwrites_only_email() {
    let db = test_pool().await;
    let member = db
        .team_members()
        .create(member_input("John", "Doe"))
        .await
        .unwrap();

    db.team_members()
        .set_email(member.id, "doe.john_sales@example.com")
        .await
        .unwrap();

    let fetched = db
        .team_members()
        .get_by_id(member.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.email.as_deref(), Some("doe.john_sales@example.com"));
    assert_eq!(fetched.first_name, "John");
}

#[tokio::test]
async fn department_code_is_unique() {
    let db = test_pool().await;
    let input = CreateDepartment {
        code: "sales".to_string(),
        name: "Sales".to_string(),
        chatwoot_team_id: None,
    };

    db.departments().create(input.clone()).await.unwrap();
    let err = db.departments().create(input).await.unwrap_err();
    assert!(matches!(err, super::DbError::Conflict(_)));
}

#[tokio::test]
async fn department_team_mapping_roundtrip() {
    let db = test_pool().await;
    let dept = db
        .departments()
        .create(CreateDepartment {
            code: "support".to_string(),
            name: "Support".to_string(),
            chatwoot_team_id: None,
        })
        .await
        .unwrap();

    let mapped = db
        .departments()
        .set_team_mapping(dept.id, Some(12))
        .await
        .unwrap();
    assert_eq!(mapped.chatwoot_team_id, Some(12));

    let unmapped = db
        .departments()
        .set_team_mapping(dept.id, None)
        .await
        .unwrap();
    assert_eq!(unmapped.chatwoot_team_id, None);
}

#[tokio::test]
async fn managed_user_merge_persists_both_platforms() {
    let db = test_pool().await;
    let member = db
        .team_members()
        .create(member_input("John", "Doe"))
        .await
        .unwrap();

    db.managed_users()
        .create(CreateManagedUser {
            team_member_id: member.id,
            full_name: "John Doe".to_string(),
            email: Some("doe.john_sales@example.com".to_string()),
            identities: vec![PlatformIdentity::Mailcow {
                email: "doe.john_sales@example.com".to_string(),
            }],
        })
        .await
        .unwrap();

    let mut existing = db
        .managed_users()
        .get_by_member(member.id)
        .await
        .unwrap()
        .unwrap();
    existing.merge(
        "John Doe",
        None,
        vec![PlatformIdentity::Chatwoot {
            agent_id: 42,
            team_id: Some(3),
        }],
    );
    db.managed_users().update(&existing).await.unwrap();

    let merged = db
        .managed_users()
        .get_by_member(member.id)
        .await
        .unwrap()
        .unwrap();
    assert!(merged.platforms.contains(&Platform::Mailcow));
    assert!(merged.platforms.contains(&Platform::Chatwoot));
    assert!(merged.platform_identities.contains_key(&Platform::Mailcow));
    assert_eq!(
        merged.platform_identities[&Platform::Chatwoot],
        PlatformIdentity::Chatwoot {
            agent_id: 42,
            team_id: Some(3)
        }
    );
}

#[tokio::test]
async fn one_managed_user_per_member() {
    let db = test_pool().await;
    let member = db
        .team_members()
        .create(member_input("John", "Doe"))
        .await
        .unwrap();

    let input = CreateManagedUser {
        team_member_id: member.id,
        full_name: "John Doe".to_string(),
        email: None,
        identities: vec![],
    };
    db.managed_users().create(input.clone()).await.unwrap();
    let err = db.managed_users().create(input).await.unwrap_err();
    assert!(matches!(err, super::DbError::Conflict(_)));
}

#[tokio::test]
async fn chat_agent_link_roundtrip() {
    let db = test_pool().await;
    let member = db
        .team_members()
        .create(member_input("John", "Doe"))
        .await
        .unwrap();

    let agent = db
        .chat_agents()
        .create(CreateChatAgent {
            team_member_id: member.id,
            agent_id: 77,
            email: "doe.john_sales@example.com".to_string(),
            team_id: None,
        })
        .await
        .unwrap();

    db.chat_agents().set_team(agent.id, 5).await.unwrap();
    let fetched = db
        .chat_agents()
        .get_by_member(member.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.agent_id, 77);
    assert_eq!(fetched.team_id, Some(5));
}

#[tokio::test]
async fn email_account_unique_and_status() {
    let db = test_pool().await;
    let member = db
        .team_members()
        .create(member_input("John", "Doe"))
        .await
        .unwrap();

    let input = CreateEmailAccount {
        team_member_id: member.id,
        email: "doe.john_sales@example.com".to_string(),
        platform: Platform::Cpanel,
    };
    let account = db.email_accounts().create(input.clone()).await.unwrap();
    assert!(matches!(
        db.email_accounts().create(input).await.unwrap_err(),
        super::DbError::Conflict(_)
    ));

    db.email_accounts()
        .set_status(account.id, EmailAccountStatus::Suspended)
        .await
        .unwrap();
    let fetched = db
        .email_accounts()
        .get_by_email("doe.john_sales@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.status, EmailAccountStatus::Suspended);
}

#[tokio::test]
async fn missing_rows_return_not_found() {
    let db = test_pool().await;
    let id = Uuid::new_v4();

    assert!(matches!(
        db.team_members().set_email(id, "a@b.c").await.unwrap_err(),
        super::DbError::NotFound
    ));
    assert!(matches!(
        db.chat_agents().delete(id).await.unwrap_err(),
        super::DbError::NotFound
    ));
}

#[tokio::test]
async fn deleting_a_member_cascades_to_link_rows() {
    let db = test_pool().await;
    let member = db
        .team_members()
        .create(member_input("John", "Doe"))
        .await
        .unwrap();

    db.chat_agents()
        .create(CreateChatAgent {
            team_member_id: member.id,
            agent_id: 42,
            email: "john@example.com".to_string(),
            team_id: None,
        })
        .await
        .unwrap();
    db.email_accounts()
        .create(CreateEmailAccount {
            team_member_id: member.id,
            email: "john@example.com".to_string(),
            platform: Platform::Cpanel,
        })
        .await
        .unwrap();
    db.managed_users()
        .create(CreateManagedUser {
            team_member_id: member.id,
            full_name: "John Doe".to_string(),
            email: Some("john@example.com".to_string()),
            identities: vec![PlatformIdentity::Mailcow {
                email: "john@example.com".to_string(),
            }],
        })
        .await
        .unwrap();

    db.team_members().delete(member.id).await.unwrap();

    assert!(db.chat_agents().get_by_member(member.id).await.unwrap().is_none());
    assert!(db.email_accounts().get_by_member(member.id).await.unwrap().is_empty());
    assert!(db.managed_users().get_by_member(member.id).await.unwrap().is_none());
}

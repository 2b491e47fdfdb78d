//! Platform client tests against wiremock servers.
//!
//! Each test stands up a mock of the remote API, drives the real client at
//! it, and asserts on both the outgoing request shape and the error
//! classification of the response.

use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

use crate::{
    config::{ChatwootConfig, CpanelConfig, MailcowConfig},
    platforms::{
        ChatClient, ChatwootClient, CpanelClient, HostedMailboxClient, MailboxClient,
        MailcowClient, MailboxRequest, PlatformError,
    },
};

fn mailbox_request() -> MailboxRequest {
    MailboxRequest {
        local_part: "doe.john_sales".to_string(),
        domain: "example.com".to_string(),
        password: "s3cret!s3cret!xx".to_string(),
        display_name: "John Doe".to_string(),
    }
}

fn mailcow_client(server: &MockServer) -> MailcowClient {
    MailcowClient::from_config(
        &MailcowConfig {
            instance_url: server.uri(),
            api_key: "test-key".to_string(),
            domain: "example.com".to_string(),
            quota_mb: 1024,
            timeout_secs: 5,
            enabled: true,
        },
        reqwest::Client::new(),
    )
}

fn chatwoot_client(server: &MockServer) -> ChatwootClient {
    ChatwootClient::from_config(
        &ChatwootConfig {
            instance_url: server.uri(),
            api_token: "test-token".to_string(),
            account_id: 7,
            timeout_secs: 5,
            enabled: true,
        },
        reqwest::Client::new(),
    )
}

fn cpanel_client(server: &MockServer) -> CpanelClient {
    CpanelClient::from_config(
        &CpanelConfig {
            hostname: "panel.example.com".to_string(),
            username: "hubadmin".to_string(),
            api_token: "test-token".to_string(),
            domain: "example.com".to_string(),
            quota_mb: 512,
            timeout_secs: 5,
            enabled: true,
        },
        reqwest::Client::new(),
    )
    .with_base_url(&server.uri())
}

// ---------------------------------------------------------------------------
// Mailcow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mailcow_creates_mailbox_with_api_key_and_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/add/mailbox"))
        .and(header("X-API-Key", "test-key"))
        .and(body_partial_json(json!({
            "local_part": "doe.john_sales",
            "domain": "example.com",
            "active": "1",
            "quota": 1024,
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"type": "success", "msg": ["mailbox_added"]}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = mailcow_client(&server)
        .create_mailbox(&mailbox_request())
        .await
        .unwrap();
    assert_eq!(created.email, "doe.john_sales@example.com");
}

#[tokio::test]
async fn mailcow_error_envelope_is_rejected_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/add/mailbox"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "error", "msg": "object_exists (mailbox)"}
        ])))
        .mount(&server)
        .await;

    let err = mailcow_client(&server)
        .create_mailbox(&mailbox_request())
        .await
        .unwrap_err();
    match err {
        PlatformError::Rejected { platform, message } => {
            assert_eq!(platform, "mailcow");
            assert!(message.contains("object_exists"));
        }
        other => panic!("Expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn mailcow_html_login_page_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/add/mailbox"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string("<html><body>login</body></html>"),
        )
        .mount(&server)
        .await;

    let err = mailcow_client(&server)
        .create_mailbox(&mailbox_request())
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::UnexpectedHtml { .. }));
}

#[tokio::test]
async fn mailcow_delete_posts_address_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/delete/mailbox"))
        .and(body_partial_json(json!(["doe.john_sales@example.com"])))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"type": "success", "msg": ["mailbox_removed"]}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    mailcow_client(&server)
        .delete_mailbox("doe.john_sales@example.com")
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Chatwoot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chatwoot_creates_agent_with_account_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/accounts/7/agents"))
        .and(header("api_access_token", "test-token"))
        .and(body_partial_json(json!({
            "name": "John Doe",
            "email": "doe.john_sales@example.com",
            "role": "agent",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "email": "doe.john_sales@example.com",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let agent = chatwoot_client(&server)
        .create_agent("John Doe", "doe.john_sales@example.com")
        .await
        .unwrap();
    assert_eq!(agent.id, 42);
    assert_eq!(agent.email.as_deref(), Some("doe.john_sales@example.com"));
}

#[tokio::test]
async fn chatwoot_validation_failure_carries_platform_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/accounts/7/agents"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"message": "Email has already been taken"})),
        )
        .mount(&server)
        .await;

    let err = chatwoot_client(&server)
        .create_agent("John Doe", "doe.john_sales@example.com")
        .await
        .unwrap_err();
    match err {
        PlatformError::Rejected { message, .. } => {
            assert_eq!(message, "Email has already been taken");
        }
        other => panic!("Expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn chatwoot_team_assignment_posts_user_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/accounts/7/teams/3/team_members"))
        .and(body_partial_json(json!({"user_ids": [42]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    chatwoot_client(&server)
        .add_agent_to_team(42, 3)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// cPanel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cpanel_creates_mailbox_via_form_encoded_uapi() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute/Email/addpop"))
        .and(header("authorization", "cpanel hubadmin:test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"metadata": {"result": 1, "reason": "OK"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = cpanel_client(&server)
        .create_mailbox(&mailbox_request())
        .await
        .unwrap();
    assert_eq!(created.email, "doe.john_sales@example.com");
}

#[tokio::test]
async fn cpanel_failure_reason_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute/Email/addpop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"result": 0, "reason": "The account already exists."}
        })))
        .mount(&server)
        .await;

    let err = cpanel_client(&server)
        .create_mailbox(&mailbox_request())
        .await
        .unwrap_err();
    match err {
        PlatformError::Rejected { platform, message } => {
            assert_eq!(platform, "cpanel");
            assert_eq!(message, "The account already exists.");
        }
        other => panic!("Expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn cpanel_html_login_page_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute/Email/addpop"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_raw("<html>login</html>", "text/html"),
        )
        .mount(&server)
        .await;

    let err = cpanel_client(&server)
        .create_mailbox(&mailbox_request())
        .await
        .unwrap_err();
    match err {
        PlatformError::UnexpectedHtml { content_type, .. } => {
            assert!(content_type.starts_with("text/html"));
        }
        other => panic!("Expected UnexpectedHtml, got {other:?}"),
    }
}

#[tokio::test]
async fn cpanel_suspend_and_delete_split_address() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute/Email/suspendpop"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"metadata": {"result": 1}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/execute/Email/delpop"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"metadata": {"result": 1}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = cpanel_client(&server);
    client
        .suspend_mailbox("doe.john_sales@example.com")
        .await
        .unwrap();
    client
        .delete_mailbox("doe.john_sales@example.com")
        .await
        .unwrap();
}

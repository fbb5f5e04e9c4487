//! End-to-end flows through the public `Integration` facade against a mock
//! Jira server.

use std::time::Duration;

use mockito::{Matcher, Server};
use tempfile::TempDir;

use repojira::api::{ApiError, JiraClient};
use repojira::credentials::MemoryCredentialStore;
use repojira::registry::RepositoryRegistry;
use repojira::{AppError, Integration};

fn integration(dir: &TempDir) -> Integration<MemoryCredentialStore> {
    let client = JiraClient::with_timeouts(Duration::from_secs(5), Duration::from_secs(5)).unwrap();
    let registry = RepositoryRegistry::open(dir.path().join("repositories.json")).unwrap();
    Integration::new(client, MemoryCredentialStore::new(), registry)
}

#[tokio::test]
async fn unconfigured_reads_never_contact_jira() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let jira = integration(&dir);

    assert!(jira.projects().await.is_empty());
    assert!(jira.profile().await.unwrap().is_none());
    assert!(jira.resolve_project_by_key("WEB").await.is_none());
    assert!(jira.avatar(&format!("{}/avatar.png", server.url())).await.is_none());

    any.assert_async().await;
}

#[tokio::test]
async fn server_dc_flow_after_login() {
    let mut server = Server::new_async().await;

    // Jira Server/DC has no v3 API.
    let v3 = server
        .mock("GET", Matcher::Regex(r"^/rest/api/3/".to_string()))
        .with_status(404)
        .expect(4)
        .create_async()
        .await;
    server
        .mock("GET", "/rest/api/2/myself")
        .match_header("authorization", "Basic amRvZTpodW50ZXIy")
        .with_status(200)
        .with_body(r#"{"name": "jdoe", "displayName": "Jane Doe", "avatarUrls": {"48x48": "/secure/useravatar?avatarId=1"}}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/rest/api/2/project")
        .with_status(200)
        .with_body(r#"[{"key": "CORE", "name": "Core Platform", "avatarUrls": {"32x32": "/secure/projectavatar?pid=1"}}]"#)
        .create_async()
        .await;
    server
        .mock("GET", "/secure/projectavatar")
        .match_query(Matcher::UrlEncoded("pid".into(), "1".into()))
        .match_header("authorization", "Basic amRvZTpodW50ZXIy")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body([0xFFu8, 0xD8])
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let mut jira = integration(&dir);

    let credentials = jira
        .validate_and_save_credentials(&format!("{}/", server.url()), "jdoe", "hunter2")
        .await
        .unwrap();
    assert_eq!(credentials.server, server.url());

    let profile = jira.profile().await.unwrap().unwrap();
    assert_eq!(profile.display_name, "Jane Doe");
    assert_eq!(profile.avatar_url, "/secure/useravatar?avatarId=1");

    let projects = jira.projects().await;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].key, "CORE");

    let repo = jira.add_repository("/src/core", "core").await.unwrap();
    let link = repo.jira.expect("repository should be linked");
    assert_eq!(link.name, "Core Platform");

    let avatar = jira.avatar(&link.avatar_url).await.unwrap();
    assert_eq!(avatar.to_data_uri(), "data:image/png;base64,/9g=");

    // login, profile, project list and link resolution each tried v3 once.
    v3.assert_async().await;

    let reopened = RepositoryRegistry::open(dir.path().join("repositories.json")).unwrap();
    assert_eq!(reopened.repositories().len(), 1);
    assert_eq!(reopened.repositories()[0].jira.as_ref().unwrap().key, "CORE");
}

#[tokio::test]
async fn wrong_password_is_reported_once() {
    let mut server = Server::new_async().await;
    let cloud = server
        .mock("GET", "/rest/api/3/myself")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let dc = server
        .mock("GET", "/rest/api/2/myself")
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let jira = integration(&dir);

    let err = jira
        .validate_and_save_credentials(&server.url(), "jdoe", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Api(ApiError::InvalidCredentials)));
    assert!(err.user_message().contains("Invalid username"));
    assert!(jira.credentials().is_none());
    cloud.assert_async().await;
    dc.assert_async().await;
}

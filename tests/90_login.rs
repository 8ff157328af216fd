use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use kvc_console::access::CapabilityTable;
use kvc_console::api::ApiClient;
use kvc_console::pages::{Console, Mount, LOGIN_ROUTE};
use kvc_console::session::{FileSessionStore, SessionContext};

mod common;
use common::MockBackend;

fn token_response() -> serde_json::Value {
    json!({
        "access": "tok-fresh",
        "refresh": "ref-fresh",
        "user": {
            "id": 3,
            "username": "mrojas",
            "first_name": "María",
            "last_name": "Rojas",
            "email": "mrojas@kvc.cl",
            "is_active": true,
            "roles": [{"id": 1, "nombre": "Administrador", "slug": "admin", "descripcion": ""}]
        }
    })
}

#[tokio::test]
async fn test_login_stores_session() -> Result<()> {
    let backend = MockBackend::start().await?;
    backend.respond("POST", "/api/auth/token/", 200, token_response());

    let console = common::console_for(&backend);
    let user = console.login("mrojas", "s3cret").await?;

    assert_eq!(user.display_name(), "María Rojas");
    assert_eq!(console.session().token().as_deref(), Some("tok-fresh"));
    assert!(matches!(console.mount(None), Mount::Ready(u) if u.username == "mrojas"));

    let sent = &backend.requests_to("POST", "/api/auth/token/")[0];
    assert_eq!(sent.body, Some(json!({"username": "mrojas", "password": "s3cret"})));
    assert!(sent.authorization.is_none());
    Ok(())
}

#[tokio::test]
async fn test_login_persists_only_token_and_profile() -> Result<()> {
    let backend = MockBackend::start().await?;
    backend.respond("POST", "/api/auth/token/", 200, token_response());

    let dir = std::env::temp_dir().join(format!("kvc-login-{}", uuid::Uuid::new_v4()));
    let session = SessionContext::new(Arc::new(FileSessionStore::new(&dir)));
    let console = Console::new(ApiClient::new(&backend.base_url, session)?, CapabilityTable::console_defaults());

    console.login("mrojas", "s3cret").await?;

    let mut keys: Vec<String> = std::fs::read_dir(&dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    keys.sort();
    assert_eq!(keys, vec!["accessToken", "user"]);

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}

#[tokio::test]
async fn test_failed_login_clears_previous_session() -> Result<()> {
    let backend = MockBackend::start().await?;
    backend.respond(
        "POST",
        "/api/auth/token/",
        400,
        json!({"detail": "No active account found with the given credentials"}),
    );

    let console = common::logged_in(&backend, "tok-old", &["admin"]);
    let err = console.login("mrojas", "wrong").await.unwrap_err();

    assert_eq!(err.to_string(), "No active account found with the given credentials");
    assert!(console.session().token().is_none());
    assert_eq!(console.mount(None), Mount::Redirect(LOGIN_ROUTE));
    Ok(())
}

#[tokio::test]
async fn test_logout_clears_session() -> Result<()> {
    let backend = MockBackend::start().await?;
    let console = common::logged_in(&backend, "tok", &["admin"]);

    console.logout()?;
    assert_eq!(console.mount(None), Mount::Redirect(LOGIN_ROUTE));
    assert!(backend.requests().is_empty());
    Ok(())
}

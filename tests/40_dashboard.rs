use anyhow::Result;
use serde_json::json;

use kvc_console::config::{AccessConfig, ApiConfig, ConsoleConfig, Environment, SessionConfig};
use kvc_console::pages::dashboard::ALL_FAILED_MESSAGE;
use kvc_console::pages::{Console, Mount, PageScope};
use kvc_console::resources::Resource;

mod common;
use common::MockBackend;

const ADMIN_COLLECTIONS: [&str; 7] = [
    "/api/usuarios/",
    "/api/roles/",
    "/api/empleados/",
    "/api/productos/",
    "/api/movimientos/",
    "/api/eventos/",
    "/api/documentos-roi/",
];

#[tokio::test]
async fn test_failed_counter_is_isolated() -> Result<()> {
    let backend = MockBackend::start().await?;
    for path in ADMIN_COLLECTIONS {
        backend.respond("GET", path, 200, json!([{"id": 1}, {"id": 2}]));
    }
    backend.respond("GET", "/api/roles/", 500, json!({"detail": "fallo"}));

    let console = common::logged_in(&backend, "tok", &["admin"]);
    let dashboard = console.dashboard(&PageScope::new()).await?;

    assert_eq!(dashboard.counters.len(), 7);
    assert!(dashboard.message.is_none());

    for counter in &dashboard.counters {
        if counter.resource == "roles" {
            assert_eq!(counter.count, None);
        } else {
            assert_eq!(counter.count, Some(2), "{}", counter.resource);
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_all_counters_failing_sets_message() -> Result<()> {
    // no routes: every collection answers 404
    let backend = MockBackend::start().await?;

    let console = common::logged_in(&backend, "tok", &["admin"]);
    let dashboard = console.dashboard(&PageScope::new()).await?;

    assert!(dashboard.counters.iter().all(|c| c.count.is_none()));
    assert_eq!(dashboard.message.as_deref(), Some(ALL_FAILED_MESSAGE));
    assert_eq!(backend.requests().len(), 7);
    Ok(())
}

#[tokio::test]
async fn test_accounting_lead_sees_its_own_panels() -> Result<()> {
    let backend = MockBackend::start().await?;
    for path in ADMIN_COLLECTIONS {
        backend.respond("GET", path, 200, json!([]));
    }

    let console = common::logged_in(&backend, "tok", &["resp_adm_contable"]);
    let dashboard = console.dashboard(&PageScope::new()).await?;

    let shown: Vec<&str> = dashboard.counters.iter().map(|c| c.resource).collect();
    assert_eq!(
        shown,
        vec!["empleados", "productos", "movimientos", "eventos", "documentos-roi"]
    );
    assert!(backend.requests_to("GET", "/api/usuarios/").is_empty());
    assert!(backend.requests_to("GET", "/api/roles/").is_empty());
    Ok(())
}

#[tokio::test]
async fn test_dashboard_requires_session() -> Result<()> {
    let backend = MockBackend::start().await?;
    let console = common::console_for(&backend);

    let err = console.dashboard(&PageScope::new()).await.unwrap_err();
    assert!(err.requires_login());
    assert!(backend.requests().is_empty());
    Ok(())
}

fn config_for(backend: &MockBackend, accounting_slug: Option<&str>) -> ConsoleConfig {
    ConsoleConfig {
        environment: Environment::Development,
        api: ApiConfig {
            base_url: backend.base_url.clone(),
            request_timeout_secs: 5,
        },
        session: SessionConfig {
            dir: Some(std::env::temp_dir().join(format!("kvc-dashboard-{}", uuid::Uuid::new_v4()))),
        },
        access: AccessConfig {
            accounting_slug: accounting_slug.map(str::to_string),
        },
    }
}

#[tokio::test]
async fn test_default_table_keeps_both_accounting_spellings() -> Result<()> {
    let backend = MockBackend::start().await?;
    backend.respond("GET", "/api/productos/", 200, json!([{"id": 1, "nombre": "Tornillo"}]));

    let config = config_for(&backend, None);
    let console = Console::from_config(&config)?;
    assert!(console.capabilities().ambiguous_slugs().is_some());

    console.session().save_auth("tok", &common::profile(&["resp_admin"]))?;
    let scope = PageScope::new();

    // the short spelling manages inventory but has no dashboard panels
    let page = console.open_list(Resource::Products, &scope).await?;
    assert_eq!(page.len(), 1);

    let dashboard = console.dashboard(&scope).await?;
    assert!(dashboard.counters.is_empty());
    assert!(dashboard.message.is_none());
    assert_eq!(backend.requests().len(), 1);

    if let Some(dir) = &config.session.dir {
        let _ = std::fs::remove_dir_all(dir);
    }
    Ok(())
}

#[tokio::test]
async fn test_accounting_slug_override_unifies_the_role() -> Result<()> {
    let backend = MockBackend::start().await?;
    backend.respond("GET", "/api/productos/", 200, json!([{"id": 1, "nombre": "Tornillo"}]));

    let config = config_for(&backend, Some("resp_adm_contable"));
    let console = Console::from_config(&config)?;
    assert!(console.capabilities().ambiguous_slugs().is_none());

    console.session().save_auth("tok", &common::profile(&["resp_adm_contable"]))?;
    let scope = PageScope::new();

    let page = console.open_list(Resource::Products, &scope).await?;
    assert_eq!(page.len(), 1);

    // the other spelling no longer matches anything
    console.session().save_auth("tok", &common::profile(&["resp_admin"]))?;
    assert!(matches!(
        console.mount(Some(Resource::Products.area())),
        Mount::Denied { .. }
    ));

    if let Some(dir) = &config.session.dir {
        let _ = std::fs::remove_dir_all(dir);
    }
    Ok(())
}

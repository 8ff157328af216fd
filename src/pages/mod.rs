//! Page controllers.
//!
//! Each console page follows the same flow: consult the session, apply the
//! role gate, talk to the backend through the gateway, keep the result as page
//! state. Nothing here renders; callers decide how to show the state.

pub mod confirm;
pub mod dashboard;
pub mod list;
pub mod scope;

use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::Value;

use crate::access::{Area, CapabilityTable};
use crate::api::ApiClient;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use crate::models::UserProfile;
use crate::resources::{self, FormMode, Resource};
use crate::session::{FileSessionStore, SessionContext};

pub use confirm::{AssumeYes, Confirm};
pub use dashboard::{Counter, Dashboard};
pub use list::ListPage;
pub use scope::PageScope;

pub const LOGIN_ROUTE: &str = "/login";

/// Outcome of mounting a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Mount {
    /// No usable session: go to the login entry point. Nothing was requested.
    Redirect(&'static str),
    /// Logged in, but the role gate hides this page.
    Denied { user: UserProfile, message: String },
    Ready(UserProfile),
}

impl Mount {
    pub fn into_user(self) -> Result<UserProfile> {
        match self {
            Mount::Ready(user) => Ok(user),
            Mount::Redirect(_) => Err(ConsoleError::NotAuthenticated),
            Mount::Denied { message, .. } => Err(ConsoleError::NotAuthorized(message)),
        }
    }
}

/// Result of a delete action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    /// The user said no; nothing was sent.
    Declined,
}

/// Auxiliary list loaded for a form.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub resource: Resource,
    pub items: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct Console {
    session: SessionContext,
    api: ApiClient,
    capabilities: CapabilityTable,
}

impl Console {
    pub fn new(api: ApiClient, capabilities: CapabilityTable) -> Self {
        Self {
            session: api.session().clone(),
            api,
            capabilities,
        }
    }

    /// Console backed by the on-disk session and the configured backend.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self> {
        let store = FileSessionStore::from_config(config.session.dir.as_deref())?;
        let session = SessionContext::new(Arc::new(store));
        let api = ApiClient::from_config(config, session)?;

        let capabilities = match &config.access.accounting_slug {
            Some(slug) => CapabilityTable::console_defaults().with_accounting_slug(slug),
            None => {
                let table = CapabilityTable::console_defaults();
                if let Some((backend, pages)) = table.ambiguous_slugs() {
                    tracing::warn!(
                        "accounting role is spelled both '{}' and '{}'; set KVC_ACCOUNTING_SLUG to pick one",
                        backend,
                        pages
                    );
                }
                table
            }
        };

        Ok(Self::new(api, capabilities))
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    /// Session check every page runs first. `area` is `None` for pages any
    /// logged-in user may see.
    pub fn mount(&self, area: Option<Area>) -> Mount {
        if !self.session.has_token() {
            return Mount::Redirect(LOGIN_ROUTE);
        }
        let Some(user) = self.session.stored_user() else {
            return Mount::Redirect(LOGIN_ROUTE);
        };

        match area {
            Some(area) => match self.capabilities.require(Some(&user), area) {
                Ok(_) => Mount::Ready(user),
                Err(e) => Mount::Denied {
                    user,
                    message: e.to_string(),
                },
            },
            None => Mount::Ready(user),
        }
    }

    pub fn current_user(&self) -> Result<UserProfile> {
        self.mount(None).into_user()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile> {
        match self.api.login(username, password).await {
            Ok(tokens) => Ok(tokens.user),
            Err(e) => {
                if let Err(clear_err) = self.session.clear_auth() {
                    tracing::warn!("failed to clear session after login error: {}", clear_err);
                }
                Err(e)
            }
        }
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear_auth()
    }

    pub async fn open_list(&self, resource: Resource, scope: &PageScope) -> Result<ListPage> {
        let user = self.mount(Some(resource.area())).into_user()?;
        let rows = scope.run(self.api.get_list(&resource.collection_path())).await?;
        Ok(ListPage::new(resource, user, rows))
    }

    pub async fn show(&self, resource: Resource, id: &str, scope: &PageScope) -> Result<Value> {
        self.mount(Some(resource.area())).into_user()?;
        let path = resource.item_path(id)?;
        let record = scope.run(self.api.get(&path)).await?;
        Ok(record.unwrap_or(Value::Null))
    }

    /// Loads every list the resource's form needs. One failure fails the batch.
    pub async fn form_catalogs(&self, resource: Resource, scope: &PageScope) -> Result<Vec<Catalog>> {
        self.mount(Some(resource.area())).into_user()?;

        let requests = resource.catalogs().iter().map(|catalog| async move {
            let items = scope.run(self.api.get_list(&catalog.collection_path())).await?;
            Ok::<_, ConsoleError>(Catalog {
                resource: *catalog,
                items,
            })
        });

        try_join_all(requests).await
    }

    pub async fn create(&self, resource: Resource, body: Value, scope: &PageScope) -> Result<Option<Value>> {
        self.mount(Some(resource.area())).into_user()?;
        resources::validate(resource, FormMode::Create, &body)?;
        let body = outgoing(resource, body);
        scope.run(self.api.post(&resource.collection_path(), &body)).await
    }

    pub async fn update(
        &self,
        resource: Resource,
        id: &str,
        body: Value,
        scope: &PageScope,
    ) -> Result<Option<Value>> {
        self.mount(Some(resource.area())).into_user()?;
        let path = resource.item_path(id)?;
        resources::validate(resource, FormMode::Update, &body)?;
        let body = outgoing(resource, body);
        scope.run(self.api.patch(&path, &body)).await
    }

    /// Asks for confirmation, then deletes. `label` names the record in the prompt.
    pub async fn delete(
        &self,
        resource: Resource,
        id: &str,
        label: Option<&str>,
        confirm: &dyn Confirm,
        scope: &PageScope,
    ) -> Result<Deletion> {
        self.mount(Some(resource.area())).into_user()?;
        let path = resource.item_path(id)?;

        let prompt = format!(
            "¿Seguro que desea eliminar {} \"{}\"?",
            resource.noun(),
            label.unwrap_or(id)
        );
        if !confirm.confirm(&prompt).await {
            return Ok(Deletion::Declined);
        }

        scope.run(self.api.delete(&path)).await?;
        tracing::info!(resource = %resource, id, "record deleted");
        Ok(Deletion::Deleted)
    }
}

// Fields that only exist in the form are dropped before submission.
fn outgoing(resource: Resource, mut body: Value) -> Value {
    if resource == Resource::Users {
        if let Some(fields) = body.as_object_mut() {
            fields.remove("confirm_password");
        }
    }
    body
}

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;

use super::{Console, PageScope};
use crate::access::{Action, Area};
use crate::error::Result;
use crate::models::UserProfile;
use crate::resources::Resource;

pub const ALL_FAILED_MESSAGE: &str = "No se pudieron cargar los datos del panel para su rol.";

/// Collections counted on the dashboard, each behind the area that shows it.
const PANELS: [(Resource, Area); 7] = [
    (Resource::Users, Area::Users),
    (Resource::Roles, Area::Roles),
    (Resource::Employees, Area::Employees),
    (Resource::Products, Area::Inventory),
    (Resource::Movements, Area::Inventory),
    (Resource::Events, Area::Events),
    (Resource::RoiDocuments, Area::RoiDocuments),
];

#[derive(Debug, Clone, Serialize)]
pub struct Counter {
    pub resource: &'static str,
    pub title: &'static str,
    /// `None` when the collection could not be loaded.
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub user: UserProfile,
    pub counters: Vec<Counter>,
    pub message: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

impl Console {
    /// Counts every collection the user's roles may see. Requests run
    /// concurrently and fail independently.
    pub async fn dashboard(&self, scope: &PageScope) -> Result<Dashboard> {
        let user = self.mount(None).into_user()?;

        let visible: Vec<Resource> = PANELS
            .iter()
            .filter(|(_, area)| self.capabilities().is_authorized(Some(&user), *area, Action::Overview))
            .map(|(resource, _)| *resource)
            .collect();

        let results = join_all(
            visible
                .iter()
                .map(|resource| async move { scope.run(self.api().get(&resource.collection_path())).await }),
        )
        .await;

        let mut counters = Vec::with_capacity(visible.len());
        let mut failures = 0;
        for (resource, result) in visible.iter().zip(results) {
            let count = match result {
                Ok(Some(Value::Array(items))) => Some(items.len()),
                Ok(_) => Some(0),
                Err(e) => {
                    tracing::warn!(resource = %resource, "dashboard counter unavailable: {}", e);
                    failures += 1;
                    None
                }
            };
            counters.push(Counter {
                resource: resource.slug(),
                title: resource.title(),
                count,
            });
        }

        let message = (!counters.is_empty() && failures == counters.len()).then(|| ALL_FAILED_MESSAGE.to_string());

        Ok(Dashboard {
            user,
            counters,
            message,
            loaded_at: Utc::now(),
        })
    }
}

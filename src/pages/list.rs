use serde_json::Value;

use super::{Confirm, Console, Deletion, PageScope};
use crate::error::Result;
use crate::models::UserProfile;
use crate::resources::{cell_text, record_id, Resource};

/// A fetched collection and the rows currently shown.
#[derive(Debug, Clone)]
pub struct ListPage {
    resource: Resource,
    user: UserProfile,
    rows: Vec<Value>,
}

impl ListPage {
    pub fn new(resource: Resource, user: UserProfile, rows: Vec<Value>) -> Self {
        Self { resource, user, rows }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Value> {
        self.rows.iter().find(|row| record_id(row).as_deref() == Some(id))
    }

    /// Case-insensitive search over the visible columns. An empty term keeps every row.
    pub fn filter(&self, term: &str) -> Vec<&Value> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.rows.iter().collect();
        }

        let columns = self.resource.columns();
        self.rows
            .iter()
            .filter(|row| {
                columns
                    .iter()
                    .filter(|c| c.header != "ID")
                    .any(|c| cell_text(row, c).to_lowercase().contains(&term))
            })
            .collect()
    }

    /// Deletes one row after confirmation and drops it from the page without
    /// re-fetching. On failure the rows stay as they were.
    pub async fn delete(
        &mut self,
        console: &Console,
        id: &str,
        confirm: &dyn Confirm,
        scope: &PageScope,
    ) -> Result<Deletion> {
        let label = self.find(id).map(|row| self.resource.record_label(row));
        let outcome = console
            .delete(self.resource, id, label.as_deref(), confirm, scope)
            .await?;

        if outcome == Deletion::Deleted {
            self.rows.retain(|row| record_id(row).as_deref() != Some(id));
        }
        Ok(outcome)
    }
}

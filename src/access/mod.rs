//! Client-side role gate.
//!
//! Every area of the console is allowed to a fixed set of role slugs. A user
//! is authorized when any of their slugs is in the set. This only decides what
//! the console offers; the backend enforces the real permissions.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};
use crate::models::UserProfile;

pub const ADMIN: &str = "admin";
pub const IT_LEAD: &str = "resp_ti";
/// Accounting lead slug as the backend permission classes spell it.
pub const ACCOUNTING_LEAD: &str = "resp_adm_contable";
/// Accounting lead slug as the inventory and event pages spell it.
pub const ACCOUNTING_LEAD_SHORT: &str = "resp_admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Users,
    Roles,
    Employees,
    Positions,
    Inventory,
    Events,
    Tasks,
    RoiDocuments,
}

impl Area {
    pub const ALL: [Area; 8] = [
        Area::Users,
        Area::Roles,
        Area::Employees,
        Area::Positions,
        Area::Inventory,
        Area::Events,
        Area::Tasks,
        Area::RoiDocuments,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Area::Users => "usuarios",
            Area::Roles => "roles",
            Area::Employees => "empleados",
            Area::Positions => "cargos",
            Area::Inventory => "inventario",
            Area::Events => "eventos",
            Area::Tasks => "tareas",
            Area::RoiDocuments => "documentos ROI",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `Manage` gates a page and its mutations; `Overview` gates the dashboard
/// counters and the navigation entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Manage,
    Overview,
}

/// True when the profile holds at least one of the allowed slugs.
pub fn allows(profile: Option<&UserProfile>, allowed: &[&str]) -> bool {
    match profile {
        Some(user) => user.roles.iter().any(|r| allowed.contains(&r.slug.as_str())),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTable {
    entries: BTreeMap<(Area, Action), BTreeSet<String>>,
}

impl CapabilityTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The allow-lists the console has always shipped with.
    pub fn console_defaults() -> Self {
        use Action::{Manage, Overview};

        Self::empty()
            .grant(Area::Users, Manage, &[ADMIN, IT_LEAD])
            .grant(Area::Roles, Manage, &[ADMIN])
            .grant(Area::Employees, Manage, &[ADMIN, IT_LEAD])
            .grant(Area::Positions, Manage, &[ADMIN, IT_LEAD])
            .grant(Area::Tasks, Manage, &[ADMIN, IT_LEAD])
            .grant(Area::Inventory, Manage, &[ADMIN, ACCOUNTING_LEAD_SHORT])
            .grant(Area::Events, Manage, &[ADMIN, ACCOUNTING_LEAD_SHORT])
            .grant(Area::RoiDocuments, Manage, &[ADMIN, ACCOUNTING_LEAD_SHORT])
            .grant(Area::Users, Overview, &[ADMIN, IT_LEAD])
            .grant(Area::Roles, Overview, &[ADMIN])
            .grant(Area::Employees, Overview, &[ADMIN, IT_LEAD, ACCOUNTING_LEAD])
            .grant(Area::Positions, Overview, &[ADMIN, IT_LEAD, ACCOUNTING_LEAD])
            .grant(Area::Inventory, Overview, &[ADMIN, ACCOUNTING_LEAD])
            .grant(Area::Events, Overview, &[ADMIN, ACCOUNTING_LEAD])
            .grant(Area::Tasks, Overview, &[ADMIN, ACCOUNTING_LEAD])
            .grant(Area::RoiDocuments, Overview, &[ADMIN, ACCOUNTING_LEAD])
    }

    pub fn grant(mut self, area: Area, action: Action, slugs: &[&str]) -> Self {
        let entry = self.entries.entry((area, action)).or_default();
        entry.extend(slugs.iter().map(|s| s.to_string()));
        self
    }

    /// Rewrites both accounting spellings to `slug` everywhere.
    pub fn with_accounting_slug(mut self, slug: &str) -> Self {
        for allowed in self.entries.values_mut() {
            let had = allowed.remove(ACCOUNTING_LEAD) | allowed.remove(ACCOUNTING_LEAD_SHORT);
            if had {
                allowed.insert(slug.to_string());
            }
        }
        self
    }

    /// Both accounting spellings in use at once, if that is the case.
    pub fn ambiguous_slugs(&self) -> Option<(&'static str, &'static str)> {
        let uses = |slug: &str| self.entries.values().any(|allowed| allowed.contains(slug));
        if uses(ACCOUNTING_LEAD) && uses(ACCOUNTING_LEAD_SHORT) {
            Some((ACCOUNTING_LEAD, ACCOUNTING_LEAD_SHORT))
        } else {
            None
        }
    }

    pub fn allowed_slugs(&self, area: Area, action: Action) -> Vec<&str> {
        self.entries
            .get(&(area, action))
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_authorized(&self, profile: Option<&UserProfile>, area: Area, action: Action) -> bool {
        let Some(allowed) = self.entries.get(&(area, action)) else {
            return false;
        };
        match profile {
            Some(user) => user.roles.iter().any(|r| allowed.contains(&r.slug)),
            None => false,
        }
    }

    /// Like [`is_authorized`](Self::is_authorized) but as an error the pages can show.
    pub fn require<'a>(&self, profile: Option<&'a UserProfile>, area: Area) -> Result<&'a UserProfile> {
        match profile {
            Some(user) if self.is_authorized(Some(user), area, Action::Manage) => Ok(user),
            Some(_) => Err(ConsoleError::not_authorized(format!(
                "No tiene permisos para gestionar {}.",
                area
            ))),
            None => Err(ConsoleError::NotAuthenticated),
        }
    }

    /// Areas shown in the navigation for this profile.
    pub fn visible_areas(&self, profile: Option<&UserProfile>) -> Vec<Area> {
        Area::ALL
            .into_iter()
            .filter(|area| self.is_authorized(profile, *area, Action::Overview))
            .collect()
    }
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self::console_defaults()
    }
}

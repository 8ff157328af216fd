use serde::{Deserialize, Serialize};

/// Role assignment as the backend serializes it. `slug` drives authorization,
/// `nombre` is only for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    #[serde(default)]
    pub nombre: String,
    pub slug: String,
    #[serde(default)]
    pub descripcion: String,
}

/// Profile cached alongside the access token.
///
/// The login endpoint returns a reduced profile (no names, no `is_active`),
/// so everything except `id`, `username` and `roles` falls back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Ordered; the first entry is the primary role shown in the header.
    #[serde(default)]
    pub roles: Vec<Role>,
}

fn default_active() -> bool {
    true
}

impl UserProfile {
    pub fn role_slugs(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.slug.as_str()).collect()
    }

    pub fn has_role(&self, slug: &str) -> bool {
        self.roles.iter().any(|r| r.slug == slug)
    }

    pub fn primary_role(&self) -> Option<&Role> {
        self.roles.first()
    }

    /// "first last", falling back to the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if !full.is_empty() {
            full.to_string()
        } else if !self.username.is_empty() {
            self.username.clone()
        } else {
            "Usuario".to_string()
        }
    }

    pub fn role_label(&self) -> &str {
        match self.primary_role() {
            Some(role) if !role.nombre.is_empty() => &role.nombre,
            _ => "Sin rol asignado",
        }
    }
}

/// Response of `POST /api/auth/token/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    pub user: UserProfile,
}

//! Backend collections the console manages.
//!
//! Records stay opaque JSON; this module only knows where each collection
//! lives, who may manage it, how to show it as a table and which fields a
//! form must fill before submitting.

pub mod display;
pub mod validation;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::access::Area;
use crate::error::{self, ConsoleError};

pub use display::{cell_text, record_id};
pub use validation::{validate, FormMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Roles,
    Positions,
    Employees,
    Brands,
    Categories,
    UnitsOfMeasure,
    StateTypes,
    Products,
    Movements,
    Events,
    Tasks,
    Subtasks,
    RoiDocuments,
}

/// One table column. Several paths are joined with a space ("nombres apellidos").
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub paths: &'static [&'static str],
}

impl Resource {
    pub const ALL: [Resource; 14] = [
        Resource::Users,
        Resource::Roles,
        Resource::Positions,
        Resource::Employees,
        Resource::Brands,
        Resource::Categories,
        Resource::UnitsOfMeasure,
        Resource::StateTypes,
        Resource::Products,
        Resource::Movements,
        Resource::Events,
        Resource::Tasks,
        Resource::Subtasks,
        Resource::RoiDocuments,
    ];

    /// Path segment under `/api/`.
    pub fn slug(&self) -> &'static str {
        match self {
            Resource::Users => "usuarios",
            Resource::Roles => "roles",
            Resource::Positions => "cargos",
            Resource::Employees => "empleados",
            Resource::Brands => "marcas",
            Resource::Categories => "categorias",
            Resource::UnitsOfMeasure => "unidades-medida",
            Resource::StateTypes => "tipos-estado",
            Resource::Products => "productos",
            Resource::Movements => "movimientos",
            Resource::Events => "eventos",
            Resource::Tasks => "tareas",
            Resource::Subtasks => "subtareas",
            Resource::RoiDocuments => "documentos-roi",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Resource::Users => "Usuarios",
            Resource::Roles => "Roles",
            Resource::Positions => "Cargos",
            Resource::Employees => "Empleados",
            Resource::Brands => "Marcas",
            Resource::Categories => "Categorías",
            Resource::UnitsOfMeasure => "Unidades de medida",
            Resource::StateTypes => "Tipos de estado",
            Resource::Products => "Productos",
            Resource::Movements => "Movimientos",
            Resource::Events => "Eventos",
            Resource::Tasks => "Tareas",
            Resource::Subtasks => "Subtareas",
            Resource::RoiDocuments => "Documentos ROI",
        }
    }

    pub fn area(&self) -> Area {
        match self {
            Resource::Users => Area::Users,
            Resource::Roles => Area::Roles,
            Resource::Positions => Area::Positions,
            Resource::Employees => Area::Employees,
            Resource::Brands
            | Resource::Categories
            | Resource::UnitsOfMeasure
            | Resource::StateTypes
            | Resource::Products
            | Resource::Movements => Area::Inventory,
            Resource::Events => Area::Events,
            Resource::Tasks | Resource::Subtasks => Area::Tasks,
            Resource::RoiDocuments => Area::RoiDocuments,
        }
    }

    pub fn collection_path(&self) -> String {
        format!("/api/{}/", self.slug())
    }

    /// Path of one record. Ids that could leave the collection's path are rejected.
    pub fn item_path(&self, id: &str) -> error::Result<String> {
        let id = id.trim();
        let escapes = id.is_empty()
            || id == "."
            || id == ".."
            || id.chars().any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control());
        if escapes {
            return Err(ConsoleError::validation(format!("ID de registro inválido: {:?}", id)));
        }
        Ok(format!("/api/{}/{}/", self.slug(), id))
    }

    pub fn columns(&self) -> &'static [Column] {
        const ID: Column = Column { header: "ID", paths: &["id"] };
        const NOMBRE: Column = Column { header: "Nombre", paths: &["nombre"] };
        const DESCRIPCION: Column = Column { header: "Descripción", paths: &["descripcion"] };

        match self {
            Resource::Users => &[
                ID,
                Column { header: "Usuario", paths: &["username"] },
                Column { header: "Nombre", paths: &["first_name", "last_name"] },
                Column { header: "Correo", paths: &["email"] },
                Column { header: "Roles", paths: &["roles"] },
                Column { header: "Activo", paths: &["is_active"] },
            ],
            Resource::Roles => &[ID, NOMBRE, Column { header: "Slug", paths: &["slug"] }, DESCRIPCION],
            Resource::Positions | Resource::Brands | Resource::Categories | Resource::StateTypes => {
                &[ID, NOMBRE, DESCRIPCION]
            }
            Resource::Employees => &[
                ID,
                Column { header: "Nombre", paths: &["nombres", "apellidos"] },
                Column { header: "Cargo", paths: &["cargo"] },
                Column { header: "Correo", paths: &["correo"] },
                Column { header: "Teléfono", paths: &["telefono"] },
                Column { header: "Activo", paths: &["activo"] },
            ],
            Resource::UnitsOfMeasure => &[
                ID,
                NOMBRE,
                Column { header: "Nomenclatura", paths: &["nomenclatura"] },
            ],
            Resource::Products => &[
                ID,
                Column { header: "Código", paths: &["codigo_producto"] },
                Column { header: "Producto", paths: &["nombre"] },
                Column { header: "Categoría", paths: &["categoria"] },
                Column { header: "Marca", paths: &["marca"] },
                Column { header: "Stock", paths: &["stock"] },
                Column { header: "Estado", paths: &["tipo_estado"] },
            ],
            Resource::Movements => &[
                ID,
                Column { header: "Fecha", paths: &["fecha"] },
                Column { header: "Tipo", paths: &["tipo"] },
                Column { header: "Producto", paths: &["producto"] },
                Column { header: "Cantidad", paths: &["cantidad"] },
                Column { header: "Referencia", paths: &["referencia"] },
            ],
            Resource::Events => &[
                ID,
                NOMBRE,
                Column { header: "Inicio", paths: &["fecha_inicio"] },
                Column { header: "Lugar", paths: &["lugar"] },
                Column { header: "Activo", paths: &["activo"] },
            ],
            Resource::Tasks => &[
                ID,
                Column { header: "Evento", paths: &["evento"] },
                NOMBRE,
                Column { header: "Responsable", paths: &["responsable"] },
                Column { header: "Completada", paths: &["completada"] },
            ],
            Resource::Subtasks => &[
                ID,
                Column { header: "Tarea", paths: &["tarea"] },
                NOMBRE,
                Column { header: "Completada", paths: &["completada"] },
            ],
            Resource::RoiDocuments => &[
                ID,
                Column { header: "Código", paths: &["codigo"] },
                Column { header: "Título", paths: &["titulo"] },
                Column { header: "Cliente", paths: &["cliente"] },
                Column { header: "Proceso", paths: &["estado_proceso"] },
            ],
        }
    }

    /// Field used to name a record in confirmations.
    pub fn label_field(&self) -> &'static str {
        match self {
            Resource::Users => "username",
            Resource::Employees => "nombres",
            Resource::RoiDocuments => "titulo",
            _ => "nombre",
        }
    }

    /// How a record of this collection is called in prompts ("el producto").
    pub fn noun(&self) -> &'static str {
        match self {
            Resource::Users => "el usuario",
            Resource::Roles => "el rol",
            Resource::Positions => "el cargo",
            Resource::Employees => "el empleado",
            Resource::Brands => "la marca",
            Resource::Categories => "la categoría",
            Resource::UnitsOfMeasure => "la unidad de medida",
            Resource::StateTypes => "el tipo de estado",
            Resource::Products => "el producto",
            Resource::Movements => "el movimiento",
            Resource::Events => "el evento",
            Resource::Tasks => "la tarea",
            Resource::Subtasks => "la subtarea",
            Resource::RoiDocuments => "el documento ROI",
        }
    }

    /// Lists a create/edit form needs before it can be filled in.
    pub fn catalogs(&self) -> &'static [Resource] {
        match self {
            Resource::Users => &[Resource::Roles],
            Resource::Employees => &[Resource::Positions],
            Resource::Products => &[
                Resource::Brands,
                Resource::Categories,
                Resource::UnitsOfMeasure,
                Resource::StateTypes,
            ],
            Resource::Movements => &[Resource::Products],
            Resource::Tasks => &[Resource::Events, Resource::Employees],
            Resource::Subtasks => &[Resource::Tasks],
            Resource::RoiDocuments => &[Resource::Events, Resource::Employees],
            _ => &[],
        }
    }

    /// Human label for a record: its label field, else `#<id>`.
    pub fn record_label(&self, record: &Value) -> String {
        match record.get(self.label_field()).and_then(Value::as_str) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => record_id(record).map(|id| format!("#{}", id)).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().trim_matches('/').to_lowercase().replace('_', "-");
        let resource = match key.as_str() {
            "usuarios" | "users" => Resource::Users,
            "roles" => Resource::Roles,
            "cargos" | "positions" => Resource::Positions,
            "empleados" | "employees" => Resource::Employees,
            "marcas" | "brands" => Resource::Brands,
            "categorias" | "categories" => Resource::Categories,
            "unidades-medida" | "unidades" | "units" => Resource::UnitsOfMeasure,
            "tipos-estado" | "state-types" => Resource::StateTypes,
            "productos" | "products" => Resource::Products,
            "movimientos" | "movements" => Resource::Movements,
            "eventos" | "events" => Resource::Events,
            "tareas" | "tasks" => Resource::Tasks,
            "subtareas" | "subtasks" => Resource::Subtasks,
            "documentos-roi" | "roi" | "roi-documents" => Resource::RoiDocuments,
            _ => {
                let known: Vec<&str> = Resource::ALL.iter().map(|r| r.slug()).collect();
                return Err(format!("unknown resource '{}' (expected one of: {})", s, known.join(", ")));
            }
        };
        Ok(resource)
    }
}

use serde_json::Value;

use super::Resource;
use crate::error::{ConsoleError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// PATCH bodies are partial: only the fields present are checked.
    Update,
}

#[derive(Debug, Clone, Copy)]
enum Check {
    /// Present, not null, not a blank string.
    Required,
    /// A number or a numeric string.
    Number,
    /// A number (or numeric string) greater than zero.
    Positive,
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    field: &'static str,
    check: Check,
    message: &'static str,
}

const fn required(field: &'static str, message: &'static str) -> Rule {
    Rule { field, check: Check::Required, message }
}

const fn number(field: &'static str, message: &'static str) -> Rule {
    Rule { field, check: Check::Number, message }
}

const fn positive(field: &'static str, message: &'static str) -> Rule {
    Rule { field, check: Check::Positive, message }
}

const USER_NAME: Rule = required("username", "El nombre de usuario es obligatorio.");
const USER_PASSWORD: Rule = required("password", "La contraseña es obligatoria.");
const ROLE_RULES: [Rule; 2] = [
    required("nombre", "El nombre del rol es obligatorio."),
    required("slug", "El slug del rol es obligatorio."),
];
const POSITION_RULES: [Rule; 1] = [required("nombre", "El nombre del cargo es obligatorio.")];
const EMPLOYEE_RULES: [Rule; 2] = [
    required("nombres", "Nombres y apellidos son obligatorios."),
    required("apellidos", "Nombres y apellidos son obligatorios."),
];
const BRAND_RULES: [Rule; 1] = [required("nombre", "El nombre de la marca es obligatorio.")];
const CATEGORY_RULES: [Rule; 1] = [required("nombre", "El nombre de la categoría es obligatorio.")];
const UNIT_RULES: [Rule; 2] = [
    required("nombre", "Nombre y nomenclatura son obligatorios."),
    required("nomenclatura", "Nombre y nomenclatura son obligatorios."),
];
const STATE_TYPE_RULES: [Rule; 1] = [required("nombre", "El nombre del tipo de estado es obligatorio.")];
const PRODUCT_RULES: [Rule; 6] = [
    required("codigo_producto", "El código del producto es obligatorio."),
    required("nombre", "El nombre del producto es obligatorio."),
    number("stock_minimo_inicial", "El stock mínimo debe ser un número."),
    number("stock", "El stock inicial debe ser un número."),
    required("unidad_medida_id", "Debe seleccionar una unidad de medida."),
    required("tipo_estado_id", "Debe seleccionar un tipo de estado."),
];
const MOVEMENT_RULES: [Rule; 2] = [
    required("producto", "Debe seleccionar un producto."),
    positive("cantidad", "La cantidad debe ser un número mayor que 0."),
];
const EVENT_RULES: [Rule; 2] = [
    required("nombre", "El nombre del evento es obligatorio."),
    required("fecha_inicio", "La fecha de inicio del evento es obligatoria."),
];
const TASK_RULES: [Rule; 2] = [
    required("evento", "Debe seleccionar un evento."),
    required("nombre", "El nombre de la tarea es obligatorio."),
];
const SUBTASK_RULES: [Rule; 2] = [
    required("tarea", "Debe seleccionar una tarea."),
    required("nombre", "El nombre de la subtarea es obligatorio."),
];
const ROI_RULES: [Rule; 2] = [
    required("codigo", "El código y el título del documento son obligatorios."),
    required("titulo", "El código y el título del documento son obligatorios."),
];

fn rules(resource: Resource, mode: FormMode) -> &'static [Rule] {
    match (resource, mode) {
        (Resource::Users, FormMode::Create) => &[USER_NAME, USER_PASSWORD],
        (Resource::Users, FormMode::Update) => &[USER_NAME],
        (Resource::Roles, _) => &ROLE_RULES,
        (Resource::Positions, _) => &POSITION_RULES,
        (Resource::Employees, _) => &EMPLOYEE_RULES,
        (Resource::Brands, _) => &BRAND_RULES,
        (Resource::Categories, _) => &CATEGORY_RULES,
        (Resource::UnitsOfMeasure, _) => &UNIT_RULES,
        (Resource::StateTypes, _) => &STATE_TYPE_RULES,
        (Resource::Products, _) => &PRODUCT_RULES,
        (Resource::Movements, _) => &MOVEMENT_RULES,
        (Resource::Events, _) => &EVENT_RULES,
        (Resource::Tasks, _) => &TASK_RULES,
        (Resource::Subtasks, _) => &SUBTASK_RULES,
        (Resource::RoiDocuments, _) => &ROI_RULES,
    }
}

/// Required-field checks run before a form is submitted. The first failing
/// rule wins, in the order the form lays its fields out.
pub fn validate(resource: Resource, mode: FormMode, body: &Value) -> Result<()> {
    let Some(fields) = body.as_object() else {
        return Err(ConsoleError::validation("El formulario debe ser un objeto JSON."));
    };

    for rule in rules(resource, mode) {
        let value = fields.get(rule.field);
        if mode == FormMode::Update && value.is_none() {
            continue;
        }
        let ok = match rule.check {
            Check::Required => is_filled(value),
            Check::Number => as_number(value).is_some(),
            Check::Positive => as_number(value).is_some_and(|n| n > 0.0),
        };
        if !ok {
            return Err(ConsoleError::validation(rule.message));
        }
    }

    // Users confirm the password twice in the form; the confirmation never leaves the console.
    if resource == Resource::Users {
        if let (Some(password), Some(confirm)) = (fields.get("password"), fields.get("confirm_password")) {
            if password != confirm {
                return Err(ConsoleError::validation(
                    "La contraseña y su confirmación no coinciden.",
                ));
            }
        }
    }

    Ok(())
}

fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

fn as_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

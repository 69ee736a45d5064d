use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{
    validate_ci, validate_email, validate_name, validate_password, validate_phone,
    validate_username,
};

/// Which staff creation modal the form belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    #[default]
    Administrator,
    Employee,
}

impl FormKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            FormKind::Administrator => "/superuser/crear-administrador/",
            FormKind::Employee => "/superuser/crear-empleado/",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormKind::Administrator => "Administrador",
            FormKind::Employee => "Empleado",
        }
    }

    pub fn success_title(&self) -> &'static str {
        match self {
            FormKind::Administrator => "¡Administrador creado exitosamente!",
            FormKind::Employee => "¡Empleado creado exitosamente!",
        }
    }

    pub fn unknown_error(&self) -> &'static str {
        match self {
            FormKind::Administrator => "Error desconocido al crear administrador",
            FormKind::Employee => "Error desconocido al crear empleado",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fields that must be non-blank, in form order
pub const REQUIRED_FIELDS: [&str; 9] = [
    "ci",
    "nombres",
    "paterno",
    "email",
    "username",
    "password",
    "id_cargo",
    "id_turno",
    "fecha_contratacion",
];

/// Administrator / employee creation form.
///
/// `AdminForm` and `EmployeeForm` share this field set; `kind` selects the
/// endpoint and option lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StaffForm {
    #[serde(skip)]
    pub kind: FormKind,
    #[validate(custom(function = "validate_ci"))]
    pub ci: String,
    #[validate(custom(function = "validate_name"))]
    pub nombres: String,
    #[validate(custom(function = "validate_name"))]
    pub paterno: String,
    #[validate(custom(function = "validate_name"))]
    pub materno: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub telefono: String,
    pub direccion: String,
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    pub id_cargo: String,
    pub id_turno: String,
    /// `YYYY-MM-DD`
    pub fecha_contratacion: String,
}

pub type AdminForm = StaffForm;
pub type EmployeeForm = StaffForm;

impl StaffForm {
    /// Empty form with the hire date preset to `today`
    pub fn new(kind: FormKind, today: NaiveDate) -> Self {
        Self {
            kind,
            fecha_contratacion: today.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        let value = match field {
            "ci" => &self.ci,
            "nombres" => &self.nombres,
            "paterno" => &self.paterno,
            "materno" => &self.materno,
            "email" => &self.email,
            "telefono" => &self.telefono,
            "direccion" => &self.direccion,
            "username" => &self.username,
            "password" => &self.password,
            "id_cargo" => &self.id_cargo,
            "id_turno" => &self.id_turno,
            "fecha_contratacion" => &self.fecha_contratacion,
            _ => return None,
        };
        Some(value.as_str())
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "ci" => &mut self.ci,
            "nombres" => &mut self.nombres,
            "paterno" => &mut self.paterno,
            "materno" => &mut self.materno,
            "email" => &mut self.email,
            "telefono" => &mut self.telefono,
            "direccion" => &mut self.direccion,
            "username" => &mut self.username,
            "password" => &mut self.password,
            "id_cargo" => &mut self.id_cargo,
            "id_turno" => &mut self.id_turno,
            "fecha_contratacion" => &mut self.fecha_contratacion,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// Multipart body, trimmed, password untouched
    pub fn to_fields(&self) -> Vec<(String, String)> {
        field_names()
            .iter()
            .filter_map(|name| {
                self.value(name).map(|v| {
                    let v = if *name == "password" { v } else { v.trim() };
                    (name.to_string(), v.to_string())
                })
            })
            .collect()
    }
}

/// Human label of a field, as printed next to its input
pub fn field_label(field: &str) -> &'static str {
    match field {
        "ci" => "Cédula de Identidad",
        "nombres" => "Nombres",
        "paterno" => "Apellido Paterno",
        "materno" => "Apellido Materno",
        "email" => "Email",
        "telefono" => "Teléfono",
        "direccion" => "Dirección",
        "username" => "Nombre de Usuario",
        "password" => "Contraseña",
        "id_cargo" => "Cargo",
        "id_turno" => "Turno",
        "fecha_contratacion" => "Fecha de Contratación",
        _ => "Campo",
    }
}

fn field_names() -> [&'static str; 12] {
    [
        "ci",
        "nombres",
        "paterno",
        "materno",
        "email",
        "telefono",
        "direccion",
        "username",
        "password",
        "id_cargo",
        "id_turno",
        "fecha_contratacion",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hire_date_defaults_to_today() {
        let form = StaffForm::new(FormKind::Employee, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
        assert_eq!(form.fecha_contratacion, "2024-08-01");
        assert_eq!(form.kind.endpoint(), "/superuser/crear-empleado/");
    }

    #[test]
    fn fields_round_trip_through_names() {
        let mut form = StaffForm::default();
        assert!(form.set("ci", " 1234567 "));
        assert!(!form.set("unknown", "x"));
        form.set("password", " clave123 ");

        let fields = form.to_fields();
        assert_eq!(fields.len(), 12);
        assert!(fields.contains(&("ci".to_string(), "1234567".to_string())));
        assert!(fields.contains(&("password".to_string(), " clave123 ".to_string())));
    }
}

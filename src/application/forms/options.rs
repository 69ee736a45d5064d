//! Static select options of the staff creation forms

use super::fields::FormKind;

/// `(value, label)` pair of a `<select>`
pub type SelectOption = (&'static str, &'static str);

const ADMIN_CARGOS: &[SelectOption] = &[
    ("C-01", "Administrador"),
    ("C-02", "Bibliotecario Jefe"),
    ("C-03", "Coordinador"),
];

const EMPLOYEE_CARGOS: &[SelectOption] = &[
    ("C-02", "Bibliotecario"),
    ("C-03", "Asistente de Biblioteca"),
    ("C-04", "Coordinador de Servicios"),
    ("C-05", "Técnico en Sistemas"),
];

const TURNOS: &[SelectOption] = &[("T-01", "Mañana"), ("T-02", "Tarde"), ("T-03", "Noche")];

pub fn cargo_options(kind: FormKind) -> &'static [SelectOption] {
    match kind {
        FormKind::Administrator => ADMIN_CARGOS,
        FormKind::Employee => EMPLOYEE_CARGOS,
    }
}

pub fn turno_options() -> &'static [SelectOption] {
    TURNOS
}

//! Administrator and employee creation forms

pub mod fields;
pub mod options;
pub mod submit;
pub mod validation;

pub use fields::{field_label, AdminForm, EmployeeForm, FormKind, StaffForm, REQUIRED_FIELDS};
pub use options::{cargo_options, turno_options, SelectOption};
pub use submit::{load_draft, StaffFormSubmitter, SubmitOutcome};
pub use validation::{is_weak_password, FormReport, ValidationPhase};

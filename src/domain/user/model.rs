use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{capitalize_first, format_date, format_relative_time};

/// Badge styling attached to an enum value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    /// Bootstrap contextual color (`primary`, `danger`, ...)
    pub color: &'static str,
    /// Font Awesome icon name without the `fa-` prefix
    pub icon: &'static str,
}

/// Library user category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Estudiante,
    Docente,
    Visitante,
    Empleado,
    Administrador,
}

impl UserType {
    pub const ALL: [UserType; 5] = [
        UserType::Estudiante,
        UserType::Docente,
        UserType::Visitante,
        UserType::Empleado,
        UserType::Administrador,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Estudiante => "estudiante",
            UserType::Docente => "docente",
            UserType::Visitante => "visitante",
            UserType::Empleado => "empleado",
            UserType::Administrador => "administrador",
        }
    }

    pub fn badge(&self) -> Badge {
        match self {
            UserType::Estudiante => Badge { color: "primary", icon: "graduation-cap" },
            UserType::Docente => Badge { color: "success", icon: "chalkboard-teacher" },
            UserType::Visitante => Badge { color: "warning", icon: "user-friends" },
            UserType::Empleado => Badge { color: "info", icon: "user-tie" },
            UserType::Administrador => Badge { color: "danger", icon: "user-shield" },
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown user type: {}", s))
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Activo,
    Inactivo,
    Suspendido,
    Pendiente,
}

impl UserStatus {
    pub const ALL: [UserStatus; 4] = [
        UserStatus::Activo,
        UserStatus::Inactivo,
        UserStatus::Suspendido,
        UserStatus::Pendiente,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Activo => "activo",
            UserStatus::Inactivo => "inactivo",
            UserStatus::Suspendido => "suspendido",
            UserStatus::Pendiente => "pendiente",
        }
    }

    pub fn badge(&self) -> Badge {
        match self {
            UserStatus::Activo => Badge { color: "success", icon: "check-circle" },
            UserStatus::Inactivo => Badge { color: "secondary", icon: "pause-circle" },
            UserStatus::Suspendido => Badge { color: "danger", icon: "ban" },
            UserStatus::Pendiente => Badge { color: "warning", icon: "clock" },
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("unknown user status: {}", s))
    }
}

/// A row of the users-management table.
///
/// Presentation (badge color and icon) is derived from `user_type` and `status`,
/// so changing the status can never leave a stale badge behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub ci: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub status: UserStatus,
    pub registration_date: NaiveDate,
    /// `None` means the account was never used
    pub last_access: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Avatar initials, e.g. "NA" for "Nombre1 Apellido1"
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// `#007`
    pub fn display_id(&self) -> String {
        format!("#{:03}", self.id)
    }

    pub fn last_access_label(&self, now: DateTime<Utc>) -> String {
        match self.last_access {
            Some(at) => format_relative_time(at, now),
            None => "Nunca".to_string(),
        }
    }

    /// Fields matched by the free-text search box
    pub fn search_fields(&self) -> [&str; 6] {
        [
            self.username.as_str(),
            self.email.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.ci.as_str(),
            self.phone.as_str(),
        ]
    }

    pub fn details(&self, now: DateTime<Utc>) -> UserDetails {
        UserDetails {
            id: self.display_id(),
            initials: self.initials(),
            full_name: self.full_name(),
            username: self.username.clone(),
            email: self.email.clone(),
            ci: self.ci.clone(),
            phone: self.phone.clone(),
            type_label: capitalize_first(self.user_type.as_str()),
            type_badge: self.user_type.badge(),
            status_label: capitalize_first(self.status.as_str()),
            status_badge: self.status.badge(),
            registered: format_date(self.registration_date),
            last_access: self.last_access_label(now),
            never_accessed: self.last_access.is_none(),
        }
    }
}

/// Everything the "Detalles del Usuario" dialog shows
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetails {
    pub id: String,
    pub initials: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub ci: String,
    pub phone: String,
    pub type_label: String,
    pub type_badge: Badge,
    pub status_label: String,
    pub status_badge: Badge,
    pub registered: String,
    pub last_access: String,
    pub never_accessed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> UserRecord {
        UserRecord {
            id: 7,
            username: "usuario007".into(),
            email: "usuario7@biblioteca.edu.bo".into(),
            first_name: "nombre7".into(),
            last_name: "Apellido7".into(),
            ci: "12345685".into(),
            phone: "+591 71234567".into(),
            user_type: UserType::Docente,
            status: UserStatus::Pendiente,
            registration_date: NaiveDate::from_ymd_opt(2024, 2, 9).unwrap(),
            last_access: None,
        }
    }

    #[test]
    fn status_change_updates_presentation() {
        let mut user = record();
        assert_eq!(user.status.badge().color, "warning");
        user.status = UserStatus::Suspendido;
        assert_eq!(user.status.badge(), Badge { color: "danger", icon: "ban" });
    }

    #[test]
    fn never_accessed_renders_distinctly() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let mut user = record();
        let details = user.details(now);
        assert_eq!(details.last_access, "Nunca");
        assert!(details.never_accessed);

        user.last_access = Some(now - chrono::Duration::hours(3));
        let details = user.details(now);
        assert_eq!(details.last_access, "Hace 3 horas");
        assert!(!details.never_accessed);
    }

    #[test]
    fn display_helpers() {
        let user = record();
        assert_eq!(user.initials(), "NA");
        assert_eq!(user.display_id(), "#007");
        let details = user.details(Utc::now());
        assert_eq!(details.type_label, "Docente");
        assert_eq!(details.registered, "09/02/2024");
    }

    #[test]
    fn enums_parse_and_serialize_lowercase() {
        assert_eq!("administrador".parse::<UserType>(), Ok(UserType::Administrador));
        assert!("admin".parse::<UserType>().is_err());
        assert_eq!("activo".parse::<UserStatus>(), Ok(UserStatus::Activo));

        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["type"], "docente");
        assert_eq!(json["status"], "pendiente");
        assert_eq!(json["firstName"], "nombre7");
        assert!(json["lastAccess"].is_null());
    }
}

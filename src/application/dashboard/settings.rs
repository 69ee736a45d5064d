use serde::{Deserialize, Serialize};
use validator::Validate;

pub const PASSWORD_POLICY_ENDPOINT: &str = "/superuser/api/politicas-password/";
pub const SYSTEM_CONFIG_ENDPOINT: &str = "/superuser/api/configuracion-sistema/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PasswordPolicy {
    #[validate(range(min = 4, max = 128))]
    pub min_length: u32,
    #[validate(range(min = 8, max = 256))]
    pub max_length: u32,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_numbers: bool,
    pub require_special: bool,
    /// Days; 0 disables expiry
    pub password_expiry: u32,
    #[validate(range(min = 1))]
    pub max_attempts: u32,
    /// Minutes
    pub lockout_duration: u32,
    pub history_count: u32,
    pub force_change_first_login: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            require_uppercase: true,
            require_lowercase: true,
            require_numbers: true,
            require_special: false,
            password_expiry: 90,
            max_attempts: 5,
            lockout_duration: 30,
            history_count: 5,
            force_change_first_login: true,
        }
    }
}

impl PasswordPolicy {
    /// Field-level checks plus `min_length <= max_length`
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())?;
        if self.min_length > self.max_length {
            return Err("La longitud mínima no puede superar la máxima".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SystemConfig {
    #[validate(length(min = 1, max = 100))]
    pub nombre_sistema: String,
    #[validate(email)]
    pub email_admin: String,
    pub timezone: String,
    pub idioma: String,
    pub mantenimiento: bool,
    pub registro_publico: bool,
    pub notificaciones_email: bool,
    pub backup_automatico: bool,
    pub logs_detallados: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            nombre_sistema: "Biblioteca Universitaria".to_string(),
            email_admin: "admin@biblioteca.edu.bo".to_string(),
            timezone: "America/La_Paz".to_string(),
            idioma: "es".to_string(),
            mantenimiento: false,
            registro_publico: true,
            notificaciones_email: true,
            backup_automatico: true,
            logs_detallados: false,
        }
    }
}

impl SystemConfig {
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }
}

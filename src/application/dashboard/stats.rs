use serde::{Deserialize, Deserializer, Serialize};

/// Dashboard counters. Missing or `null` values count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    #[serde(deserialize_with = "zero_if_null")]
    pub total_usuarios: u64,
    #[serde(deserialize_with = "zero_if_null")]
    pub total_empleados: u64,
    #[serde(deserialize_with = "zero_if_null")]
    pub total_libros: u64,
    #[serde(deserialize_with = "zero_if_null")]
    pub prestamos_activos: u64,
    #[serde(deserialize_with = "zero_if_null")]
    pub vencidos: u64,
    /// Shown as plain text only when the server sends it
    pub preregistros_pendientes: Option<u64>,
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

impl DashboardStats {
    /// Animated counters, keyed as on the page
    pub fn counters(&self) -> [(&'static str, u64); 5] {
        [
            ("total_usuarios", self.total_usuarios),
            ("total_empleados", self.total_empleados),
            ("total_libros", self.total_libros),
            ("prestamos_activos", self.prestamos_activos),
            ("vencidos", self.vencidos),
        ]
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsPayload {
    #[serde(default)]
    pub data: DashboardStats,
}

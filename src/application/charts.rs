//! Users-growth line chart
//!
//! The chart is kept as a Chart.js-compatible configuration; a renderer only has
//! to serialize [`LineChart::to_config`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::infrastructure::http::{ApiClient, ApiError};
use crate::notifications::NotificationCenter;
use crate::support::errors::AppResult;

// ── Palette ─────────────────────────────────────────────────────

pub const PRIMARY: &str = "#6f42c1";
pub const SUCCESS: &str = "#198754";
pub const WARNING: &str = "#ffc107";

const MONTHS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

// ── Data shapes ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background_color: String,
    #[serde(default = "default_border_width")]
    pub border_width: u32,
    #[serde(default)]
    pub fill: bool,
    #[serde(default)]
    pub tension: f64,
    #[serde(default)]
    pub point_radius: u32,
}

fn default_border_width() -> u32 {
    3
}

impl Dataset {
    fn series(label: &str, data: &[f64], color: &str, background: &str, point_radius: u32) -> Self {
        Self {
            label: label.to_string(),
            data: data.to_vec(),
            border_color: color.to_string(),
            background_color: background.to_string(),
            border_width: 3,
            fill: true,
            tension: 0.4,
            point_radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Series as sent by the server; colours are optional
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesUpdate {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub data: Vec<f64>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartUpdate {
    pub labels: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<SeriesUpdate>,
}

#[derive(Debug, Deserialize)]
struct ChartPayload {
    #[serde(default)]
    data: Option<ChartUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartPeriod {
    Month,
    Year,
}

impl ChartPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartPeriod::Month => "month",
            ChartPeriod::Year => "year",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ChartPeriod::Month => "este mes",
            ChartPeriod::Year => "por año",
        }
    }

    pub fn endpoint(&self) -> String {
        format!("/superuser/api/grafico-usuarios/?periodo={}", self.as_str())
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(ChartPeriod::Month),
            "year" => Ok(ChartPeriod::Year),
            other => Err(format!("unknown chart period: {}", other)),
        }
    }
}

// ── Chart ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub data: ChartData,
}

impl LineChart {
    /// Twelve months of sample growth for students, teachers and visitors
    pub fn users_growth() -> Self {
        let series = |start: f64, step: f64| -> Vec<f64> {
            (0..12).map(|i| start + step * i as f64).collect()
        };
        Self {
            data: ChartData {
                labels: MONTHS.iter().map(|m| m.to_string()).collect(),
                datasets: vec![
                    Dataset::series("Estudiantes", &series(120.0, 15.0), PRIMARY, "rgba(111, 66, 193, 0.3)", 6),
                    Dataset::series("Docentes", &[45., 48., 52., 55., 58., 62., 65., 68., 72., 75., 78., 82.], SUCCESS, "rgba(25, 135, 84, 0.1)", 4),
                    Dataset::series("Visitantes", &[15., 18., 22., 25., 28., 32., 35., 38., 42., 45., 48., 52.], WARNING, "rgba(255, 193, 7, 0.1)", 4),
                ],
            },
        }
    }

    /// Replace the labels and merge incoming series by position.
    ///
    /// Series without a local counterpart are ignored; local series without an
    /// incoming one keep their values.
    pub fn merge(&mut self, update: ChartUpdate) {
        self.data.labels = update.labels;
        for (dataset, incoming) in self.data.datasets.iter_mut().zip(update.datasets) {
            dataset.data = incoming.data;
            if let Some(color) = incoming.border_color {
                dataset.border_color = color;
            }
            if let Some(color) = incoming.background_color {
                dataset.background_color = color;
            }
        }
    }

    /// Full Chart.js configuration
    pub fn to_config(&self) -> Value {
        json!({
            "type": "line",
            "data": self.data,
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": {
                    "legend": {
                        "position": "top",
                        "labels": { "usePointStyle": true, "padding": 20 }
                    },
                    "tooltip": { "borderColor": PRIMARY, "borderWidth": 1, "cornerRadius": 8 }
                },
                "scales": {
                    "x": { "grid": { "display": false } },
                    "y": { "beginAtZero": true, "grid": { "color": "rgba(0, 0, 0, 0.05)" } }
                },
                "interaction": { "intersect": false, "mode": "index" },
                "animation": { "duration": 2000, "easing": "easeInOutQuart" }
            }
        })
    }
}

/// Six months of sample data used when the chart endpoint is unavailable
pub fn fallback_chart_data() -> ChartUpdate {
    let series = |label: &str, data: [f64; 6], border: &str, background: &str| SeriesUpdate {
        label: Some(label.to_string()),
        data: data.to_vec(),
        border_color: Some(border.to_string()),
        background_color: Some(background.to_string()),
    };
    ChartUpdate {
        labels: MONTHS[..6].iter().map(|m| m.to_string()).collect(),
        datasets: vec![
            series("Estudiantes", [120., 135., 150., 165., 180., 195.], PRIMARY, "rgba(111, 66, 193, 0.1)"),
            series("Docentes", [45., 48., 52., 55., 58., 62.], SUCCESS, "rgba(25, 135, 84, 0.1)"),
            series("Visitantes", [15., 18., 22., 25., 28., 32.], WARNING, "rgba(255, 193, 7, 0.1)"),
        ],
    }
}

async fn request_chart_data(client: &ApiClient, period: ChartPeriod) -> AppResult<ChartUpdate> {
    let payload: ChartPayload = client.get_envelope(&period.endpoint()).await?;
    payload.data.ok_or_else(|| {
        ApiError::rejected("Error cargando datos del gráfico").into()
    })
}

/// Chart data for `period`, or [`fallback_chart_data`] when the request fails
pub async fn fetch_users_chart_data(client: &ApiClient, period: ChartPeriod) -> ChartUpdate {
    match request_chart_data(client, period).await {
        Ok(update) => update,
        Err(e) => {
            warn!(%period, error = %e, "Using fallback chart data");
            fallback_chart_data()
        }
    }
}

/// The dashboard's users chart bound to its data source
pub struct UsersChart {
    client: ApiClient,
    notifications: NotificationCenter,
    chart: LineChart,
}

impl UsersChart {
    pub fn new(client: ApiClient, notifications: NotificationCenter) -> Self {
        Self {
            client,
            notifications,
            chart: LineChart::users_growth(),
        }
    }

    pub fn chart(&self) -> &LineChart {
        &self.chart
    }

    /// Reload for `period`. On failure the current chart is kept and an error is shown.
    pub async fn update_period(&mut self, period: ChartPeriod) -> bool {
        match request_chart_data(&self.client, period).await {
            Ok(update) => {
                self.chart.merge(update);
                info!(%period, labels = self.chart.data.labels.len(), "Chart updated");
                self.notifications
                    .info(format!("Gráfico actualizado para {}", period.label()));
                true
            }
            Err(e) => {
                warn!(%period, error = %e, "Chart update failed");
                self.notifications
                    .error(format!("Error al actualizar gráfico: {}", e));
                false
            }
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────

/// `1.2K`, `3.4M`; smaller values unchanged
pub fn format_chart_number(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1000.0 {
        format!("{:.1}K", value / 1000.0)
    } else {
        value.to_string()
    }
}

/// Distinct colours spaced by the golden angle
pub fn generate_palette(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("hsl({}, 70%, 60%)", (i as f64 * 137.508) % 360.0))
        .collect()
}

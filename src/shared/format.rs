//! Display helpers shared by tables, dialogs and reports.

use chrono::{DateTime, NaiveDate, Utc};

/// `dd/mm/yyyy`, as the es-BO locale renders dates.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// "Hace menos de 1 hora", "Hace 3 horas", "Hace 1 día", ...
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - then).num_hours();
    if hours < 1 {
        return "Hace menos de 1 hora".to_string();
    }
    if hours < 24 {
        return format!("Hace {} hora{}", hours, if hours > 1 { "s" } else { "" });
    }
    let days = hours / 24;
    format!("Hace {} día{}", days, if days > 1 { "s" } else { "" })
}

pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Thousands grouped with `.` (es locale): 12345 -> "12.345".
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// File name with the current date appended: `prefix_YYYY-MM-DD.ext`.
pub fn date_stamped_filename(prefix: &str, date: NaiveDate, extension: &str) -> String {
    format!("{}_{}.{}", prefix, date.format("%Y-%m-%d"), extension)
}

//! Spreadsheet export of user records

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::domain::UserRecord;
use crate::shared::{capitalize_first, format_date};
use crate::support::errors::InfraError;

const HEADERS: [&str; 11] = [
    "ID",
    "Usuario",
    "Nombre",
    "Apellido",
    "Email",
    "CI",
    "Teléfono",
    "Tipo",
    "Estado",
    "Fecha de registro",
    "Último acceso",
];

/// Build an `.xlsx` workbook with one row per user, plus a header row.
pub fn users_to_xlsx(users: &[UserRecord], now: DateTime<Utc>) -> Result<Vec<u8>, InfraError> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name("Usuarios")?;

    let bold = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (i, user) in users.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_number(row, 0, user.id)?;
        worksheet.write_string(row, 1, &user.username)?;
        worksheet.write_string(row, 2, &user.first_name)?;
        worksheet.write_string(row, 3, &user.last_name)?;
        worksheet.write_string(row, 4, &user.email)?;
        worksheet.write_string(row, 5, &user.ci)?;
        worksheet.write_string(row, 6, &user.phone)?;
        worksheet.write_string(row, 7, capitalize_first(user.user_type.as_str()))?;
        worksheet.write_string(row, 8, capitalize_first(user.status.as_str()))?;
        worksheet.write_string(row, 9, format_date(user.registration_date))?;
        worksheet.write_string(row, 10, user.last_access_label(now))?;
    }

    workbook.push_worksheet(worksheet);
    Ok(workbook.save_to_buffer()?)
}

//! Synthetic records loaded when the users page mounts.

use chrono::{DateTime, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::model::{UserRecord, UserStatus, UserType};

/// Generate `count` users with ids `1..=count`.
///
/// Registration dates fall in 2024; roughly 70 % of the users have a last access
/// equal to `now`, the rest never accessed.
pub fn generate_sample_users<R: Rng + ?Sized>(
    count: u32,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Vec<UserRecord> {
    (1..=count)
        .map(|i| {
            let user_type = *UserType::ALL.choose(rng).unwrap_or(&UserType::Estudiante);
            let status = *UserStatus::ALL.choose(rng).unwrap_or(&UserStatus::Activo);
            let month = rng.gen_range(1..=12);
            let day = rng.gen_range(1..=28);

            UserRecord {
                id: i,
                username: format!("usuario{:03}", i),
                email: format!("usuario{}@biblioteca.edu.bo", i),
                first_name: format!("Nombre{}", i),
                last_name: format!("Apellido{}", i),
                ci: (12345678 + i).to_string(),
                phone: format!("+591 7{}", rng.gen_range(1_000_000..10_000_000)),
                user_type,
                status,
                registration_date: NaiveDate::from_ymd_opt(2024, month, day)
                    .unwrap_or_default(),
                last_access: rng.gen_bool(0.7).then_some(now),
            }
        })
        .collect()
}

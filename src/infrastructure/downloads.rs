//! Saving server-produced files into the download directory

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::shared::date_stamped_filename;
use crate::support::errors::InfraError;

#[derive(Debug, Clone)]
pub struct Downloads {
    dir: PathBuf,
}

impl Downloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` as `prefix_YYYY-MM-DD.ext`, replacing a same-day file.
    pub fn save(
        &self,
        prefix: &str,
        extension: &str,
        date: NaiveDate,
        bytes: &[u8],
    ) -> Result<PathBuf, InfraError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(date_stamped_filename(prefix, date, extension));
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), size = bytes.len(), "File downloaded");
        Ok(path)
    }
}

//! Data file persistence with file locking.
//!
//! Reads take a shared lock. Writes go to a temp file in the same directory
//! under an exclusive lock and are then renamed over the original.

use crate::records::DataFile;
use crate::{Error, Result};
use fs2::FileExt;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Indentation of the written JSON
const INDENT: &[u8] = b"    ";

impl DataFile {
    /// Load the data file at `path` with a shared lock.
    ///
    /// A missing file yields empty data. An unreadable or corrupted file is an
    /// error: existing data is never replaced with defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No data file at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let data = serde_json::from_str::<DataFile>(&contents).map_err(|e| {
            tracing::warn!("Failed to parse data file {:?}: {}", path, e);
            Error::Json(e)
        })?;

        tracing::debug!(
            "Loaded {} weight entries and {} meals from {:?}",
            data.weight.len(),
            data.meals.len(),
            path
        );
        Ok(data)
    }

    /// Save atomically: temp file, sync, rename over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
            let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
            self.serialize(&mut ser)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved data file to {:?}", path);
        Ok(())
    }

    /// Load, modify and save back.
    ///
    /// Nothing is written when `f` fails.
    pub fn update<F, T>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut DataFile) -> Result<T>,
    {
        let mut data = Self::load(path)?;
        let out = f(&mut data)?;
        data.save(path)?;
        Ok(out)
    }
}

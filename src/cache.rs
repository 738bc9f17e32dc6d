//! JSON fixture files: recorded quotes for the replay provider.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write `data` as pretty JSON. The file is written next to its final
/// location and renamed into place, so readers never see a partial file.
pub fn save_to_file<T: Serialize>(data: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create fixture directory {}", dir.display()))?;
    }
    let staging = path.with_extension("json.tmp");
    {
        let file = File::create(&staging)
            .with_context(|| format!("Failed to create fixture file {}", staging.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, data)
            .with_context(|| format!("Failed to write fixture to {}", staging.display()))?;
        writer.flush()?;
    }
    fs::rename(&staging, path).with_context(|| format!("Failed to move fixture into {}", path.display()))?;
    Ok(())
}

pub fn load_from_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open fixture file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse fixture file {}", path.display()))
}

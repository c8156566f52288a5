//! CSV persistence for the tables passed between pipeline stages.

use anyhow::{Context, Result};
use csv::{Reader, Writer};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;

/// Loads every row of a headered CSV file.
pub fn read_table<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open table: {:?}", path))?;

    let mut reader = Reader::from_reader(file);
    let mut rows = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let row: T = result.with_context(|| format!("Failed to parse row {} of {:?}", i + 1, path))?;
        rows.push(row);
    }

    info!("Loaded {} rows from {:?}", rows.len(), path);
    Ok(rows)
}

/// Writes rows with a header line, creating parent directories as needed.
pub fn write_table<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create table: {:?}", path))?;

    let mut writer = Writer::from_writer(file);
    for row in rows {
        writer.serialize(row).with_context(|| format!("Failed to write row to {:?}", path))?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

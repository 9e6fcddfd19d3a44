//! JSON snapshot of a table.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use analyzer_core::error::{AnalyzerError, Result};
use polars::prelude::*;
use serde_json::{Map, Value};
use tracing::{error, info};

/// Write `frame` to `path` as a JSON array of row objects.
///
/// The document is written to a sibling temporary file and renamed into
/// place, so `path` either keeps its previous content or holds the whole new
/// document.
pub fn export_json(frame: &DataFrame, path: &Path) -> Result<()> {
    let result = write_atomically(frame, path);
    match &result {
        Ok(()) => info!("Data saved successfully to {}", path.display()),
        Err(e) => error!("{}", e),
    }
    result
}

/// Read an exported document back as row objects.
pub fn read_json_rows(path: &Path) -> Result<Vec<Map<String, Value>>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn write_atomically(frame: &DataFrame, path: &Path) -> Result<()> {
    let export_err = |source: PolarsError| AnalyzerError::Export {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| export_err(e.into()))?;
    }

    let tmp = temp_path(path);
    let written = write_document(frame, &tmp)
        .and_then(|()| std::fs::rename(&tmp, path).map_err(PolarsError::from));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp);
        return Err(export_err(e));
    }
    Ok(())
}

fn write_document(frame: &DataFrame, tmp: &Path) -> PolarsResult<()> {
    let mut frame = frame.clone();
    let mut writer = BufWriter::new(File::create(tmp)?);
    JsonWriter::new(&mut writer)
        .with_json_format(JsonFormat::Json)
        .finish(&mut frame)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

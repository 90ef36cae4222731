// src/present/export.rs

use crate::extract::StateRecord;
use anyhow::{anyhow, Context, Result};
use arrow::{csv::WriterBuilder, record_batch::RecordBatch};
use parquet::arrow::ArrowWriter;
use std::{
    fmt,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// One JSON object per line.
    Json,
    Parquet,
}

impl ExportFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        ext.parse().ok()
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" | "jsonl" | "ndjson" => Ok(ExportFormat::Json),
            "parquet" => Ok(ExportFormat::Parquet),
            other => Err(format!("unknown format {:?} (csv, json, parquet)", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => f.write_str("csv"),
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Parquet => f.write_str("parquet"),
        }
    }
}

/// Write the result set to `path`. Output lands in a `.tmp` sibling first and
/// is renamed into place once complete.
pub fn export(
    records: &[StateRecord],
    batch: &RecordBatch,
    path: &Path,
    format: Option<ExportFormat>,
) -> Result<ExportFormat> {
    let format = match format {
        Some(f) => f,
        None => ExportFormat::from_path(path)
            .ok_or_else(|| anyhow!("cannot infer export format from `{}`", path.display()))?,
    };

    let tmp = tmp_path(path);
    if let Err(e) = write_then_rename(records, batch, &tmp, path, format) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    info!(path = %path.display(), %format, rows = batch.num_rows(), "exported");
    Ok(format)
}

fn write_then_rename(
    records: &[StateRecord],
    batch: &RecordBatch,
    tmp: &Path,
    path: &Path,
    format: ExportFormat,
) -> Result<()> {
    let file = File::create(tmp).with_context(|| format!("could not create `{}`", tmp.display()))?;
    let w = BufWriter::new(file);

    let written = match format {
        ExportFormat::Csv => write_csv(batch, w),
        ExportFormat::Json => write_json(records, w),
        ExportFormat::Parquet => write_parquet(batch, w),
    };
    written.with_context(|| format!("writing {} to `{}`", format, tmp.display()))?;

    fs::rename(tmp, path)
        .with_context(|| format!("renaming `{}` → `{}`", tmp.display(), path.display()))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_csv(batch: &RecordBatch, w: BufWriter<File>) -> Result<()> {
    let mut writer = WriterBuilder::new().with_header(true).build(w);
    writer.write(batch)?;
    writer.into_inner().flush()?;
    Ok(())
}

fn write_json(records: &[StateRecord], mut w: BufWriter<File>) -> Result<()> {
    for rec in records {
        serde_json::to_writer(&mut w, rec)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

fn write_parquet(batch: &RecordBatch, w: BufWriter<File>) -> Result<()> {
    let mut writer = ArrowWriter::try_new(w, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

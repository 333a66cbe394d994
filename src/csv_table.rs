//! Result tables as CSV files: the first column holds the row model
//! (unlabeled in the header row), the other columns one model each.

use std::{path::Path, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};

use crate::{
    info,
    io_utils::tempfile_utils::write_file_atomically,
    model_name::ModelName,
    model_table::ModelTable,
    table_view::TableView,
};

pub fn table_view_to_csv(view: &dyn TableView) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(view.table_view_header().iter().map(|s| s.as_bytes()))?;
    for row in view.table_view_body() {
        writer.write_record(row.iter().map(|s| s.as_bytes()))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV data: {}", e.error()))
}

/// Writes via a temporary file, thus the file at `path` is either the
/// old or the complete new version.
pub fn write_table_view_csv(view: &dyn TableView, path: &Path) -> Result<()> {
    let data = table_view_to_csv(view)
        .with_context(|| anyhow!("serializing table {:?} as CSV", view.table_name()))?;
    write_file_atomically(path, data)?;
    info!("written table {:?} to {path:?}", view.table_name());
    Ok(())
}

/// Read a table written by `write_table_view_csv`, checking that rows
/// and columns are exactly `models`, in that order.
pub fn read_model_table<T>(path: &Path, models: &[ModelName]) -> Result<ModelTable<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| anyhow!("opening CSV file {path:?}"))?;

    let headers = reader
        .headers()
        .with_context(|| anyhow!("reading header row of {path:?}"))?
        .clone();
    let column_models: Vec<&str> = headers.iter().skip(1).collect();
    if column_models != models.iter().map(|m| m.as_str()).collect::<Vec<_>>() {
        bail!(
            "columns in {path:?} are {column_models:?}, expected the configured models {:?}",
            models.iter().map(|m| m.as_str()).collect::<Vec<_>>()
        )
    }

    let mut cells = Vec::with_capacity(models.len() * models.len());
    let mut num_rows = 0;
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| anyhow!("reading row {} of {path:?}", i + 1))?;
        let row_model = record.get(0).unwrap_or("");
        let expected = models.get(i).ok_or_else(|| {
            anyhow!("{path:?} has more rows than the {} configured models", models.len())
        })?;
        if row_model != expected.as_str() {
            bail!("row {} of {path:?} is for {row_model:?}, expected {expected}", i + 1)
        }
        for (col, field) in record.iter().skip(1).enumerate() {
            let cell = field.parse::<T>().with_context(|| {
                anyhow!("cell ({row_model}, {}) in {path:?}", models[col])
            })?;
            cells.push(cell);
        }
        num_rows += 1;
    }
    if num_rows != models.len() {
        bail!(
            "{path:?} has {num_rows} rows, expected {} (one per configured model)",
            models.len()
        )
    }

    ModelTable::from_cells(models.to_owned(), cells)
        .ok_or_else(|| anyhow!("{path:?} does not hold a square table"))
}

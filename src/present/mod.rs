// src/present/mod.rs

pub mod export;

use crate::extract::StateRecord;
use anyhow::Result;
use arrow::{
    array::{ArrayRef, StringArray, UInt64Array},
    datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema},
    record_batch::RecordBatch,
    util::pretty::pretty_format_batches,
};
use std::sync::Arc;

pub const COLUMNS: [&str; 3] = ["state", "population", "area"];

/// Arrow schema of the output table.
pub fn schema() -> ArrowSchema {
    ArrowSchema::new(vec![
        ArrowField::new(COLUMNS[0], DataType::Utf8, false),
        ArrowField::new(COLUMNS[1], DataType::UInt64, false),
        ArrowField::new(COLUMNS[2], DataType::UInt64, false),
    ])
}

/// Columnar view of the records, row order untouched.
pub fn to_table(records: &[StateRecord]) -> Result<RecordBatch> {
    let cols: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.name.as_str()),
        )),
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.population),
        )),
        Arc::new(UInt64Array::from_iter_values(records.iter().map(|r| r.area))),
    ];
    RecordBatch::try_new(Arc::new(schema()), cols).map_err(Into::into)
}

/// Render the first `n` rows as a text table.
pub fn preview(batch: &RecordBatch, n: usize) -> Result<String> {
    let head = batch.slice(0, n.min(batch.num_rows()));
    Ok(pretty_format_batches(&[head])?.to_string())
}

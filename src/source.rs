//! Tabular input: CSV files and JSON row arrays become [`RawRecord`]s.

use crate::record::{CellValue, RawRecord};
use std::path::Path;

/// Reads a headered CSV file. Column order is free; every header becomes a
/// column of each record.
pub fn read_csv_path(path: &Path) -> anyhow::Result<Vec<RawRecord>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    read_csv(rdr)
}

pub fn read_csv<R: std::io::Read>(mut rdr: csv::Reader<R>) -> anyhow::Result<Vec<RawRecord>> {
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut out = Vec::new();
    for (idx0, result) in rdr.records().enumerate() {
        let row = result?;
        let mut rec = RawRecord::new(idx0 + 1);
        for (i, header) in headers.iter().enumerate() {
            // Short rows leave trailing columns missing rather than absent.
            let cell = row.get(i).map(CellValue::from_text).unwrap_or(CellValue::Missing);
            rec.set(header, cell);
        }
        out.push(rec);
    }
    Ok(out)
}

/// Converts JSON objects into records. Non-object entries are rejected.
pub fn read_json_rows(rows: &[serde_json::Value]) -> anyhow::Result<Vec<RawRecord>> {
    let mut out = Vec::with_capacity(rows.len());
    for (idx0, v) in rows.iter().enumerate() {
        let Some(obj) = v.as_object() else {
            anyhow::bail!("row {} is not an object", idx0 + 1);
        };
        let mut rec = RawRecord::new(idx0 + 1);
        for (k, cell) in obj {
            rec.set(k, CellValue::from_json(cell));
        }
        out.push(rec);
    }
    Ok(out)
}

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::AppError;
use crate::model::sample::Tick;
use crate::series::SeriesStore;

pub const CSV_HEADER: [&str; 5] = ["Time", "InstrumentA", "InstrumentB", "Spread", "ZScore"];

/// One parsed CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub time: Tick,
    pub price_a: f64,
    pub price_b: f64,
    pub spread: f64,
    pub zscore: Option<f64>,
}

/// Write every sample of `store` as CSV. Undefined z-scores become empty fields.
pub fn write_csv<W: Write>(store: &SeriesStore, writer: W) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for s in store.samples() {
        // `{}` on f64 is the shortest text that parses back to the same value.
        wtr.write_record([
            s.tick.to_string(),
            s.price_a.to_string(),
            s.price_b.to_string(),
            s.spread.to_string(),
            s.zscore.map(|z| z.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(store: &SeriesStore) -> Result<String, AppError> {
    let mut buf = Vec::new();
    write_csv(store, &mut buf)?;
    String::from_utf8(buf).map_err(|e| AppError::Export(e.to_string()))
}

pub fn export_to_path(store: &SeriesStore, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(store, std::io::BufWriter::new(file))
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = store.len(), "CSV exported");
    Ok(store.len())
}

/// Parse CSV produced by [`write_csv`].
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<CsvRow>, AppError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    if headers.iter().ne(CSV_HEADER.iter().copied()) {
        return Err(AppError::Export(format!(
            "unexpected CSV header: {:?}",
            headers.iter().collect::<Vec<_>>()
        )));
    }

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("");
        let num = |i: usize| -> Result<f64, AppError> {
            field(i).parse::<f64>().map_err(|e| {
                AppError::Export(format!("row {} column {}: {}", line + 1, CSV_HEADER[i], e))
            })
        };
        let time = field(0)
            .parse::<Tick>()
            .map_err(|e| AppError::Export(format!("row {} column Time: {}", line + 1, e)))?;
        let zscore = if field(4).is_empty() {
            None
        } else {
            Some(num(4)?)
        };
        rows.push(CsvRow {
            time,
            price_a: num(1)?,
            price_b: num(2)?,
            spread: num(3)?,
            zscore,
        });
    }
    Ok(rows)
}

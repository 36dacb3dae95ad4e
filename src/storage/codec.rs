//! Delimited text encoding of collections, one record per line.
//!
//! Fields holding the delimiter, a quote or a line break are quoted on
//! write and unquoted on read, so every value round-trips unchanged.

use std::io::{Read, Write};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppResult;

fn writer_builder(delimiter: u8) -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'));
    builder
}

fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::None);
    builder
}

/// Write every record in order
pub fn write_records<'a, W, T, I>(writer: W, delimiter: u8, records: I) -> AppResult<()>
where
    W: Write,
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut wtr = writer_builder(delimiter).from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read all well-formed records. A malformed record is logged and skipped;
/// only an I/O failure aborts the read.
pub fn read_records<R, T>(reader: R, delimiter: u8, source: &str) -> AppResult<Vec<T>>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut rdr = reader_builder(delimiter).from_reader(reader);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.deserialize::<T>() {
        match result {
            Ok(record) => records.push(record),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                skipped += 1;
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                tracing::warn!("Skipping malformed record in {} (line {}): {}", source, line, e);
            }
        }
    }

    if skipped > 0 {
        tracing::warn!("{}: loaded {} records, skipped {}", source, records.len(), skipped);
    }
    Ok(records)
}

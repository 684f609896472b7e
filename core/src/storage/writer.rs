use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::{ENRICHED_HEADER, RAW_HEADER};
use crate::error::StorageError;
use crate::record::{CastAttemptRecord, EnrichedRecord};

/// Quote a field if it contains a delimiter, quote or line break.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_row<W: Write>(out: &mut W, fields: &[&str]) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        out.write_all(escape(field).as_bytes())?;
    }
    out.write_all(b"\n")
}

fn write_record_fields<W: Write>(
    out: &mut W,
    record: &CastAttemptRecord,
    level_gap: Option<u32>,
) -> io::Result<()> {
    let skill = record.skill.to_string();
    let level = record.level.to_string();
    let hits = record.hits.to_string();
    let gap = level_gap.map(|g| g.to_string());

    let mut fields = vec![
        skill.as_str(),
        level.as_str(),
        record.class.as_str(),
        record.spell.as_str(),
        hits.as_str(),
        record.outcome.as_str(),
    ];
    if let Some(gap) = gap.as_deref() {
        fields.push(gap);
    }
    write_row(out, &fields)
}

pub fn write_raw<W: Write>(out: &mut W, records: &[CastAttemptRecord]) -> io::Result<()> {
    write_row(out, &RAW_HEADER)?;
    for record in records {
        write_record_fields(out, record, None)?;
    }
    Ok(())
}

pub fn write_enriched<W: Write>(out: &mut W, records: &[EnrichedRecord]) -> io::Result<()> {
    write_row(out, &ENRICHED_HEADER)?;
    for enriched in records {
        write_record_fields(out, &enriched.record, Some(enriched.level_gap))?;
    }
    Ok(())
}

fn write_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), StorageError> {
    let to_err = |e: io::Error| StorageError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(to_err)?;
    let mut out = BufWriter::new(file);
    write(&mut out).map_err(to_err)?;
    out.flush().map_err(to_err)
}

pub fn write_raw_file(path: &Path, records: &[CastAttemptRecord]) -> Result<(), StorageError> {
    write_file(path, |out| write_raw(out, records))?;
    tracing::info!(path = %path.display(), records = records.len(), "Wrote records");
    Ok(())
}

pub fn write_enriched_file(path: &Path, records: &[EnrichedRecord]) -> Result<(), StorageError> {
    write_file(path, |out| write_enriched(out, records))?;
    tracing::info!(path = %path.display(), records = records.len(), "Wrote enriched records");
    Ok(())
}

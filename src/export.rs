//! JSON / JSONL export of records and per-stage chunk logs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{Chunk, ChunkRecord, RemovedChunk};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a value to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
        JsonFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(json)
}

/// Write one JSON value per item, each followed by a newline.
pub fn write_jsonl<W, T, I>(writer: &mut W, items: I, format: JsonFormat) -> Result<usize>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut count = 0;
    for item in items {
        writer.write_all(to_json(&item, format)?.as_bytes())?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    Ok(count)
}

/// Render records as compact JSON lines.
pub fn to_jsonl(records: &[ChunkRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_jsonl(&mut buf, records, JsonFormat::Compact)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Raw chunk as written to the `raw_chunks` log.
#[derive(Serialize)]
struct RawLogEntry<'a> {
    text: &'a str,
    metadata: RawLogMetadata<'a>,
}

#[derive(Serialize)]
struct RawLogMetadata<'a> {
    doc_id: &'a str,
    chunk_index: usize,
}

/// Debug log of every pipeline stage for one run.
///
/// Files are written to `raw_chunks/`, `removed/` and `final_chunks/`
/// under the log directory, named `{doc_id}_{timestamp}.jsonl`. One
/// timestamp is fixed per log so a run's three files line up.
#[derive(Debug, Clone)]
pub struct ChunkLog {
    dir: PathBuf,
    timestamp: String,
    format: JsonFormat,
}

impl ChunkLog {
    /// Create a log rooted at `dir`, stamped with the current time.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_time(dir, Utc::now())
    }

    /// Create a log with an explicit timestamp.
    pub fn with_time(dir: impl Into<PathBuf>, time: DateTime<Utc>) -> Self {
        Self {
            dir: dir.into(),
            timestamp: time.format("%Y%m%d_%H%M%S").to_string(),
            format: JsonFormat::Pretty,
        }
    }

    /// Set the per-entry JSON format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Log root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Timestamp used in file names.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Write the chunker output.
    pub fn write_raw(&self, doc_id: &str, chunks: &[Chunk]) -> Result<PathBuf> {
        let entries = chunks.iter().enumerate().map(|(chunk_index, chunk)| RawLogEntry {
            text: &chunk.text,
            metadata: RawLogMetadata {
                doc_id,
                chunk_index,
            },
        });
        self.write("raw_chunks", doc_id, entries)
    }

    /// Write the chunks dropped by the filter.
    pub fn write_removed(&self, doc_id: &str, removed: &[RemovedChunk]) -> Result<PathBuf> {
        self.write("removed", doc_id, removed)
    }

    /// Write the final records.
    pub fn write_final(&self, doc_id: &str, records: &[ChunkRecord]) -> Result<PathBuf> {
        self.write("final_chunks", doc_id, records)
    }

    fn write<T, I>(&self, stage: &str, doc_id: &str, items: I) -> Result<PathBuf>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let dir = self.dir.join(stage);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}_{}.jsonl", doc_id, self.timestamp));

        let mut writer = BufWriter::new(File::create(&path)?);
        let count = write_jsonl(&mut writer, items, self.format)?;
        writer.flush()?;

        log::info!("Saved {} {} entries to {}", count, stage, path.display());
        Ok(path)
    }
}

//! Persistence of a completed digest table.

use std::{
    borrow::Cow,
    collections::HashMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use tracing::debug;

use crate::error::{BruteError, BruteResult};

/// The recognized output formats, selected by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `digest:plaintext` line per entry.
    Text,
    /// Two columns, digest then plaintext.
    Csv,
    /// A single pretty-printed object mapping digests to plaintexts.
    Json,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> BruteResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("txt") => Ok(OutputFormat::Text),
            Some("csv") => Ok(OutputFormat::Csv),
            Some("json") => Ok(OutputFormat::Json),
            other => Err(BruteError::UnsupportedOutputFormat(
                other.unwrap_or_default().to_owned(),
            )),
        }
    }
}

/// Writes the digest table to `path` in the format matching its extension.
pub fn write_table(path: &Path, table: &HashMap<String, String>) -> BruteResult<()> {
    let format = OutputFormat::from_path(path)?;
    let mut file = BufWriter::new(File::create(path)?);

    match format {
        OutputFormat::Text => {
            for (digest, plaintext) in table {
                writeln!(file, "{digest}:{plaintext}")?;
            }
        }
        OutputFormat::Csv => {
            for (digest, plaintext) in table {
                writeln!(file, "{},{}", csv_field(digest), csv_field(plaintext))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut file, table).map_err(|_| BruteError::Serialize)?;
        }
    }

    file.flush()?;
    debug!(entries = table.len(), path = %path.display(), "table written");

    Ok(())
}

/// Quotes a CSV field only when it contains a separator, quote or newline.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

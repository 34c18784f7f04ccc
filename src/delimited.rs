//! Whole-file delimited text reading: optional zstd decompression, strict decoding,
//! and plain (quote-free) field splitting.

use crate::config::Compression;
use crate::error::TopError;
use encoding_rs::Encoding;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Resolve a WHATWG encoding label.
pub fn encoding_for(label: &str) -> Result<&'static Encoding, TopError> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| TopError::Config(format!("unknown encoding {label:?}")))
}

/// Read `path` fully and decode it. Malformed byte sequences are an error, never replaced.
pub fn read_text(
    path: &Path,
    encoding: &'static Encoding,
    compression: Compression,
) -> Result<String, TopError> {
    let file = File::open(path).map_err(|e| TopError::io(path, e))?;
    let mut bytes = Vec::new();
    match compression {
        Compression::None => {
            BufReader::new(file)
                .read_to_end(&mut bytes)
                .map_err(|e| TopError::io(path, e))?;
        }
        Compression::Zstd => {
            let mut dec = zstd::stream::read::Decoder::new(file).map_err(|e| TopError::io(path, e))?;
            dec.read_to_end(&mut bytes).map_err(|e| TopError::io(path, e))?;
        }
    }
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| TopError::Decode { path: path.to_path_buf(), encoding: encoding.name() })
}

/// One input line split on the delimiter. A literal delimiter is always a boundary.
#[derive(Debug)]
pub struct Record<'a> {
    pub line: u64, // 1-based
    fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    /// Blank lines carry zero fields.
    pub fn parse(line_no: u64, line: &'a str, delimiter: &str) -> Self {
        let fields = if line.is_empty() { Vec::new() } else { line.split(delimiter).collect() };
        Self { line: line_no, fields }
    }

    /// Field at a 1-based `column`.
    pub fn field(&self, column: usize) -> Result<&'a str, TopError> {
        column
            .checked_sub(1)
            .and_then(|i| self.fields.get(i).copied())
            .ok_or(TopError::Index { line: self.line, column, fields: self.fields.len() })
    }

    /// Unsigned integer at a 1-based `column`; surrounding whitespace is tolerated.
    pub fn integer(&self, column: usize) -> Result<u64, TopError> {
        let raw = self.field(column)?;
        raw.trim().parse::<u64>().map_err(|_| TopError::Value {
            line: self.line,
            column,
            value: raw.to_string(),
            expected: "a non-negative integer",
        })
    }
}

/// Iterate the records of an already decoded text. `\n` and `\r\n` both end a line.
pub fn records<'a>(text: &'a str, delimiter: &'a str) -> impl Iterator<Item = Record<'a>> + 'a {
    text.lines()
        .enumerate()
        .map(move |(i, line)| Record::parse(i as u64 + 1, line, delimiter))
}

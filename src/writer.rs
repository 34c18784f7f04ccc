//! Ranked output: sort a table by descending weight, then ascending item, and write
//! it as `<weight>\t<item>` lines.

use crate::counting::{FlatTable, Weight};
use crate::error::TopError;
use encoding_rs::Encoding;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Drain `table` into its total order.
pub fn ranked(table: FlatTable) -> Vec<(String, Weight)> {
    let mut entries = table.into_entries();
    entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

/// Render ranked entries, one `<weight>\t<item>\n` line each.
pub fn render(entries: &[(String, Weight)]) -> String {
    let mut out = String::with_capacity(entries.iter().map(|(k, _)| k.len() + 8).sum());
    for (item, weight) in entries {
        let _ = writeln!(out, "{weight}\t{item}");
    }
    out
}

/// Render and encode the top of `table` bound for `path`. Characters the encoding
/// cannot represent are an error, never replaced.
pub fn encode_top(table: FlatTable, path: &Path, encoding: &'static Encoding) -> Result<Vec<u8>, TopError> {
    let text = render(&ranked(table));
    let (bytes, _, unmappable) = encoding.encode(&text);
    if unmappable {
        return Err(TopError::Encode { path: path.to_path_buf(), encoding: encoding.name() });
    }
    Ok(bytes.into_owned())
}

/// Write already encoded bytes to `path`, creating parent directories.
pub fn write_encoded(path: &Path, bytes: &[u8]) -> Result<(), TopError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| TopError::io(dir, e))?;
    }
    let file = File::create(path).map_err(|e| TopError::io(path, e))?;
    let mut w = BufWriter::new(file);
    w.write_all(bytes).map_err(|e| TopError::io(path, e))?;
    w.flush().map_err(|e| TopError::io(path, e))?;
    Ok(())
}

pub fn write_top(table: FlatTable, path: &Path, encoding: &'static Encoding) -> Result<(), TopError> {
    let bytes = encode_top(table, path, encoding)?;
    write_encoded(path, &bytes)
}

use crate::config::{Compression, TopOptions};
use crate::error::TopError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One source file to process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileJob {
    pub name: String, // base name, without extension
    pub path: PathBuf,
}

fn source_suffix(ext: &str, compression: Compression) -> String {
    match compression {
        Compression::None => ext.to_string(),
        Compression::Zstd => format!("{ext}.zst"),
    }
}

pub fn source_path(dir: &Path, name: &str, ext: &str, compression: Compression) -> PathBuf {
    dir.join(format!("{name}{}", source_suffix(ext, compression)))
}

/// Files directly under `dir` whose names end with the source suffix, sorted by name.
pub fn discover_names(dir: &Path, ext: &str, compression: Compression) -> Result<Vec<String>, TopError> {
    let suffix = source_suffix(ext, compression);
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let ent = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            TopError::io(path, e.into())
        })?;
        if !ent.file_type().is_file() {
            continue;
        }
        let Some(file_name) = ent.file_name().to_str() else {
            tracing::warn!(path = %ent.path().display(), "skipping source with a non-UTF-8 file name");
            continue;
        };
        if let Some(stem) = file_name.strip_suffix(suffix.as_str()) {
            if !stem.is_empty() {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Explicit names when configured, otherwise everything discovered in `input_dir`.
pub fn plan_files(opts: &TopOptions) -> Result<Vec<FileJob>, TopError> {
    let names = match &opts.names {
        Some(names) => names.clone(),
        None => discover_names(&opts.input_dir, &opts.extension, opts.compression)?,
    };
    Ok(names
        .into_iter()
        .map(|name| FileJob {
            path: source_path(&opts.input_dir, &name, &opts.extension, opts.compression),
            name,
        })
        .collect())
}

/// `<root>/<name><ext>`
pub fn flat_output(root: &Path, name: &str, ext: &str) -> PathBuf {
    root.join(format!("{name}{ext}"))
}

/// `<root>/<name>/<key><ext>`. `%`, `/` and `\` in `key` are percent-escaped, so
/// distinct keys never share a file and none leaves the per-source directory.
pub fn partition_output(root: &Path, name: &str, key: &str, ext: &str) -> PathBuf {
    root.join(name).join(format!("{}{ext}", escape_key(key)))
}

fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            '\\' => out.push_str("%5C"),
            c => out.push(c),
        }
    }
    out
}

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Write `lines` joined by `\n` (with a trailing newline) to `path`.
pub fn write_lines(path: &Path, lines: &[&str]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Write a zstd-compressed text file containing `lines`.
pub fn write_zst_lines(path: &Path, lines: &[&str]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Read a text file line-by-line (keeps empty lines out).
pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(f);
    r.lines().map(|l| l.unwrap()).filter(|s| !s.is_empty()).collect()
}

/// Parse `<count>\t<item>` lines into pairs, preserving order.
pub fn read_top(path: &Path) -> Vec<(u64, String)> {
    read_lines(path)
        .into_iter()
        .map(|line| {
            let (n, item) = line.split_once('\t').unwrap();
            (n.parse().unwrap(), item.to_string())
        })
        .collect()
}

/// A tiny query log, tab-delimited: query, region id, count.
///
///   "Rust book"     1  3
///   "rust book"     1  2
///   "weather"       2  5
///   "Weather"       7  1
///   "rust  tokio"   2  4
///
/// Also writes `ID_Regions.txt` mapping 1→US, 2→RU (7 is unknown).
/// Returns (input_dir, output_dir, key_file).
pub fn make_query_log() -> (PathBuf, PathBuf, PathBuf) {
    let base = tempfile::tempdir().unwrap().into_path();
    let input = base.join("Data");
    write_lines(
        &input.join("queries.txt"),
        &[
            "Rust book\t1\t3",
            "rust book\t1\t2",
            "weather\t2\t5",
            "Weather\t7\t1",
            "rust  tokio\t2\t4",
        ],
    );
    let key_file = base.join("ID_Regions.txt");
    write_lines(&key_file, &["1\tUS", "2\tRU"]);
    (input, base.join("Output"), key_file)
}

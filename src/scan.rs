//! One-pass record scan over a decoded source: extract, normalize, split, filter and
//! count every row into the file's aggregation table.

use crate::config::{Compression, TopOptions};
use crate::counting::{Aggregation, FlatTable, PartitionedTable, Weight};
use crate::date::day_bucket;
use crate::delimited::{encoding_for, read_text, records, Record};
use crate::error::TopError;
use crate::events::{Event, EventSink};
use crate::filters::{passes, Compliance};
use crate::paths::FileJob;
use crate::transform::{Lookup, TransformTable};
use encoding_rs::Encoding;
use regex::Regex;
use std::borrow::Cow;

/// Per-file counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileStats {
    pub lines: u64,
    pub kept: u64,    // sub-items counted
    pub dropped: u64, // sub-items rejected by the compliance test
    pub key_misses: u64,
    pub total_weight: Weight,
}

#[derive(Debug)]
pub struct FileTally {
    pub table: Aggregation,
    pub stats: FileStats,
}

/// Routes rows to per-key tables.
pub struct Partitioner {
    pub column: usize,
    pub table: Option<TransformTable>,
    pub default_key: String,
}

/// Compiled, ready-to-run form of [`TopOptions`].
pub struct RecordPipeline {
    encoding: &'static Encoding,
    compression: Compression,
    delimiter: String,
    query_column: usize,
    count_column: Option<usize>,
    lowercase: bool,
    day_bucketing: bool,
    splitter: Option<Regex>,
    compliance: Option<Compliance>,
    partitioner: Option<Partitioner>,
}

struct Row<'a> {
    item: Cow<'a, str>,
    weight: Weight,
}

impl RecordPipeline {
    /// Validate options, compile patterns and load the key table if one is configured.
    /// An empty split pattern leaves items whole.
    pub fn compile(opts: &TopOptions) -> Result<Self, TopError> {
        opts.validate()?;
        let splitter = opts
            .split_pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| Regex::new(p).map_err(|e| TopError::Config(format!("invalid split pattern {p:?}: {e}"))))
            .transpose()?;
        let compliance = opts.compliance_test.as_ref().map(Compliance::compile).transpose()?;
        let partitioner = match &opts.split_by_key {
            Some(sk) => Some(Partitioner {
                column: sk.key_column,
                table: sk.transform.as_ref().map(TransformTable::load).transpose()?,
                default_key: sk.default_key.clone(),
            }),
            None => None,
        };
        Ok(Self {
            encoding: encoding_for(&opts.encoding)?,
            compression: opts.compression,
            delimiter: opts.delimiter.clone(),
            query_column: opts.query_column,
            count_column: opts.count_column,
            lowercase: opts.lowercase,
            day_bucketing: opts.day_bucketing,
            splitter,
            compliance,
            partitioner,
        })
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn process_file(&self, job: &FileJob, sink: &mut dyn EventSink) -> Result<FileTally, TopError> {
        let text = read_text(&job.path, self.encoding, self.compression)?;
        self.process_text(&job.name, &text, sink)
    }

    /// Count every row of `text`. Any malformed row fails the whole text.
    pub fn process_text(&self, name: &str, text: &str, sink: &mut dyn EventSink) -> Result<FileTally, TopError> {
        let mut stats = FileStats::default();
        let table = match &self.partitioner {
            None => {
                let mut t = FlatTable::new();
                for rec in records(text, &self.delimiter) {
                    stats.lines += 1;
                    let row = self.row(&rec)?;
                    for part in self.kept_parts(&row.item, &mut stats) {
                        stats.total_weight = self.checked(&rec, stats.total_weight.checked_add(row.weight), row.weight)?;
                        self.checked(&rec, t.add(part, row.weight), row.weight)?;
                    }
                }
                Aggregation::Flat(t)
            }
            Some(p) => {
                let mut t = PartitionedTable::new();
                for rec in records(text, &self.delimiter) {
                    stats.lines += 1;
                    let row = self.row(&rec)?;
                    let parts = self.kept_parts(&row.item, &mut stats);
                    if parts.is_empty() {
                        continue;
                    }
                    let raw = rec.field(p.column)?;
                    let key = match &p.table {
                        None => raw,
                        Some(table) => match table.lookup(raw) {
                            Lookup::Found(k) => k,
                            Lookup::Missing => {
                                stats.key_misses += 1;
                                sink.emit(Event::KeyNotInTable {
                                    name: name.to_string(),
                                    line: rec.line,
                                    key: raw.to_string(),
                                    substituted: p.default_key.clone(),
                                });
                                p.default_key.as_str()
                            }
                        },
                    };
                    for part in parts {
                        stats.total_weight = self.checked(&rec, stats.total_weight.checked_add(row.weight), row.weight)?;
                        self.checked(&rec, t.add(key, part, row.weight), row.weight)?;
                    }
                }
                Aggregation::Partitioned(t)
            }
        };
        Ok(FileTally { table, stats })
    }

    fn row<'a>(&self, rec: &Record<'a>) -> Result<Row<'a>, TopError> {
        let raw = rec.field(self.query_column)?;
        let weight = match self.count_column {
            Some(c) => rec.integer(c)?,
            None => 1,
        };
        let mut item = Cow::Borrowed(raw);
        if self.lowercase {
            item = Cow::Owned(raw.to_lowercase());
        }
        if self.day_bucketing {
            item = Cow::Owned(day_bucket(&item, rec.line, self.query_column)?);
        }
        Ok(Row { item, weight })
    }

    /// Turn an overflowed sum into a Value error on the weight column of `rec`.
    fn checked(&self, rec: &Record<'_>, sum: Option<Weight>, weight: Weight) -> Result<Weight, TopError> {
        sum.ok_or_else(|| TopError::Value {
            line: rec.line,
            column: self.count_column.unwrap_or(self.query_column),
            value: weight.to_string(),
            expected: "a weight whose running total fits in 64 bits",
        })
    }

    /// Split `item` (if configured) and keep the pieces passing the compliance test.
    /// Empty pieces are kept.
    fn kept_parts<'i>(&self, item: &'i str, stats: &mut FileStats) -> Vec<&'i str> {
        let parts: Vec<&str> = match &self.splitter {
            Some(re) => re.split(item).collect(),
            None => vec![item],
        };
        let total = parts.len();
        let kept: Vec<&str> = parts
            .into_iter()
            .filter(|p| passes(self.compliance.as_ref(), p))
            .collect();
        stats.kept += kept.len() as u64;
        stats.dropped += (total - kept.len()) as u64;
        kept
    }
}

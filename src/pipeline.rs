use crate::config::{Action, CheckType, Compression, SplitByKey, TopOptions};
use crate::counting::Aggregation;
use crate::error::{ErrorKind, TopError};
use crate::events::{Event, EventSink};
use crate::paths::{flat_output, partition_output, plan_files, FileJob};
use crate::scan::{FileStats, RecordPipeline};
use crate::util::init_tracing_once;
use crate::writer::{encode_top, write_encoded};
use anyhow::{Context, Result};
use encoding_rs::Encoding;
use std::path::{Path, PathBuf};

/// Builder and runner for a tops job over a directory of sources.
#[derive(Clone, Debug, Default)]
pub struct QueryTop {
    pub(crate) opts: TopOptions,
}

/// Outcome of one source that was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReport {
    pub name: String,
    pub stats: FileStats,
    pub outputs: Vec<PathBuf>,
}

/// A source skipped because of an Index, Value, Decode or Encode error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedFile {
    pub name: String,
    pub kind: ErrorKind,
    pub error: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub failed: Vec<FailedFile>,
}

impl QueryTop {
    pub fn new() -> Self {
        Self { opts: TopOptions::default() }
    }
    pub fn from_options(opts: TopOptions) -> Self {
        Self { opts }
    }
    pub fn options(&self) -> &TopOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn input_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_input_dir(dir); self }
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_output_dir(dir); self }
    pub fn names<I, S>(mut self, names: I) -> Self where I: IntoIterator<Item = S>, S: Into<String> { self.opts = self.opts.with_names(names); self }
    pub fn extension(mut self, ext: impl Into<String>) -> Self { self.opts = self.opts.with_extension(ext); self }
    pub fn encoding(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_encoding(label); self }
    pub fn compression(mut self, c: Compression) -> Self { self.opts = self.opts.with_compression(c); self }
    pub fn delimiter(mut self, d: impl Into<String>) -> Self { self.opts = self.opts.with_delimiter(d); self }
    pub fn query_column(mut self, col: usize) -> Self { self.opts = self.opts.with_query_column(col); self }
    pub fn count_column(mut self, col: usize) -> Self { self.opts = self.opts.with_count_column(col); self }
    pub fn lowercase(mut self, yes: bool) -> Self { self.opts = self.opts.with_lowercase(yes); self }
    pub fn split_pattern(mut self, p: impl Into<String>) -> Self { self.opts = self.opts.with_split_pattern(p); self }
    pub fn compliance_test(mut self, check: CheckType, action: Action) -> Self { self.opts = self.opts.with_compliance_test(check, action); self }
    pub fn split_by_key(mut self, split: SplitByKey) -> Self { self.opts = self.opts.with_split_by_key(split); self }
    pub fn day_bucketing(mut self, yes: bool) -> Self { self.opts = self.opts.with_day_bucketing(yes); self }

    /// Process every planned source in order and write its top(s).
    ///
    /// Index, Value, Decode and Encode errors skip the offending source (a `FileFailed`
    /// event is emitted and it is listed in the report). Configuration and I/O
    /// errors abort the run.
    pub fn run(&self, sink: &mut dyn EventSink) -> Result<RunReport> {
        init_tracing_once();
        let pipeline = RecordPipeline::compile(&self.opts).context("preparing run")?;
        let files = plan_files(&self.opts)
            .with_context(|| format!("listing sources in {}", self.opts.input_dir.display()))?;
        if files.is_empty() {
            tracing::warn!(dir = %self.opts.input_dir.display(), ext = %self.opts.extension, "no source files found");
        }

        let mut report = RunReport::default();
        sink.emit(Event::RunStarted { files: files.len() });

        for job in &files {
            sink.emit(Event::FileStarted { name: job.name.clone(), path: job.path.clone() });
            let written = pipeline.process_file(job, sink).and_then(|tally| {
                let outputs = write_tally(tally.table, &self.opts, job, pipeline.encoding())?;
                Ok((tally.stats, outputs))
            });
            let (stats, outputs) = match written {
                Ok(w) => w,
                Err(e) if e.is_file_fatal() => {
                    let error = format!("{}: {e}", job.path.display());
                    sink.emit(Event::FileFailed { name: job.name.clone(), error: error.clone() });
                    report.failed.push(FailedFile { name: job.name.clone(), kind: e.kind(), error });
                    continue;
                }
                Err(e) => return Err(e).with_context(|| format!("processing {}", job.path.display())),
            };

            sink.emit(Event::FileFinished {
                name: job.name.clone(),
                lines: stats.lines,
                outputs: outputs.len(),
            });
            report.files.push(FileReport { name: job.name.clone(), stats, outputs });
        }

        sink.emit(Event::RunFinished { done: report.files.len(), failed: report.failed.len() });
        Ok(report)
    }
}

/// Drain a file's table into `<out>/<name><ext>` or `<out>/<name>/<key><ext>`.
/// Every top is encoded before the first one is written.
fn write_tally(
    table: Aggregation,
    opts: &TopOptions,
    job: &FileJob,
    encoding: &'static Encoding,
) -> Result<Vec<PathBuf>, TopError> {
    let encoded = match table {
        Aggregation::Flat(t) => {
            let path = flat_output(&opts.output_dir, &job.name, &opts.extension);
            vec![(encode_top(t, &path, encoding)?, path)]
        }
        Aggregation::Partitioned(t) => t
            .into_sorted_parts()
            .into_iter()
            .map(|(key, part)| {
                let path = partition_output(&opts.output_dir, &job.name, &key, &opts.extension);
                encode_top(part, &path, encoding).map(|bytes| (bytes, path))
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    let mut outputs = Vec::with_capacity(encoded.len());
    for (bytes, path) in encoded {
        write_encoded(&path, &bytes)?;
        outputs.push(path);
    }
    Ok(outputs)
}

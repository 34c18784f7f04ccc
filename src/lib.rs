mod config;
mod date;
mod delimited;
mod error;
mod paths;

mod filters;
mod transform;
mod counting;
mod scan;
mod writer;

mod events;
mod progress;
mod util;
mod pipeline;

pub use crate::config::{Action, CheckType, ComplianceTest, Compression, KeyTransform, SplitByKey, TopOptions};
pub use crate::error::{ErrorKind, TopError};
pub use crate::pipeline::{FailedFile, FileReport, QueryTop, RunReport};

// Building blocks, usable without the directory runner.
pub use crate::counting::{Aggregation, FlatTable, PartitionedTable, Weight};
pub use crate::date::day_bucket;
pub use crate::delimited::{encoding_for, read_text, records, Record};
pub use crate::filters::{passes, Check, Compliance};
pub use crate::paths::{discover_names, flat_output, partition_output, plan_files, source_path, FileJob};
pub use crate::scan::{FileStats, FileTally, Partitioner, RecordPipeline};
pub use crate::transform::{Lookup, TransformTable};
pub use crate::writer::{encode_top, ranked, render, write_encoded, write_top};

// Event sinks and progress.
pub use crate::events::{Event, EventSink, NullSink, RecordingSink, TracingSink};
pub use crate::progress::{make_count_progress, ProgressSink};

pub use crate::util::init_tracing_once;

use anyhow::{Context, Result};
use querytop::{init_tracing_once, ProgressSink, QueryTop, TopOptions, TracingSink};
use std::path::PathBuf;

// Usage: querytop [options.json]
fn main() -> Result<()> {
    init_tracing_once();

    let opts = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => TopOptions::load(&path).with_context(|| format!("loading {}", path.display()))?,
        None => TopOptions::default(),
    };

    let mut sink = ProgressSink::new(TracingSink, "Building tops");
    let report = QueryTop::from_options(opts).run(&mut sink)?;

    for f in &report.failed {
        eprintln!("skipped {}: {}", f.name, f.error);
    }
    println!("Wrote {} top(s), skipped {}", report.files.len(), report.failed.len());
    Ok(())
}

//! Count-style progress bar over source files, exposed as an event sink.

use crate::events::{Event, EventSink};
use indicatif::{ProgressBar, ProgressStyle};

pub fn make_count_progress(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
         elapsed: {elapsed_precise}  eta: {eta_precise}",
    ) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Draws a bar advancing once per finished or failed file, then forwards every event
/// to `inner`.
pub struct ProgressSink<S> {
    inner: S,
    label: String,
    pb: Option<ProgressBar>,
}

impl<S: EventSink> ProgressSink<S> {
    pub fn new(inner: S, label: impl Into<String>) -> Self {
        Self { inner, label: label.into(), pb: None }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for ProgressSink<S> {
    fn emit(&mut self, event: Event) {
        match &event {
            Event::RunStarted { files } => {
                self.pb = Some(make_count_progress(*files as u64, &self.label));
            }
            Event::FileFinished { .. } | Event::FileFailed { .. } => {
                if let Some(pb) = &self.pb {
                    pb.inc(1);
                }
            }
            Event::RunFinished { done, failed } => {
                if let Some(pb) = self.pb.take() {
                    pb.finish_with_message(format!("{done} done, {failed} failed"));
                }
            }
            _ => {}
        }
        match &self.pb {
            Some(pb) => pb.suspend(|| self.inner.emit(event)),
            None => self.inner.emit(event),
        }
    }
}

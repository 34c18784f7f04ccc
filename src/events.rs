//! Structured run events and the sinks that receive them.

use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    RunStarted { files: usize },
    FileStarted { name: String, path: PathBuf },
    /// A partition key was not in the transform table and `substituted` was used.
    KeyNotInTable { name: String, line: u64, key: String, substituted: String },
    FileFinished { name: String, lines: u64, outputs: usize },
    FileFailed { name: String, error: String },
    RunFinished { done: usize, failed: usize },
}

/// Receiver for [`Event`]s, passed explicitly into the runner.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: Event) {
        (**self).emit(event)
    }
}

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: Event) {
        match event {
            Event::RunStarted { files } => tracing::info!(files, "start building tops"),
            Event::FileStarted { name, path } => {
                tracing::debug!(%name, path = %path.display(), "reading source")
            }
            Event::KeyNotInTable { name, line, key, substituted } => {
                tracing::warn!(%name, line, %key, %substituted, "key not in transform table")
            }
            Event::FileFinished { name, lines, outputs } => {
                tracing::info!(%name, lines, outputs, "done file")
            }
            Event::FileFailed { name, error } => tracing::error!(%name, %error, "file skipped"),
            Event::RunFinished { done, failed } => tracing::info!(done, failed, "finish building tops"),
        }
    }
}

/// Keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<Event>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| matches!(e, Event::KeyNotInTable { .. }))
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: Event) {}
}

//! Event types and sinks for observing experiment runs.
//!
//! This module defines [`ExperimentEvent`] and a set of sinks and adapters to emit, collect, or
//! forward events while [`crate::experiment::ExperimentRunner`] executes an experiment.
use crate::experiment::config::ExperimentConfig;
use crate::experiment::results::ResultRow;
use crate::experiment::runner::ExperimentSummary;

/// Describes events emitted by experiment runs.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum ExperimentEvent {
    /// Emitted when a run starts.
    RunStarted {
        /// The validated configuration.
        config: ExperimentConfig,
        /// Display name of the layout.
        layout: &'static str,
        /// Seed of the run's RNG.
        seed: u64,
    },

    /// Emitted when the run finishes, also after an early stop.
    RunFinished {
        /// Aggregated result of the run.
        summary: ExperimentSummary,
    },

    /// Emitted for each distinct layout.
    RowEmitted {
        row: ResultRow,
    },

    /// Emitted when a desired hole count produced the same layout as the previous one.
    LayoutSkipped {
        desired_holes: usize,
        actual_holes: usize,
    },

    /// Emitted with the text dump of a field.
    FieldDumped {
        desired_holes: usize,
        actual_holes: usize,
        /// Field dump text, see [`crate::field::Field::dump`].
        dump: String,
    },

    /// Non-fatal warning generated during the run.
    Warning {
        /// Context string (e.g. layout name and hole count).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`ExperimentEvent`], used to ask a sink whether it wants an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperimentEventKind {
    RunStarted,
    RunFinished,
    RowEmitted,
    LayoutSkipped,
    FieldDumped,
    Warning,
}

impl ExperimentEvent {
    pub fn kind(&self) -> ExperimentEventKind {
        match self {
            ExperimentEvent::RunStarted { .. } => ExperimentEventKind::RunStarted,
            ExperimentEvent::RunFinished { .. } => ExperimentEventKind::RunFinished,
            ExperimentEvent::RowEmitted { .. } => ExperimentEventKind::RowEmitted,
            ExperimentEvent::LayoutSkipped { .. } => ExperimentEventKind::LayoutSkipped,
            ExperimentEvent::FieldDumped { .. } => ExperimentEventKind::FieldDumped,
            ExperimentEvent::Warning { .. } => ExperimentEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`ExperimentEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: ExperimentEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: ExperimentEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = ExperimentEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: ExperimentEvent) {}

    #[inline]
    fn wants(&self, _kind: ExperimentEventKind) -> bool {
        false
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn send(&mut self, event: ExperimentEvent) {
        (**self).send(event);
    }

    #[inline]
    fn wants(&self, kind: ExperimentEventKind) -> bool {
        (**self).wants(kind)
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(ExperimentEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(ExperimentEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(ExperimentEvent),
{
    #[inline]
    fn send(&mut self, event: ExperimentEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<ExperimentEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<ExperimentEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[ExperimentEvent] {
        &self.events
    }

    /// Collected rows, in emission order.
    pub fn rows(&self) -> Vec<ResultRow> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ExperimentEvent::RowEmitted { row } => Some(*row),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: ExperimentEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: ExperimentEvent) {
        let kind = event.kind();
        let mut targets: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some(last) = targets.pop() else {
            return;
        };
        for i in targets {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: ExperimentEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use indexmap::IndexMap;
use plotly::layout::{Axis, Layout};
use plotly::{Bar, Plot};
use serde::{Deserialize, Serialize};

/// Ordered mapping of stage label to elapsed seconds.
///
/// Labels are unique. Re-inserting a label overwrites its duration but keeps
/// the position of the first insertion, so bars keep a stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerRecord {
    entries: IndexMap<String, f64>,
}

impl TimerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, label: S, seconds: f64) {
        self.entries.insert(label.into(), seconds);
    }

    /// Run `f` and record its wall-clock duration under `label`.
    pub fn time<S, F, R>(&mut self, label: S, f: F) -> R
    where
        S: Into<String>,
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let out = f();
        self.insert(label, start.elapsed().as_secs_f64());
        out
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(l, s)| (l.as_str(), *s))
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn durations(&self) -> Vec<f64> {
        self.entries.values().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TimerRecord {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut record = TimerRecord::new();
        for (label, seconds) in iter {
            record.insert(label, seconds);
        }
        record
    }
}

/// Add a bar chart of `timer` to `plot`, one bar per label in record order.
///
/// Existing traces and layout on `plot` are left untouched; saving or showing
/// the figure is up to the caller.
pub fn plot_timers(plot: &mut Plot, timer: &TimerRecord) {
    let trace = Bar::new(timer.labels(), timer.durations()).name("Elapsed");
    plot.add_trace(trace);
}

/// Build a standalone timing figure with axis titles.
pub fn timers_plot(timer: &TimerRecord, title: &str) -> Plot {
    let mut plot = Plot::new();
    plot_timers(&mut plot, timer);
    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("Stage"))
            .y_axis(Axis::new().title("Seconds")),
    );
    plot
}

/// Write a figure as a standalone HTML document, replacing any existing file.
pub fn write_plot_html<P: AsRef<Path>>(plot: &Plot, path: P) -> io::Result<()> {
    fs::write(path, plot.to_html())
}

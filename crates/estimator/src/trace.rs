//! Probe tracing.

use crate::{Gas, ProbeOutcome};
use std::fmt;

/// A single probe, with the bracket as it stood when the probe was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRecord {
    pub iteration: u32,
    pub low: Gas,
    pub mid: Gas,
    pub high: Gas,
    pub outcome: ProbeOutcome,
}

impl fmt::Display for ProbeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}x, low: {}, mid: {}, high: {}] => {}",
            self.iteration, self.low, self.mid, self.high, self.outcome
        )
    }
}

/// Receives every probe made during an estimate.
pub trait ProbeObserver {
    fn on_probe(&mut self, record: &ProbeRecord);
}

impl<F: FnMut(&ProbeRecord)> ProbeObserver for F {
    fn on_probe(&mut self, record: &ProbeRecord) {
        self(record)
    }
}

/// Records probes for later inspection.
#[derive(Debug, Default)]
pub struct ProbeRecorder {
    records: Vec<ProbeRecord>,
}

impl ProbeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ProbeRecord] {
        &self.records
    }
}

impl ProbeObserver for ProbeRecorder {
    fn on_probe(&mut self, record: &ProbeRecord) {
        self.records.push(*record);
    }
}

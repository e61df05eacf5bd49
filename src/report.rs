//! Per-client timing records and the run report

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fmt;
use std::time::Duration;

/// Outcome of one benchmark client.
///
/// Serializes as `{"id": "...", "totalTime": 1.25}` for a completed
/// client and as `{}` for one that failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimingRecord {
    Completed {
        id: String,
        /// Seconds from connection start to logout completion.
        #[serde(rename = "totalTime")]
        total_time: f64,
    },
    Empty {},
}

impl TimingRecord {
    #[must_use]
    pub fn completed(id: impl Into<String>, elapsed: Duration) -> Self {
        Self::Completed {
            id: id.into(),
            total_time: elapsed.as_secs_f64(),
        }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self::Empty {}
    }

    #[must_use]
    pub const fn total_time(&self) -> Option<f64> {
        match self {
            Self::Completed { total_time, .. } => Some(*total_time),
            Self::Empty {} => None,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty {})
    }
}

/// All timing records of a run, in launch order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    records: Vec<TimingRecord>,
}

impl Report {
    #[must_use]
    pub const fn new(records: Vec<TimingRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[TimingRecord] {
        &self.records
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The report as JSON indented by four spaces.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Aggregate statistics over the completed clients.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let times: Vec<f64> = self
            .records
            .iter()
            .filter_map(TimingRecord::total_time)
            .collect();

        let min = times.iter().copied().reduce(f64::min);
        let max = times.iter().copied().reduce(f64::max);
        #[allow(clippy::cast_precision_loss)]
        let mean = (!times.is_empty()).then(|| times.iter().sum::<f64>() / times.len() as f64);

        Summary {
            clients: self.records.len(),
            completed: times.len(),
            min,
            mean,
            max,
        }
    }
}

/// Totals and latency spread of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub clients: usize,
    pub completed: usize,
    pub min: Option<f64>,
    pub mean: Option<f64>,
    pub max: Option<f64>,
}

impl Summary {
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.clients - self.completed
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} client(s): {} completed, {} failed",
            self.clients,
            self.completed,
            self.failed()
        )?;
        if let (Some(min), Some(mean), Some(max)) = (self.min, self.mean, self.max) {
            write!(
                f,
                "; total time min {min:.3}s, mean {mean:.3}s, max {max:.3}s"
            )?;
        }
        Ok(())
    }
}

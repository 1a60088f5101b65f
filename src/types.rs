use std::fmt;

/// The run recorded by the last deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub job_name: String,
    pub namespace: String,
    pub run_id: String,
}

impl RunRecord {
    /// Dash-delimited segments of the run id.
    pub fn run_id_segments(&self) -> Vec<&str> {
        self.run_id.split('-').collect()
    }
}

/// Substring tying pods, log streams and events to a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationKey(String);

impl CorrelationKey {
    /// Builds `job-seg0-seg1`. The record must carry at least two run id
    /// segments, which `RunRecordStore::load` guarantees.
    pub fn from_record(record: &RunRecord) -> Self {
        let mut segments = record.run_id.split('-');
        let first = segments.next().unwrap_or_default();
        let second = segments.next().unwrap_or_default();
        CorrelationKey(format!("{}-{}-{}", record.job_name, first, second))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-sensitive substring containment.
    pub fn matches(&self, line: &str) -> bool {
        line.contains(&self.0)
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the pod listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodDescriptor {
    pub name: String,
    pub status_phase: String,
}

impl PodDescriptor {
    /// Parses `NAME READY STATUS ...`. Returns `None` for blank lines.
    pub fn from_row(row: &str) -> Option<Self> {
        let mut columns = row.split_whitespace();
        let name = columns.next()?.to_string();
        let status_phase = columns.nth(1).unwrap_or("Unknown").to_string();
        Some(PodDescriptor { name, status_phase })
    }

    pub fn is_running(&self) -> bool {
        self.status_phase == "Running"
    }
}

/// Attempts shared by discovery and readiness polling within one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    attempts_made: u32,
    max_attempts: u32,
}

impl RetryBudget {
    pub fn new(max_attempts: u32) -> Self {
        RetryBudget {
            attempts_made: 0,
            max_attempts,
        }
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts_made >= self.max_attempts
    }

    /// Counts one attempt and returns the new total. Saturates at the maximum.
    pub fn record_attempt(&mut self) -> u32 {
        if !self.is_exhausted() {
            self.attempts_made += 1;
        }
        self.attempts_made
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodReadiness {
    Unknown,
    Running,
    NotReady,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodStatus {
    pub name: String,
    pub readiness: PodReadiness,
}

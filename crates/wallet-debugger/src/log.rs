//! Append-only diagnostic log.
//!
//! Every operation of the debugger reports its progress here. Entries are kept newest first,
//! which is also the order in which they are rendered.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::{collections::VecDeque, fmt, sync::Arc};

/// Severity of a [`LogEntry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object-safe view over a payload value. Serialization is only attempted when the payload is
/// rendered.
trait PayloadValue: fmt::Debug + Send + Sync {
    fn to_json(&self) -> Option<serde_json::Value>;
}

impl<T: Serialize + fmt::Debug + Send + Sync> PayloadValue for T {
    fn to_json(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

/// Arbitrary diagnostic value attached to a [`LogEntry`].
#[derive(Clone)]
pub struct Payload(Arc<dyn PayloadValue>);

impl Payload {
    /// Wraps any serializable value. The value is not serialized here, so this never fails.
    pub fn new<T>(value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        Self(Arc::new(value))
    }

    /// Plain text payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text.into())
    }

    /// Payload describing an error, including its chain of sources.
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::text(crate::dedup_chain(err).join("; "))
    }

    /// The payload as JSON, if it serializes.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        self.0.to_json()
    }

    /// Human readable form: strings verbatim, structured values as pretty JSON and anything
    /// that refuses to serialize in its `Debug` form.
    pub fn render(&self) -> String {
        match self.to_json() {
            Some(serde_json::Value::String(s)) => s,
            Some(value) => {
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| format!("{:?}", self.0))
            }
            None => format!("{:?}", self.0),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A single immutable entry of the [`DiagnosticLog`].
#[derive(Clone, Debug)]
pub struct LogEntry {
    seq: u64,
    timestamp: DateTime<Utc>,
    severity: Severity,
    message: String,
    payload: Option<Payload>,
}

impl LogEntry {
    /// Position of the entry since the log was created. Strictly increasing, survives `clear`.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)?;
        if let Some(payload) = &self.payload {
            write!(f, "\n{payload}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct LogInner {
    next_seq: u64,
    last_timestamp: Option<DateTime<Utc>>,
    entries: VecDeque<LogEntry>,
}

/// Ordered record of operation outcomes, newest first.
///
/// Cheap to clone, clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticLog {
    inner: Arc<Mutex<LogInner>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and mirrors it to the tracing sink.
    pub fn append(&self, severity: Severity, message: impl Into<String>, payload: Option<Payload>) {
        let message = message.into();
        let entry = {
            let mut inner = self.inner.lock();
            let mut timestamp = Utc::now();
            if let Some(last) = inner.last_timestamp
                && timestamp < last
            {
                timestamp = last;
            }
            inner.last_timestamp = Some(timestamp);

            let seq = inner.next_seq;
            inner.next_seq += 1;

            let entry = LogEntry { seq, timestamp, severity, message, payload };
            inner.entries.push_front(entry.clone());
            entry
        };
        mirror(&entry);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.append(Severity::Info, message, None);
    }

    pub fn success(&self, message: impl Into<String>, payload: Option<Payload>) {
        self.append(Severity::Success, message, payload);
    }

    pub fn error(&self, message: impl Into<String>, payload: Option<Payload>) {
        self.append(Severity::Error, message, payload);
    }

    /// Discards every entry and records that the log was cleared.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
        self.info("Logs cleared");
    }

    /// Snapshot of the entries, newest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner.lock().entries.iter().cloned().collect()
    }

    /// Entries appended after the one numbered `seq`, oldest first. `None` returns everything.
    pub fn after(&self, seq: Option<u64>) -> Vec<LogEntry> {
        let inner = self.inner.lock();
        let mut newer: Vec<_> = inner
            .entries
            .iter()
            .take_while(|e| seq.is_none_or(|seq| e.seq > seq))
            .cloned()
            .collect();
        newer.reverse();
        newer
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn mirror(entry: &LogEntry) {
    let payload = &entry.payload;
    match entry.severity {
        Severity::Error => {
            error!(target: "ronin_debugger::log", ?payload, "{}", entry.message)
        }
        severity => {
            info!(target: "ronin_debugger::log", %severity, ?payload, "{}", entry.message)
        }
    }
}

//! # Result Sink
//!
//! Where pipeline results end up. Passed explicitly to whatever writes, so
//! no component depends on a process-wide output directory.

use std::fmt;
use std::net::IpAddr;

use crate::error::SinkError;

/// Key of the discovered local hosts record.
pub const LOCAL_IPS_KEY: &str = "local_ips";
/// Key of the reachable external addresses record.
pub const EXTERNAL_IPS_KEY: &str = "external_ips";
/// Prefix of every per-run trace namespace.
pub const TRACE_NAMESPACE_PREFIX: &str = "traceroute";

/// A per-run grouping of trace records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for run results.
///
/// Implementations must accept concurrent writes to distinct keys from
/// several tasks at once.
pub trait ResultSink: Send + Sync {
    /// Makes sure the output root exists. Called before any stage runs.
    fn prepare(&self) -> Result<(), SinkError>;

    /// Stores `addrs` newline-delimited under `key`, replacing what was there.
    fn write_addresses(&self, key: &str, addrs: &[IpAddr]) -> Result<(), SinkError>;

    /// Creates a fresh namespace named `name`.
    ///
    /// When `name` is already taken a numeric suffix is appended, so earlier
    /// runs are never overwritten.
    fn create_namespace(&self, name: &str) -> Result<Namespace, SinkError>;

    /// Stores `contents` under `key` inside `namespace`.
    fn write_record(&self, namespace: &Namespace, key: &str, contents: &str)
    -> Result<(), SinkError>;
}

/// Renders addresses one per line, each line terminated.
pub fn render_addresses(addrs: &[IpAddr]) -> String {
    addrs.iter().map(|addr| format!("{addr}\n")).collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

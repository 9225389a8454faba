//! # Probe Models
//!
//! Values produced and consumed by the external probing pipeline. None of
//! them outlive a single run.

use std::fmt;
use std::net::IpAddr;

use crate::error::TraceError;

/// Outcome of a single liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    address: IpAddr,
    reachable: bool,
}

impl ProbeResult {
    pub fn new(address: IpAddr, reachable: bool) -> Self {
        Self { address, reachable }
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable
    }
}

/// Captured output of one path trace.
///
/// `output` holds whatever the trace utility printed, even when it failed;
/// the failure itself is carried in `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceResult {
    pub address: IpAddr,
    pub output: String,
    pub error: Option<TraceError>,
}

impl TraceResult {
    pub fn success(address: IpAddr, output: String) -> Self {
        Self {
            address,
            output,
            error: None,
        }
    }

    pub fn failure(address: IpAddr, output: String, error: TraceError) -> Self {
        Self {
            address,
            output,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Contents written to the result record for this address.
    ///
    /// A failed trace without any output still gets a record, holding the
    /// error description instead.
    pub fn record(&self) -> String {
        match (&self.error, self.output.is_empty()) {
            (Some(err), true) => format!("{err}\n"),
            _ => self.output.clone(),
        }
    }

    pub fn hops(&self) -> Vec<TraceHop> {
        parse_hops(&self.output)
    }
}

/// One numbered line of trace output.
///
/// `addr` is `None` when no responder answered (`*`); `rtt_ms` holds the
/// first round-trip time printed on the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHop {
    pub hop: u32,
    pub addr: Option<IpAddr>,
    pub rtt_ms: Option<f64>,
}

/// Extracts the hops from raw trace utility output.
///
/// Understands the Unix layout (` 3  host (10.0.0.1)  5.1 ms ...`), its
/// numeric variant and the Windows layout (`  3    5 ms    4 ms    5 ms  10.0.0.1`).
/// Headers and continuation lines without a hop number are skipped.
pub fn parse_hops(output: &str) -> Vec<TraceHop> {
    output.lines().filter_map(parse_hop_line).collect()
}

fn parse_hop_line(line: &str) -> Option<TraceHop> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (first, rest) = tokens.split_first()?;
    let hop: u32 = first.parse().ok()?;

    let addr: Option<IpAddr> = rest
        .iter()
        .find_map(|token| token.trim_matches(|c: char| c == '(' || c == ')').parse().ok());

    let rtt_ms: Option<f64> = rest.iter().enumerate().find_map(|(idx, token)| {
        let value = match token.strip_suffix("ms") {
            Some(value) if !value.is_empty() => value,
            _ if rest.get(idx + 1) == Some(&"ms") => *token,
            _ => return None,
        };
        value.trim_start_matches('<').parse::<f64>().ok()
    });

    Some(TraceHop { hop, addr, rtt_ms })
}

/// An address waiting in the trace queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkItem {
    pub address: IpAddr,
}

impl WorkItem {
    pub fn new(address: IpAddr) -> Self {
        Self { address }
    }
}

impl From<IpAddr> for WorkItem {
    fn from(address: IpAddr) -> Self {
        Self::new(address)
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

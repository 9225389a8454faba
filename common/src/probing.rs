//! # Probing Capabilities
//!
//! The pipeline never touches raw sockets or OS utilities directly. Each
//! capability it needs is a trait here; `reconr-core` binds them to the
//! operating system and tests bind them to fakes.

use std::collections::BTreeSet;
use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::ProbeError;
use crate::network::probe::{ProbeResult, TraceResult};
use crate::network::range::Ipv4Range;

/// Finds hosts answering address-resolution requests on a local range.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Returns every distinct address that answered inside `range`.
    ///
    /// Silence is not an error: an empty set is returned when nobody replies.
    async fn discover(&self, range: Ipv4Range) -> anyhow::Result<BTreeSet<IpAddr>>;
}

/// Issues a single liveness probe.
#[async_trait]
pub trait Pinger: Send + Sync {
    /// `Ok(true)` when the target answered, `Ok(false)` when it did not.
    async fn ping(&self, addr: IpAddr) -> Result<bool, ProbeError>;
}

/// Runs one hop-by-hop path trace.
#[async_trait]
pub trait Tracer: Send + Sync {
    /// Never fails: problems are recorded in [`TraceResult::error`].
    async fn trace(&self, addr: IpAddr) -> TraceResult;
}

/// Receives per-item progress as the pipeline works.
pub trait ProgressObserver: Send + Sync {
    fn on_probe(&self, _result: &ProbeResult) {}

    fn on_trace(&self, _result: &TraceResult) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

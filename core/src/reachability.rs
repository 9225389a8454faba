//! # Reachability Testing
//!
//! One liveness probe per candidate, strictly one after another and in the
//! order given. Unlike tracing, this stage is not parallelised.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reconr_common::error::ProbeError;
use reconr_common::network::probe::ProbeResult;
use reconr_common::probing::{Pinger, ProgressObserver};
use reconr_common::warn;

use crate::system;

/// Slack on top of the echo timeout before the ping process is abandoned.
const PROCESS_GRACE: Duration = Duration::from_secs(1);

/// Pings through the system `ping` utility.
pub struct SystemPinger {
    timeout: Duration,
}

impl SystemPinger {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Pinger for SystemPinger {
    async fn ping(&self, addr: IpAddr) -> Result<bool, ProbeError> {
        let mut cmd = system::ping_command(addr, self.timeout);
        let status = tokio::time::timeout(self.timeout + PROCESS_GRACE, cmd.status())
            .await
            .map_err(|_| ProbeError::Timeout(addr))?
            .map_err(|source| ProbeError::Spawn { addr, source })?;
        Ok(status.success())
    }
}

pub struct ReachabilityProber {
    pinger: Arc<dyn Pinger>,
    observer: Arc<dyn ProgressObserver>,
}

impl ReachabilityProber {
    pub fn new(pinger: Arc<dyn Pinger>, observer: Arc<dyn ProgressObserver>) -> Self {
        Self { pinger, observer }
    }

    /// Classifies every address. A probe that errors counts as unreachable.
    pub async fn probe_all(&self, addresses: &[IpAddr]) -> Vec<ProbeResult> {
        let mut results: Vec<ProbeResult> = Vec::with_capacity(addresses.len());
        for &addr in addresses {
            let reachable = match self.pinger.ping(addr).await {
                Ok(reachable) => reachable,
                Err(e) => {
                    warn!("Probe for {addr} failed: {e}");
                    false
                }
            };
            let result = ProbeResult::new(addr, reachable);
            self.observer.on_probe(&result);
            results.push(result);
        }
        results
    }

    /// The reachable subset of `addresses`, in input order.
    pub async fn probe(&self, addresses: &[IpAddr]) -> Vec<IpAddr> {
        self.probe_all(addresses)
            .await
            .into_iter()
            .filter(ProbeResult::is_reachable)
            .map(|result| result.address())
            .collect()
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

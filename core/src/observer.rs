use reconr_common::network::probe::{ProbeResult, TraceResult};
use reconr_common::probing::ProgressObserver;
use reconr_common::{info, success, warn};

/// Reports every probe and trace as a log line.
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_probe(&self, result: &ProbeResult) {
        if result.is_reachable() {
            success!("{} is reachable", result.address());
        } else {
            info!("{} is not reachable", result.address());
        }
    }

    fn on_trace(&self, result: &TraceResult) {
        match &result.error {
            None => success!("Trace to {} complete", result.address),
            Some(e) => warn!("Trace to {} failed: {e}", result.address),
        }
    }
}

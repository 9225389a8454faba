//! # Probe Pipeline
//!
//! Drives one reconnaissance run through its stages:
//!
//! ```text
//! Sampling -> LocalDiscovery -> ReachabilityTesting
//!          -> TraceNamespaceCreation -> TraceFanOut -> Done
//! ```
//!
//! Nothing runs until the configuration is valid and the sink is prepared.
//! After that, per-item failures (a probe that errors, a trace that dies, a
//! single record that cannot be written) are logged and the run goes on.
//! Only losing the address lists or the trace namespace ends it early.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use chrono::Local;
use reconr_common::config::Config;
use reconr_common::error::PipelineError;
use reconr_common::network::probe::{TraceResult, WorkItem};
use reconr_common::probing::{AddressResolver, Pinger, ProgressObserver, Tracer};
use reconr_common::sink::{
    EXTERNAL_IPS_KEY, LOCAL_IPS_KEY, Namespace, ResultSink, TRACE_NAMESPACE_PREFIX,
};
use reconr_common::{info, success, warn};
use tracing::debug;

use crate::discovery::ArpResolver;
use crate::observer::LogObserver;
use crate::pool::WorkerPool;
use crate::reachability::{ReachabilityProber, SystemPinger};
use crate::sampler::AddressSampler;
use crate::sink::FsSink;
use crate::trace::SystemTracer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pending,
    Sampling,
    LocalDiscovery,
    ReachabilityTesting,
    TraceNamespaceCreation,
    TraceFanOut,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pending => "pending",
            Stage::Sampling => "sampling",
            Stage::LocalDiscovery => "local discovery",
            Stage::ReachabilityTesting => "reachability testing",
            Stage::TraceNamespaceCreation => "trace namespace creation",
            Stage::TraceFanOut => "trace fan-out",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Everything the pipeline reaches the outside world through.
#[derive(Clone)]
pub struct Collaborators {
    pub resolver: Arc<dyn AddressResolver>,
    pub pinger: Arc<dyn Pinger>,
    pub tracer: Arc<dyn Tracer>,
    pub sink: Arc<dyn ResultSink>,
    pub observer: Arc<dyn ProgressObserver>,
}

impl Collaborators {
    /// ARP, `ping`, the configured trace utility and a directory sink.
    pub fn system(config: &Config) -> Self {
        Self {
            resolver: Arc::new(ArpResolver::new(config.arp_timeout)),
            pinger: Arc::new(SystemPinger::new(config.ping_timeout)),
            tracer: Arc::new(SystemTracer::new(
                config.traceroute_bin.clone(),
                config.traceroute_args.clone(),
            )),
            sink: Arc::new(FsSink::new(config.output_dir.clone())),
            observer: Arc::new(LogObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// `None` when local discovery was skipped.
    pub local_hosts: Option<Vec<IpAddr>>,
    pub candidates: Vec<IpAddr>,
    pub reachable: Vec<IpAddr>,
    pub namespace: Option<Namespace>,
    pub traced: usize,
    pub failed_traces: usize,
    /// Trace records that could not be written.
    pub write_failures: usize,
    /// Hops parsed out of each trace's output.
    pub hop_counts: BTreeMap<IpAddr, usize>,
}

pub struct ProbePipeline {
    config: Config,
    collaborators: Collaborators,
    sampler: AddressSampler,
    stage: Stage,
}

impl ProbePipeline {
    pub fn new(config: Config, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
            sampler: AddressSampler::from_os_rng(),
            stage: Stage::Pending,
        }
    }

    /// Replaces the sampler's randomness with a seeded one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.sampler = AddressSampler::seeded(seed);
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = %self.stage, to = %stage, "stage transition");
        self.stage = stage;
    }

    pub async fn run(&mut self) -> Result<RunSummary, PipelineError> {
        self.config.validate()?;
        let sink: Arc<dyn ResultSink> = self.collaborators.sink.clone();
        sink.prepare().map_err(PipelineError::Setup)?;

        let mut summary = RunSummary::default();

        self.enter(Stage::Sampling);
        summary.candidates = self
            .sampler
            .generate(self.config.external_count)
            .into_iter()
            .map(IpAddr::V4)
            .collect();
        info!("Sampled {} external candidates", summary.candidates.len());

        self.enter(Stage::LocalDiscovery);
        if self.config.skip_local {
            info!("Local discovery skipped");
        } else {
            let local_hosts: Vec<IpAddr> = self.discover_local().await.into_iter().collect();
            persist_addresses(sink.as_ref(), LOCAL_IPS_KEY, &local_hosts)?;
            summary.local_hosts = Some(local_hosts);
        }

        self.enter(Stage::ReachabilityTesting);
        let prober = ReachabilityProber::new(
            self.collaborators.pinger.clone(),
            self.collaborators.observer.clone(),
        );
        summary.reachable = prober.probe(&summary.candidates).await;
        persist_addresses(sink.as_ref(), EXTERNAL_IPS_KEY, &summary.reachable)?;
        success!(
            "{} of {} candidates are reachable",
            summary.reachable.len(),
            summary.candidates.len()
        );

        self.enter(Stage::TraceNamespaceCreation);
        let namespace: Namespace = sink
            .create_namespace(&namespace_name())
            .map_err(PipelineError::Namespace)?;
        debug!(namespace = %namespace, "trace namespace created");

        self.enter(Stage::TraceFanOut);
        let items = work_items(&summary.reachable);
        self.fan_out(&namespace, items, &mut summary).await?;
        summary.namespace = Some(namespace);

        self.enter(Stage::Done);
        Ok(summary)
    }

    async fn discover_local(&self) -> BTreeSet<IpAddr> {
        let range = self.config.local_range;
        match self.collaborators.resolver.discover(range).await {
            Ok(hosts) => {
                success!("{} local hosts answered in {range}", hosts.len());
                hosts
            }
            Err(e) => {
                warn!("Local discovery failed: {e:#}");
                BTreeSet::new()
            }
        }
    }

    async fn fan_out(
        &self,
        namespace: &Namespace,
        items: Vec<WorkItem>,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        let pool = WorkerPool::new(self.config.pool_size)?;
        info!("Tracing {} addresses with {} workers", items.len(), pool.size());

        let mut results = pool.run(items, self.collaborators.tracer.clone());
        while let Some(result) = results.recv().await {
            self.collaborators.observer.on_trace(&result);
            self.record_trace(namespace, &result, summary);
        }
        Ok(())
    }

    fn record_trace(&self, namespace: &Namespace, result: &TraceResult, summary: &mut RunSummary) {
        summary.traced += 1;
        if !result.is_ok() {
            summary.failed_traces += 1;
        }
        summary.hop_counts.insert(result.address, result.hops().len());

        let key = result.address.to_string();
        if let Err(e) = self
            .collaborators
            .sink
            .write_record(namespace, &key, &result.record())
        {
            warn!("Could not store trace for {key}: {e}");
            summary.write_failures += 1;
        }
    }
}

fn persist_addresses(sink: &dyn ResultSink, key: &str, addrs: &[IpAddr]) -> Result<(), PipelineError> {
    sink.write_addresses(key, addrs)
        .map_err(|source| PipelineError::Persist {
            key: key.to_string(),
            source,
        })
}

/// One work item per distinct address, first occurrence wins.
fn work_items(reachable: &[IpAddr]) -> Vec<WorkItem> {
    let mut seen = HashSet::new();
    reachable
        .iter()
        .copied()
        .filter(|addr| seen.insert(*addr))
        .map(WorkItem::from)
        .collect()
}

/// `traceroute_<YYYYmmdd_HHMMSS>` in local time.
pub fn namespace_name() -> String {
    format!(
        "{TRACE_NAMESPACE_PREFIX}_{}",
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

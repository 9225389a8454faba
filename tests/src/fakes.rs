//! Stand-ins for the OS-facing collaborators.

use std::collections::{BTreeSet, HashSet};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reconr_common::error::{ProbeError, TraceError};
use reconr_common::network::probe::TraceResult;
use reconr_common::network::range::Ipv4Range;
use reconr_common::probing::{AddressResolver, NoopObserver, Pinger, Tracer};
use reconr_common::sink::ResultSink;
use reconr_core::pipeline::Collaborators;

/// Records that a stage ran by noting each collaborator call.
#[derive(Default)]
pub struct CallLog(Mutex<Vec<&'static str>>);

impl CallLog {
    fn push(&self, call: &'static str) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

pub struct FakeResolver {
    pub hosts: Vec<IpAddr>,
    pub log: Arc<CallLog>,
}

#[async_trait]
impl AddressResolver for FakeResolver {
    async fn discover(&self, range: Ipv4Range) -> anyhow::Result<BTreeSet<IpAddr>> {
        self.log.push("discover");
        Ok(self.hosts.iter().copied().filter(|ip| range.contains(ip)).collect())
    }
}

/// Answers for every address, or only for the first `limit` it is asked about.
pub struct FakePinger {
    pub limit: Option<usize>,
    pub seen: AtomicUsize,
    pub log: Arc<CallLog>,
}

#[async_trait]
impl Pinger for FakePinger {
    async fn ping(&self, _addr: IpAddr) -> Result<bool, ProbeError> {
        self.log.push("ping");
        let seen = self.seen.fetch_add(1, Ordering::SeqCst);
        Ok(self.limit.is_none_or(|limit| seen < limit))
    }
}

/// Sleeps briefly, then succeeds unless the address is listed in `broken`.
pub struct FakeTracer {
    pub broken: HashSet<IpAddr>,
    pub active: AtomicUsize,
    pub peak: AtomicUsize,
    pub log: Arc<CallLog>,
}

#[async_trait]
impl Tracer for FakeTracer {
    async fn trace(&self, addr: IpAddr) -> TraceResult {
        self.log.push("trace");
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.broken.contains(&addr) {
            return TraceResult::failure(
                addr,
                String::new(),
                TraceError::Exit {
                    code: Some(2),
                    stderr: "network unreachable".to_string(),
                },
            );
        }
        TraceResult::success(addr, format!("traceroute to {addr}\n 1  * * *\n"))
    }
}

/// Each call sleeps less than the one before it, so early work finishes last.
pub struct ShrinkingDelayTracer {
    pub total: usize,
    pub started: AtomicUsize,
    pub finished: Mutex<Vec<IpAddr>>,
}

impl ShrinkingDelayTracer {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            started: AtomicUsize::new(0),
            finished: Mutex::new(Vec::new()),
        }
    }

    pub fn finished(&self) -> Vec<IpAddr> {
        self.finished.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tracer for ShrinkingDelayTracer {
    async fn trace(&self, addr: IpAddr) -> TraceResult {
        let index = self.started.fetch_add(1, Ordering::SeqCst);
        let steps = self.total.saturating_sub(index) as u64;
        tokio::time::sleep(Duration::from_millis(steps * 10)).await;
        self.finished.lock().unwrap().push(addr);
        TraceResult::success(addr, format!("traceroute to {addr}\n"))
    }
}

pub struct Fakes {
    pub log: Arc<CallLog>,
    pub tracer: Arc<FakeTracer>,
    pub collaborators: Collaborators,
}

pub fn local_host(last: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(172, 16, 3, last))
}

pub fn fakes(sink: Arc<dyn ResultSink>, reachable_limit: Option<usize>, broken: HashSet<IpAddr>) -> Fakes {
    let log = Arc::new(CallLog::default());
    let tracer = Arc::new(FakeTracer {
        broken,
        active: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
        log: log.clone(),
    });
    let collaborators = Collaborators {
        resolver: Arc::new(FakeResolver {
            hosts: vec![local_host(20), local_host(1), IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))],
            log: log.clone(),
        }),
        pinger: Arc::new(FakePinger {
            limit: reachable_limit,
            seen: AtomicUsize::new(0),
            log: log.clone(),
        }),
        tracer: tracer.clone(),
        sink,
        observer: Arc::new(NoopObserver),
    };
    Fakes {
        log,
        tracer,
        collaborators,
    }
}

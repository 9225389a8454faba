use std::collections::HashSet;
use std::fs;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use reconr_common::config::Config;
use reconr_common::error::PipelineError;
use reconr_common::sink::{EXTERNAL_IPS_KEY, LOCAL_IPS_KEY};
use reconr_core::pipeline::{ProbePipeline, Stage};
use reconr_core::sink::{FsSink, MemorySink};

use crate::fakes::{self, ShrinkingDelayTracer, local_host};

fn config(external_count: usize, pool_size: usize) -> Config {
    Config {
        external_count,
        pool_size,
        ..Config::default()
    }
}

/// Ten reachable hosts through four workers must leave ten records.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_reachable_host_gets_one_trace_record() {
    let sink = Arc::new(MemorySink::new());
    let fakes = fakes::fakes(sink.clone(), None, HashSet::new());

    let mut pipeline = ProbePipeline::new(config(10, 4), fakes.collaborators).with_seed(42);
    let summary = pipeline.run().await.unwrap();

    assert_eq!(pipeline.stage(), Stage::Done);
    assert_eq!(summary.reachable.len(), 10);

    let records = sink.records(summary.namespace.as_ref().unwrap().name());
    let keys: HashSet<&String> = records.keys().collect();
    assert_eq!(records.len(), 10);
    assert_eq!(keys.len(), 10);
    for addr in &summary.reachable {
        assert!(records[&addr.to_string()].starts_with(&format!("traceroute to {addr}")));
    }

    assert_eq!(summary.hop_counts.len(), 10);
    assert!(summary.hop_counts.values().all(|&hops| hops == 1));

    let peak = fakes.tracer.peak.load(Ordering::SeqCst);
    assert!(peak <= 4, "{peak} traces ran at once");
}

/// Traces that finish out of submission order still each land under their own key.
#[tokio::test]
async fn out_of_order_completions_keep_distinct_records() {
    let sink = Arc::new(MemorySink::new());
    let mut fakes = fakes::fakes(sink.clone(), None, HashSet::new());
    let tracer = Arc::new(ShrinkingDelayTracer::new(10));
    fakes.collaborators.tracer = tracer.clone();

    let summary = ProbePipeline::new(config(10, 4), fakes.collaborators)
        .with_seed(9)
        .run()
        .await
        .unwrap();

    let finished = tracer.finished();
    assert_eq!(finished.len(), 10);
    assert_ne!(finished, summary.reachable);

    let records = sink.records(summary.namespace.as_ref().unwrap().name());
    assert_eq!(records.len(), 10);
    for addr in &finished {
        assert_eq!(records[&addr.to_string()], format!("traceroute to {addr}\n"));
    }
    assert_eq!(summary.traced, 10);
}

#[tokio::test]
async fn only_reachable_candidates_are_traced_and_listed() {
    let sink = Arc::new(MemorySink::new());
    let fakes = fakes::fakes(sink.clone(), Some(3), HashSet::new());

    let summary = ProbePipeline::new(config(8, 2), fakes.collaborators)
        .run()
        .await
        .unwrap();

    assert_eq!(summary.candidates.len(), 8);
    assert_eq!(summary.reachable, summary.candidates[..3].to_vec());
    assert_eq!(sink.addresses(EXTERNAL_IPS_KEY), Some(summary.reachable.clone()));
    assert_eq!(summary.traced, 3);

    let calls = fakes.log.calls();
    assert_eq!(calls.iter().filter(|c| **c == "ping").count(), 8);
    assert_eq!(calls.iter().filter(|c| **c == "trace").count(), 3);
}

#[tokio::test]
async fn local_hosts_outside_the_range_are_dropped() {
    let sink = Arc::new(MemorySink::new());
    let fakes = fakes::fakes(sink.clone(), Some(0), HashSet::new());

    ProbePipeline::new(config(1, 1), fakes.collaborators)
        .run()
        .await
        .unwrap();

    assert_eq!(sink.addresses(LOCAL_IPS_KEY), Some(vec![local_host(1), local_host(20)]));
}

#[tokio::test]
async fn two_runs_keep_separate_namespaces_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("results");

    let mut names = Vec::new();
    for _ in 0..2 {
        let sink = Arc::new(FsSink::new(root.clone()));
        let fakes = fakes::fakes(sink, Some(2), HashSet::new());
        let summary = ProbePipeline::new(config(3, 2), fakes.collaborators)
            .run()
            .await
            .unwrap();
        names.push(summary.namespace.unwrap().name().to_string());
    }

    assert_ne!(names[0], names[1]);
    for name in &names {
        let entries = fs::read_dir(root.join(name)).unwrap().count();
        assert_eq!(entries, 2, "namespace {name} lost records");
    }
    assert!(root.join("local_ips.txt").is_file());
    assert!(root.join("external_ips.txt").is_file());
}

#[tokio::test]
async fn two_runs_keep_separate_namespaces_in_memory() {
    let sink = Arc::new(MemorySink::new());
    for _ in 0..2 {
        let fakes = fakes::fakes(sink.clone(), Some(1), HashSet::new());
        ProbePipeline::new(config(2, 1), fakes.collaborators)
            .run()
            .await
            .unwrap();
    }

    let namespaces = sink.namespaces();
    assert_eq!(namespaces.len(), 2);
    for name in &namespaces {
        assert_eq!(sink.records(name).len(), 1);
    }
}

#[tokio::test]
async fn uncreatable_output_root_runs_no_stage() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "occupied").unwrap();

    let sink = Arc::new(FsSink::new(blocker.join("results")));
    let fakes = fakes::fakes(sink, None, HashSet::new());
    let mut pipeline = ProbePipeline::new(config(5, 4), fakes.collaborators);

    let err = pipeline.run().await.unwrap_err();

    assert!(err.is_setup_failure());
    assert!(matches!(err, PipelineError::Setup(_)));
    assert_eq!(pipeline.stage(), Stage::Pending);
    assert!(fakes.log.calls().is_empty());
}

#[tokio::test]
async fn failed_traces_are_persisted_with_their_error() {
    let sink = Arc::new(MemorySink::new());
    let probe = fakes::fakes(Arc::new(MemorySink::new()), None, HashSet::new());
    let candidates = ProbePipeline::new(config(4, 2), probe.collaborators)
        .with_seed(9)
        .run()
        .await
        .unwrap()
        .candidates;
    let broken: HashSet<IpAddr> = candidates[..2].iter().copied().collect();

    let fakes = fakes::fakes(sink.clone(), None, broken.clone());
    let summary = ProbePipeline::new(config(4, 2), fakes.collaborators)
        .with_seed(9)
        .run()
        .await
        .unwrap();

    assert_eq!(summary.traced, 4);
    assert_eq!(summary.failed_traces, 2);
    let records = sink.records(summary.namespace.unwrap().name());
    assert_eq!(records.len(), 4);
    for addr in &broken {
        assert!(records[&addr.to_string()].contains("network unreachable"));
    }
}

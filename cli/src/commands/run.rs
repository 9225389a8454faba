use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::*;
use is_root::is_root;
use reconr_common::config::Config;
use reconr_common::{error, success, warn};
use reconr_core::pipeline::{Collaborators, ProbePipeline, RunSummary};
use tracing::Instrument;

use crate::mprint;
use crate::terminal::format::{self, Detail};
use crate::terminal::{colors, print, spinner};

pub async fn run(cfg: Config) -> anyhow::Result<()> {
    if !cfg.skip_local && !is_root() {
        warn!("Local discovery needs root privileges; pass --skip-local to silence this");
    }

    let span = spinner::stage_span("Probing candidates...");
    let observer = Arc::new(spinner::SpinnerObserver::new(span.clone(), cfg.external_count, cfg.quiet));
    let collaborators = Collaborators::system(&cfg).with_observer(observer);
    let output_dir = cfg.output_dir.clone();
    let quiet = cfg.quiet;

    let start_time: Instant = Instant::now();
    let mut pipeline = ProbePipeline::new(cfg, collaborators);
    let outcome = pipeline.run().instrument(span).await;

    match outcome {
        Ok(summary) => {
            run_ends(&summary, &output_dir, start_time.elapsed(), quiet);
            Ok(())
        }
        Err(e) => {
            error!("Run aborted during {}: {e}", pipeline.stage());
            Err(e.into())
        }
    }
}

fn run_ends(summary: &RunSummary, output_dir: &std::path::Path, total_time: Duration, quiet: u8) {
    if quiet > 0 {
        mprint!();
    }
    print::header("results", quiet);

    if quiet < 2 {
        print_hosts("Local hosts", summary.local_hosts.as_deref());
        print_hosts("Reachable external hosts", Some(&summary.reachable));
    }

    let mut details: Vec<Detail> = vec![
        format::path_to_detail("Output", output_dir),
        format::count_to_detail("Candidates", summary.candidates.len()),
        format::count_to_detail("Reachable", summary.reachable.len()),
        format::count_to_detail("Traced", summary.traced),
        format::count_to_detail("Failed", summary.failed_traces),
    ];
    if let Some(namespace) = &summary.namespace {
        details.push(format::path_to_detail("Traces", &output_dir.join(namespace.name())));
    }
    if summary.write_failures > 0 {
        details.push(format::count_to_detail("Unsaved", summary.write_failures));
    }
    print::tree_head(0, "Run");
    print::as_tree_one_level(&details);

    if quiet < 2 && !summary.hop_counts.is_empty() {
        mprint!();
        let hops: Vec<Detail> = summary
            .hop_counts
            .iter()
            .map(|(addr, count)| format::hops_to_detail(addr, *count))
            .collect();
        print::tree_head(hops.len(), "Trace hops");
        print::as_tree_one_level(&hops);
    }

    print_summary(summary, total_time, quiet);
}

fn print_hosts(title: &str, hosts: Option<&[std::net::IpAddr]>) {
    let Some(hosts) = hosts else {
        return;
    };
    if hosts.is_empty() {
        print::no_results(&title.to_lowercase());
        return;
    }
    let details: Vec<Detail> = hosts.iter().map(format::ip_to_detail).collect();
    print::tree_head(hosts.len(), title);
    print::as_tree_one_level(&details);
    mprint!();
}

fn print_summary(summary: &RunSummary, total_time: Duration, quiet: u8) {
    let traced: ColoredString = format!("{} paths", summary.traced).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Run Complete: {traced} traced in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();

    match quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => success!("{}", output),
    }
}

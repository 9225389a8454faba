use std::net::IpAddr;
use std::time::Instant;

use anyhow::Context;
use colored::*;
use reconr_common::config::Config;
use reconr_common::probing::AddressResolver;
use reconr_common::sink::{LOCAL_IPS_KEY, ResultSink};
use reconr_common::success;
use reconr_core::discovery::ArpResolver;
use reconr_core::sink::FsSink;
use tracing::Instrument;

use crate::terminal::format::{self, Detail};
use crate::terminal::{print, spinner};

pub async fn local(cfg: &Config) -> anyhow::Result<()> {
    let span = spinner::stage_span(&format!(
        "Sweeping {} ({} addresses)...",
        cfg.local_range,
        cfg.local_range.len()
    ));
    let resolver = ArpResolver::new(cfg.arp_timeout);

    let start_time: Instant = Instant::now();
    let hosts: Vec<IpAddr> = resolver
        .discover(cfg.local_range)
        .instrument(span)
        .await?
        .into_iter()
        .collect();

    let sink = FsSink::new(cfg.output_dir.clone());
    sink.prepare()?;
    sink.write_addresses(LOCAL_IPS_KEY, &hosts)
        .with_context(|| format!("storing local hosts under {}", sink.root().display()))?;

    if hosts.is_empty() {
        print::header("zero hosts detected", cfg.quiet);
        print::no_results("local hosts");
        return Ok(());
    }

    print::header("local discovery", cfg.quiet);
    if cfg.quiet < 2 {
        let details: Vec<Detail> = hosts.iter().map(format::ip_to_detail).collect();
        print::tree_head(hosts.len(), "Local hosts");
        print::as_tree_one_level(&details);
    }

    let active: ColoredString = format!("{} active hosts", hosts.len()).bold().green();
    success!(
        "Discovery complete: {active} identified in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

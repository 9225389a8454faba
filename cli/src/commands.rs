pub mod local;
pub mod run;
pub mod sample;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use reconr_common::config::{self, Config};
use reconr_common::network::range::Ipv4Range;

#[derive(Parser)]
#[command(name = "reconr")]
#[command(about = "Samples the internet, sweeps the local subnet and traces the paths in between.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub options: Options,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: sample, sweep, probe and trace
    #[command(alias = "r")]
    Run,
    /// Only discover hosts on the local range with ARP
    #[command(alias = "l")]
    Local,
    /// Print a batch of random globally routable addresses
    #[command(alias = "s")]
    Sample,
}

#[derive(Args)]
pub struct Options {
    /// Local IPv4 range to sweep, in CIDR notation
    #[arg(long, global = true, default_value = config::DEFAULT_LOCAL_RANGE)]
    pub local_range: Ipv4Range,

    /// Number of external candidates to sample
    #[arg(long, global = true, default_value_t = config::DEFAULT_EXTERNAL_COUNT)]
    pub external_count: usize,

    /// Number of traces allowed to run at once
    #[arg(long, global = true, default_value_t = config::DEFAULT_POOL_SIZE)]
    pub pool_size: usize,

    /// Directory receiving the results
    #[arg(short, long, global = true, default_value = config::DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Seconds to wait for an echo reply
    #[arg(long, global = true, default_value_t = 1)]
    pub ping_timeout: u64,

    /// Milliseconds to collect ARP replies after the sweep
    #[arg(long, global = true, default_value_t = 1_000)]
    pub arp_timeout: u64,

    /// Path trace utility
    #[arg(long, global = true, default_value = config::DEFAULT_TRACEROUTE_BIN)]
    pub traceroute_bin: String,

    /// Extra argument passed to the trace utility before the address
    #[arg(long = "traceroute-arg", global = true, allow_hyphen_values = true)]
    pub traceroute_args: Vec<String>,

    /// Skip ARP discovery of the local range
    #[arg(long, global = true)]
    pub skip_local: bool,

    /// Reduce decoration; repeat for less
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Options {
    pub fn to_config(&self) -> Config {
        Config {
            local_range: self.local_range,
            external_count: self.external_count,
            pool_size: self.pool_size,
            output_dir: self.output_dir.clone(),
            ping_timeout: Duration::from_secs(self.ping_timeout),
            arp_timeout: Duration::from_millis(self.arp_timeout),
            traceroute_bin: self.traceroute_bin.clone(),
            traceroute_args: self.traceroute_args.clone(),
            skip_local: self.skip_local,
            quiet: self.quiet,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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

//! Thin wrappers around the OS utilities the probes delegate to.

use std::net::IpAddr;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

const PING_BIN: &str = "ping";

/// Arguments for a single echo request to `addr` that waits at most
/// `timeout` (rounded up to whole seconds) for the reply.
pub fn ping_args(addr: IpAddr, timeout: Duration) -> Vec<String> {
    let wait_secs: u64 = (timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0)).max(1);
    let mut args: Vec<String> = Vec::new();

    if addr.is_ipv6() {
        args.push("-6".to_string());
    }

    #[cfg(target_os = "macos")]
    {
        args.extend(["-c".to_string(), "1".to_string(), "-t".to_string(), wait_secs.to_string()]);
    }
    #[cfg(not(target_os = "macos"))]
    {
        args.extend(["-c".to_string(), "1".to_string(), "-W".to_string(), wait_secs.to_string()]);
    }

    args.push(addr.to_string());
    args
}

pub fn ping_command(addr: IpAddr, timeout: Duration) -> Command {
    let mut cmd = Command::new(PING_BIN);
    cmd.args(ping_args(addr, timeout))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    cmd
}

/// `program args... addr`, with both output streams captured.
pub fn trace_command(program: &str, args: &[String], addr: IpAddr) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .arg(addr.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

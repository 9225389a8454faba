//! # Path Tracing
//!
//! Runs the system trace utility and keeps its output verbatim. A trace
//! that cannot run or exits badly is reported through the result, never as
//! an `Err`, so one bad target cannot stop the others.
//!
//! No timeout is applied here: a utility that hangs keeps its worker busy.

use std::net::IpAddr;

use async_trait::async_trait;
use reconr_common::error::TraceError;
use reconr_common::network::probe::TraceResult;
use reconr_common::probing::Tracer;
use tracing::debug;

use crate::system;

pub struct SystemTracer {
    program: String,
    args: Vec<String>,
}

impl SystemTracer {
    /// `args` go before the address, which is always the last argument.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl Tracer for SystemTracer {
    async fn trace(&self, addr: IpAddr) -> TraceResult {
        debug!(target_addr = %addr, program = %self.program, "starting trace");
        let output = match system::trace_command(&self.program, &self.args, addr)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => return TraceResult::failure(addr, String::new(), TraceError::Spawn(e.to_string())),
        };

        let stdout: String = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return TraceResult::success(addr, stdout);
        }

        let stderr: String = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let error = TraceError::Exit {
            code: output.status.code(),
            stderr,
        };
        TraceResult::failure(addr, stdout, error)
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const TARGET: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 1));

    fn sh(script: &str) -> SystemTracer {
        SystemTracer::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[tokio::test]
    async fn missing_utility_is_reported_not_raised() {
        let tracer = SystemTracer::new("/nonexistent/reconr-traceroute", Vec::new());
        let result = tracer.trace(TARGET).await;

        assert_eq!(result.address, TARGET);
        assert!(result.output.is_empty());
        assert!(matches!(result.error, Some(TraceError::Spawn(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_utility_keeps_partial_output() {
        let tracer = sh("echo \" 1  hop towards $0\"; echo unreachable >&2; exit 3");
        let result = tracer.trace(TARGET).await;

        assert_eq!(result.output, " 1  hop towards 203.0.113.1\n");
        assert_eq!(
            result.error,
            Some(TraceError::Exit {
                code: Some(3),
                stderr: "unreachable".to_string()
            })
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_trace_output_is_verbatim() {
        let tracer = sh("printf 'traceroute to %s\\n 1  gw  0.4 ms\\n' \"$0\"");
        let result = tracer.trace(TARGET).await;

        assert!(result.is_ok());
        assert_eq!(result.output, "traceroute to 203.0.113.1\n 1  gw  0.4 ms\n");
    }
}

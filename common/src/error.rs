//! # Error Taxonomy
//!
//! Only setup failures ever abort a run. Probe and trace failures are
//! recovered per item by the stage that hit them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("missing prefix in CIDR '{0}'")]
    MissingPrefix(String),
    #[error("invalid IPv4 address in CIDR '{0}'")]
    Address(String),
    #[error("invalid prefix in CIDR '{0}'")]
    Prefix(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("external_count must be greater than zero")]
    ZeroExternalCount,
    #[error("pool_size must be greater than zero")]
    ZeroPoolSize,
    #[error("traceroute binary must not be empty")]
    EmptyTracerouteBin,
}

/// A single liveness probe that could not be carried out.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to spawn probe for {addr}: {source}")]
    Spawn {
        addr: std::net::IpAddr,
        #[source]
        source: io::Error,
    },
    #[error("probe for {0} timed out")]
    Timeout(std::net::IpAddr),
}

/// Why a path trace did not complete cleanly.
///
/// Stored inside a `TraceResult` rather than returned, so it stays
/// cloneable and comparable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TraceError {
    #[error("failed to run trace utility: {0}")]
    Spawn(String),
    #[error("trace utility exited with {}: {stderr}", exit_code(.code))]
    Exit { code: Option<i32>, stderr: String },
    #[error("trace worker stopped: {0}")]
    Join(String),
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create output root {}: {source}", .path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create namespace {}: {source}", .path.display())]
    Namespace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write record '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("unknown namespace '{0}'")]
    UnknownNamespace(String),
}

/// Errors that end a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("setup failed: {0}")]
    Setup(#[source] SinkError),
    #[error("cannot create trace namespace: {0}")]
    Namespace(#[source] SinkError),
    #[error("cannot persist '{key}': {source}")]
    Persist {
        key: String,
        #[source]
        source: SinkError,
    },
}

impl PipelineError {
    /// True for failures that leave the run without anywhere to write.
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            PipelineError::Config(_) | PipelineError::Setup(_) | PipelineError::Namespace(_)
        )
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

    #[test]
    fn exit_error_mentions_status_or_signal() {
        let with_code = TraceError::Exit {
            code: Some(2),
            stderr: "unknown host".into(),
        };
        assert_eq!(
            with_code.to_string(),
            "trace utility exited with status 2: unknown host"
        );

        let killed = TraceError::Exit {
            code: None,
            stderr: String::new(),
        };
        assert!(killed.to_string().contains("a signal"));
    }

    #[test]
    fn persist_errors_are_not_setup_failures() {
        assert!(PipelineError::Config(ConfigError::ZeroPoolSize).is_setup_failure());
        assert!(
            PipelineError::Namespace(SinkError::UnknownNamespace("t".into())).is_setup_failure()
        );

        let persist = PipelineError::Persist {
            key: "local_ips".into(),
            source: SinkError::UnknownNamespace("x".into()),
        };
        assert!(!persist.is_setup_failure());
    }
}

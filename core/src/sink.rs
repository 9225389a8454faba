//! # Result Sinks
//!
//! [`FsSink`] lays results out on disk:
//!
//! ```text
//! <root>/local_ips.txt
//! <root>/external_ips.txt
//! <root>/traceroute_<stamp>/<address>.txt
//! ```
//!
//! [`MemorySink`] keeps the same structure in memory for embedding and tests.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use reconr_common::error::SinkError;
use reconr_common::sink::{Namespace, ResultSink, render_addresses};
use tracing::debug;

const RECORD_EXT: &str = "txt";

/// Upper bound on `_N` suffixes tried before giving up on a namespace name.
const MAX_NAMESPACE_SUFFIX: usize = 1000;

pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(dir: &Path, key: &str) -> PathBuf {
        dir.join(format!("{key}.{RECORD_EXT}"))
    }

    fn write(path: &Path, key: &str, contents: &str) -> Result<(), SinkError> {
        fs::write(path, contents).map_err(|source| SinkError::Write {
            key: key.to_string(),
            source,
        })?;
        debug!(path = %path.display(), "record written");
        Ok(())
    }
}

impl ResultSink for FsSink {
    fn prepare(&self) -> Result<(), SinkError> {
        fs::create_dir_all(&self.root).map_err(|source| SinkError::Root {
            path: self.root.clone(),
            source,
        })
    }

    fn write_addresses(&self, key: &str, addrs: &[IpAddr]) -> Result<(), SinkError> {
        let path = Self::record_path(&self.root, key);
        Self::write(&path, key, &render_addresses(addrs))
    }

    fn create_namespace(&self, name: &str) -> Result<Namespace, SinkError> {
        let mut candidate: String = name.to_string();
        for suffix in 1..=MAX_NAMESPACE_SUFFIX {
            let path = self.root.join(&candidate);
            match fs::create_dir(&path) {
                Ok(()) => return Ok(Namespace::new(candidate)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    candidate = format!("{name}_{suffix}");
                }
                Err(source) => return Err(SinkError::Namespace { path, source }),
            }
        }
        Err(SinkError::Namespace {
            path: self.root.join(name),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "no free namespace name left"),
        })
    }

    fn write_record(&self, namespace: &Namespace, key: &str, contents: &str) -> Result<(), SinkError> {
        let dir = self.root.join(namespace.name());
        if !dir.is_dir() {
            return Err(SinkError::UnknownNamespace(namespace.to_string()));
        }
        Self::write(&Self::record_path(&dir, key), key, contents)
    }
}

#[derive(Default)]
struct MemoryState {
    addresses: BTreeMap<String, Vec<IpAddr>>,
    namespaces: BTreeMap<String, BTreeMap<String, String>>,
}

/// In-memory sink. [`MemorySink::namespaces`] lists names sorted.
#[derive(Default)]
pub struct MemorySink {
    state: Mutex<MemoryState>,
    unwritable: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose [`ResultSink::prepare`] always fails.
    pub fn unwritable() -> Self {
        Self {
            unwritable: true,
            ..Self::default()
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn addresses(&self, key: &str) -> Option<Vec<IpAddr>> {
        self.state().addresses.get(key).cloned()
    }

    pub fn namespaces(&self) -> Vec<String> {
        self.state().namespaces.keys().cloned().collect()
    }

    /// Records stored in `namespace`, keyed by record name.
    pub fn records(&self, namespace: &str) -> BTreeMap<String, String> {
        self.state().namespaces.get(namespace).cloned().unwrap_or_default()
    }
}

impl ResultSink for MemorySink {
    fn prepare(&self) -> Result<(), SinkError> {
        if self.unwritable {
            return Err(SinkError::Root {
                path: PathBuf::from("<memory>"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "sink is read-only"),
            });
        }
        Ok(())
    }

    fn write_addresses(&self, key: &str, addrs: &[IpAddr]) -> Result<(), SinkError> {
        self.state().addresses.insert(key.to_string(), addrs.to_vec());
        Ok(())
    }

    fn create_namespace(&self, name: &str) -> Result<Namespace, SinkError> {
        let mut state = self.state();
        let mut candidate: String = name.to_string();
        let mut suffix: usize = 0;
        while state.namespaces.contains_key(&candidate) {
            suffix += 1;
            candidate = format!("{name}_{suffix}");
        }
        state.namespaces.insert(candidate.clone(), BTreeMap::new());
        Ok(Namespace::new(candidate))
    }

    fn write_record(&self, namespace: &Namespace, key: &str, contents: &str) -> Result<(), SinkError> {
        let mut state = self.state();
        let records = state
            .namespaces
            .get_mut(namespace.name())
            .ok_or_else(|| SinkError::UnknownNamespace(namespace.to_string()))?;
        records.insert(key.to_string(), contents.to_string());
        Ok(())
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

//! Shared building blocks for `reconr`.
//!
//! Holds everything the other crates agree on: the domain models that travel
//! through the probing pipeline, the collaborator traits that isolate it from
//! the operating system, address classification, configuration and errors.

pub mod config;
pub mod error;
pub mod network;
pub mod probing;
pub mod sink;

#[doc(hidden)]
pub use tracing as __tracing;

/// Logs an informational event.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

/// Logs an informational event flagged as a completed step.
///
/// The terminal formatter renders these with a distinct marker.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(success = true, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}

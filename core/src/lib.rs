//! # reconr core
//!
//! Implements the reconnaissance run: sampling external candidates, sweeping
//! the local subnet with ARP, probing reachability and fanning traceroutes
//! out over a bounded worker pool.
//!
//! Every OS-facing capability is reached through the traits in
//! [`reconr_common::probing`] and [`reconr_common::sink`]; the production
//! bindings live here next to the [`pipeline`] that drives them.

pub mod discovery;
pub mod network;
pub mod observer;
pub mod pipeline;
pub mod pool;
pub mod reachability;
pub mod sampler;
pub mod sink;
pub mod system;
pub mod trace;

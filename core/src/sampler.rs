//! Rejection sampling of globally routable IPv4 addresses.

use std::net::Ipv4Addr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reconr_common::network::address;

/// Draws uniformly random IPv4 addresses and keeps the global ones.
///
/// There is no cap on the number of draws. Termination relies on the global
/// share of the address space, which is well above 80%.
pub struct AddressSampler<R: Rng = StdRng> {
    rng: R,
}

impl AddressSampler<StdRng> {
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AddressSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns exactly `count` global addresses. Duplicates are possible but
    /// improbable.
    pub fn generate(&mut self, count: usize) -> Vec<Ipv4Addr> {
        let mut accepted: Vec<Ipv4Addr> = Vec::with_capacity(count);
        while accepted.len() < count {
            let candidate = Ipv4Addr::from(self.rng.random::<u32>());
            if address::is_global_v4(&candidate) {
                accepted.push(candidate);
            }
        }
        accepted
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

use std::net::IpAddr;

use reconr_common::config::Config;
use reconr_core::sampler::AddressSampler;

use crate::terminal::{format, print};

pub fn sample(cfg: &Config) -> anyhow::Result<()> {
    cfg.validate()?;
    let addresses = AddressSampler::from_os_rng().generate(cfg.external_count);

    for addr in addresses {
        if cfg.quiet > 1 {
            print::print(&addr.to_string());
        } else {
            let (_, value) = format::ip_to_detail(&IpAddr::V4(addr));
            print::print(&value.to_string());
        }
    }
    Ok(())
}

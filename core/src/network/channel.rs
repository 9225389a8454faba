use std::time::Duration;

use anyhow::{Context, bail};
use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender, NetworkInterface};
use reconr_common::info;

/// Read timeout of the capture side, so listeners can notice a stop request.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

pub type EthernetChannel = (Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>);

pub fn open(intf: &NetworkInterface) -> anyhow::Result<EthernetChannel> {
    open_eth_channel(intf, &get_config(), datalink::channel)
}

pub fn open_eth_channel<F>(
    intf: &NetworkInterface,
    cfg: &Config,
    channel_opener: F,
) -> anyhow::Result<EthernetChannel>
where
    F: FnOnce(&NetworkInterface, Config) -> std::io::Result<datalink::Channel>,
{
    let ch: Channel =
        channel_opener(intf, *cfg).with_context(|| format!("opening on {}", intf.name))?;
    match ch {
        Channel::Ethernet(tx, rx) => {
            info!("Opened layer 2 channel on {}", intf.name);
            Ok((tx, rx))
        }
        _ => bail!("non-ethernet channel for {}", intf.name),
    }
}

pub fn get_config() -> Config {
    Config {
        read_timeout: Some(READ_TIMEOUT),
        ..Default::default()
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
    use pnet::datalink::dummy;

    #[test]
    fn open_eth_channel_should_succeed_on_ethernet_channel() {
        let dummy_intf: NetworkInterface = dummy::dummy_interface(0);
        let mock_opener_success =
            |i: &NetworkInterface, _cfg: Config| -> std::io::Result<datalink::Channel> {
                datalink::dummy::channel(i, dummy::Config::default())
            };
        let result = open_eth_channel(&dummy_intf, &get_config(), mock_opener_success);
        assert!(result.is_ok());
    }

    #[test]
    fn open_eth_channel_should_fail_on_io_error() {
        let dummy_intf: NetworkInterface = dummy::dummy_interface(0);
        let mock_opener_fail =
            |_: &NetworkInterface, _: Config| -> std::io::Result<datalink::Channel> {
                Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "Mock I/O Error",
                ))
            };
        let Err(e) = open_eth_channel(&dummy_intf, &Config::default(), mock_opener_fail) else {
            panic!("expected opening to fail");
        };

        assert!(e.to_string().contains("opening on eth0"));
        let cause = e
            .downcast_ref::<std::io::Error>()
            .expect("Error cause was not an std::io::Error");
        assert_eq!(cause.kind(), std::io::ErrorKind::PermissionDenied);
    }
}

use std::net::IpAddr;

use log::{debug, info};

use scenesync_shared::SenderId;

/// Picks the ID stamped on outgoing updates: the configured one, else the
/// low byte of the local address, else a random non-zero byte
pub fn resolve_sender_id(configured: Option<SenderId>, local_ip: Option<IpAddr>) -> SenderId {
    if let Some(sender_id) = configured {
        return sender_id;
    }
    let from_address = local_ip
        .map(|ip| match ip {
            IpAddr::V4(ip) => ip.octets()[3],
            IpAddr::V6(ip) => ip.octets()[15],
        })
        .filter(|byte| *byte != 0);

    match from_address {
        Some(sender_id) => {
            debug!("Sender ID {} taken from local address", sender_id);
            sender_id
        }
        None => {
            let sender_id = fastrand::u8(1..=u8::MAX);
            info!("No usable local address, using random sender ID {}", sender_id);
            sender_id
        }
    }
}

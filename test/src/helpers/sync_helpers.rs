use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use scenesync_client::{ClientConfig, SyncClient, UpdateEvents};
use scenesync_shared::{Connector, SenderId};

/// Upper bound for anything the relay threads need to deliver
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_STEP: Duration = Duration::from_millis(5);

pub fn client_config(sender_id: SenderId) -> ClientConfig {
    ClientConfig {
        sender_id: Some(sender_id),
        poll_interval: Duration::from_millis(5),
        request_timeout: Duration::from_secs(2),
        ..ClientConfig::default()
    }
}

/// A client that has received the scene and joined the update bus
pub fn connect_client(connector: Arc<dyn Connector>, sender_id: SenderId) -> SyncClient {
    let mut client = SyncClient::new(client_config(sender_id), connector);
    client
        .receive_scene(|_, _| {})
        .expect("scene transfer should succeed");
    client.start_sync().expect("client should join the update bus");
    client
}

/// Ticks `client` until `done` accepts the events gathered so far.
/// Returns every tick's events merged in arrival order.
pub fn tick_until(
    client: &mut SyncClient,
    mut done: impl FnMut(&SyncClient, &[UpdateEvents]) -> bool,
) -> Vec<UpdateEvents> {
    let deadline = Instant::now() + WAIT_TIMEOUT;
    let mut gathered = Vec::new();
    loop {
        let events = client.tick();
        if !events.is_empty() {
            gathered.push(events);
        }
        if done(client, &gathered) || Instant::now() >= deadline {
            return gathered;
        }
        thread::sleep(POLL_STEP);
    }
}

/// Polls `condition` until it holds or `WAIT_TIMEOUT` passes
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT_TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(POLL_STEP);
    }
    condition()
}

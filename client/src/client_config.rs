use std::{default::Default, path::PathBuf, time::Duration};

use scenesync_shared::{
    Endpoint, LockMode, SenderId, DEFAULT_PUBLISH_PORT, DEFAULT_RECEIVE_TIMEOUT,
    DEFAULT_SCENE_PORT, DEFAULT_SUBSCRIBE_PORT, INBOUND_QUEUE_CAPACITY,
};

use crate::sender::publisher::PublisherSettings;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Host serving both the scene transfer and the update bus
    pub server_host: String,
    /// Port of the request/reply scene transfer bus
    pub scene_port: u16,
    /// Port the Client receives live updates on
    pub subscribe_port: u16,
    /// Port the Client publishes its own edits to
    pub publish_port: u16,
    /// Skips textures, materials and characters during scene transfer, to
    /// save bandwidth when the Client does not render them
    pub skip_auxiliary: bool,
    /// Sender ID stamped on every outgoing update. When `None` the low byte
    /// of the local address used to reach the host is taken, falling back to
    /// a random non-zero byte.
    pub sender_id: Option<SenderId>,
    /// How long each scene transfer request waits for its reply before the
    /// whole transfer is aborted
    pub request_timeout: Duration,
    /// Silence on the update bus after which the connection is reported as
    /// possibly stale. Informational only, the subscriber keeps listening.
    pub receive_timeout: Duration,
    /// How long the subscriber and publisher loops block before checking
    /// whether they were asked to stop
    pub poll_interval: Duration,
    /// Frames buffered between the subscriber thread and `tick`. When full
    /// the oldest frame is dropped.
    pub inbound_capacity: usize,
    /// Frames buffered between local edits and each sender's publisher thread
    pub outbound_capacity: usize,
    /// Whether edits from a non-owner of a locked object are applied with a
    /// warning or rejected
    pub lock_mode: LockMode,
    /// How long `shutdown` waits for each network thread before detaching it
    pub shutdown_grace: Duration,
    /// Directory the last received scene is cached in, if any
    pub cache_directory: Option<PathBuf>,
}

impl ClientConfig {
    pub fn scene_endpoint(&self) -> Endpoint {
        Endpoint::new(self.server_host.clone(), self.scene_port)
    }

    pub fn subscribe_endpoint(&self) -> Endpoint {
        Endpoint::new(self.server_host.clone(), self.subscribe_port)
    }

    pub fn publish_endpoint(&self) -> Endpoint {
        Endpoint::new(self.server_host.clone(), self.publish_port)
    }

    pub fn publisher_settings(&self) -> PublisherSettings {
        PublisherSettings {
            capacity: self.outbound_capacity,
            poll_interval: self.poll_interval,
            shutdown_grace: self.shutdown_grace,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            scene_port: DEFAULT_SCENE_PORT,
            subscribe_port: DEFAULT_SUBSCRIBE_PORT,
            publish_port: DEFAULT_PUBLISH_PORT,
            skip_auxiliary: false,
            sender_id: None,
            request_timeout: Duration::from_secs(10),
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
            poll_interval: Duration::from_millis(50),
            inbound_capacity: INBOUND_QUEUE_CAPACITY,
            outbound_capacity: 256,
            lock_mode: LockMode::default(),
            shutdown_grace: Duration::from_secs(1),
            cache_directory: None,
        }
    }
}

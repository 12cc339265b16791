use std::{default::Default, time::Duration};

use scenesync_shared::{DEFAULT_PUBLISH_PORT, DEFAULT_SCENE_PORT, DEFAULT_SUBSCRIBE_PORT};

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Interface every listener binds to
    pub bind_host: String,
    /// Port answering scene transfer requests
    pub scene_port: u16,
    /// Port clients connect to in order to receive relayed updates
    pub subscribe_port: u16,
    /// Port clients connect to in order to publish their edits
    pub publish_port: u16,
    /// How long listener and connection threads block before checking
    /// whether the Server is shutting down
    pub poll_interval: Duration,
    /// How long shutdown waits for each thread before detaching it
    pub shutdown_grace: Duration,
    /// How many relayed frames may wait for one subscriber before it is
    /// considered stalled and dropped
    pub subscriber_capacity: usize,
    /// How long a write to a subscriber may block before the connection is
    /// closed
    pub write_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            scene_port: DEFAULT_SCENE_PORT,
            subscribe_port: DEFAULT_SUBSCRIBE_PORT,
            publish_port: DEFAULT_PUBLISH_PORT,
            poll_interval: Duration::from_millis(50),
            shutdown_grace: Duration::from_secs(1),
            subscriber_capacity: 256,
            write_timeout: Duration::from_secs(1),
        }
    }
}

pub mod endpoint;
pub mod error;
pub mod frame;

cfg_if! {
    if #[cfg(feature = "transport_tcp")] {
        pub mod tcp;
    } else {}
}

pub use inner::{Connector, FrameReceiver, FrameSender, Requester};

mod inner {
    use std::{net::IpAddr, time::Duration};

    use super::{endpoint::Endpoint, error::TransportError};

    /// Opens the sockets a participant needs, one per bus
    pub trait Connector: Send + Sync {
        /// Connects a socket that publishes frames onto the update bus
        fn connect_publisher(&self, endpoint: &Endpoint) -> Result<Box<dyn FrameSender>, TransportError>;
        /// Connects a socket that receives every frame on the update bus
        fn connect_subscriber(&self, endpoint: &Endpoint) -> Result<Box<dyn FrameReceiver>, TransportError>;
        /// Connects a request/reply socket whose replies time out after `timeout`
        fn connect_requester(
            &self,
            endpoint: &Endpoint,
            timeout: Duration,
        ) -> Result<Box<dyn Requester>, TransportError>;
        /// Local address used to reach `endpoint`, when the transport has one
        fn local_ip(&self, _endpoint: &Endpoint) -> Option<IpAddr> {
            None
        }
    }

    pub trait FrameSender: Send {
        /// Publishes one frame
        fn send(&mut self, frame: &[u8]) -> Result<(), TransportError>;
    }

    pub trait FrameReceiver: Send {
        /// Waits up to `timeout` for the next frame, `Ok(None)` if none arrived
        fn receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError>;
    }

    pub trait Requester: Send {
        /// Sends one command and blocks for exactly one reply frame
        fn request(&mut self, command: &[u8]) -> Result<Vec<u8>, TransportError>;
    }
}

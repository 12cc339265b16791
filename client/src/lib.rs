//! # Scenesync Client
//! Receives a scene snapshot from a scenesync host over the request/reply
//! scene bus, keeps it in sync through the live update bus, and publishes
//! local edits through pluggable object senders.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

#[macro_use]
extern crate cfg_if;

pub mod shared {
    pub use scenesync_shared::{
        ApplyOutcome, Connector, Endpoint, LockCoordinator, LockMode, LockTransition, ObjectId,
        ParamType, ParameterUpdate, ParameterValue, SceneBuffers, SceneCache, SceneCategory,
        SceneData, SenderId,
    };
}

mod client_config;
mod error;
mod sender;
mod sender_id;
mod sync_client;
mod transfer;
mod update;

pub use client_config::ClientConfig;
pub use error::{SenderError, SyncClientError, TransferError};
pub use sender::{
    binary_sender::BinarySender,
    publisher::{Publisher, PublisherSettings},
    sender_registry::SenderRegistry,
    text_sender::TextSender,
    ObjectSender,
};
pub use sender_id::resolve_sender_id;
pub use sync_client::{SyncClient, LAST_SCENE_NAME};
pub use transfer::{
    scene_receiver::{progress_after, SceneReceiver, PROGRESS_DONE, PROGRESS_INIT},
    transfer_state::TransferState,
};
pub use update::{update_events::UpdateEvents, update_subscriber::UpdateSubscriber};

cfg_if! {
    if #[cfg(feature = "transport_tcp")] {
        use std::sync::Arc;

        use scenesync_shared::TcpConnector;

        impl SyncClient {
            /// Create a new Client talking TCP to `config.server_host`
            pub fn tcp(config: ClientConfig) -> Self {
                let connector = TcpConnector::new(config.request_timeout);
                Self::new(config, Arc::new(connector))
            }
        }
    } else {}
}

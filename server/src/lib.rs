//! # Scenesync Server
//! Serves scene snapshots over the request/reply transfer protocol and
//! relays live parameter updates between every connected client, caching
//! the latest state of each object for clients that ask for a resend.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

#[macro_use]
extern crate cfg_if;

pub mod transport;
pub mod shared {
    pub use scenesync_shared::{
        Endpoint, LockCoordinator, ObjectId, ParamType, ParameterUpdate, ParameterValue,
        SceneBuffers, SceneCache, SceneCategory, SceneData, SenderId,
    };
}

mod error;
mod scene_server;
mod server_config;
mod subscriber_writer;
mod sync_relay;
mod sync_server;

pub use error::SyncServerError;
pub use scene_server::SceneServer;
pub use server_config::ServerConfig;
pub use sync_relay::SyncRelay;
pub use sync_server::SyncServer;

cfg_if! {
    if #[cfg(feature = "transport_tcp")] {
        pub use transport::tcp::TcpServer;
    } else {}
}

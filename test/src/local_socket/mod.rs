/// In-memory transport for E2E testing
/// Routes update frames through a real relay and answers scene requests
/// from a real scene server, without network I/O

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::debug;

use scenesync_server::{SceneServer, ServerConfig, SyncServer};
use scenesync_shared::{
    Connector, Endpoint, FrameReceiver, FrameSender, Requester, TransportError,
};

/// One relay plus one scene server that every connector handed out shares
pub struct LocalNetwork {
    sync: SyncServer,
    scene: SceneServer,
    commands: Arc<Mutex<Vec<String>>>,
    publishers: AtomicUsize,
}

impl LocalNetwork {
    pub fn new(scene: SceneServer) -> Arc<Self> {
        let config = ServerConfig {
            poll_interval: Duration::from_millis(5),
            ..ServerConfig::default()
        };
        Arc::new(Self {
            sync: SyncServer::new(&config),
            scene,
            commands: Arc::new(Mutex::new(Vec::new())),
            publishers: AtomicUsize::new(0),
        })
    }

    pub fn sync_server(&self) -> &SyncServer {
        &self.sync
    }

    pub fn scene_server(&self) -> &SceneServer {
        &self.scene
    }

    /// Every scene transfer command received so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn shutdown(&self) {
        self.sync.shutdown();
    }
}

impl Drop for LocalNetwork {
    fn drop(&mut self) {
        self.sync.shutdown();
    }
}

impl Connector for LocalNetwork {
    fn connect_publisher(&self, _: &Endpoint) -> Result<Box<dyn FrameSender>, TransportError> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let peer = format!("local-{}", self.publishers.fetch_add(1, Ordering::Relaxed));
        self.sync
            .add_publisher(Box::new(LocalReceiver { receiver }), peer)
            .map_err(|error| TransportError::Io(error.to_string()))?;
        Ok(Box::new(LocalSender { sender }))
    }

    fn connect_subscriber(&self, _: &Endpoint) -> Result<Box<dyn FrameReceiver>, TransportError> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.sync
            .add_subscriber(Box::new(LocalSender { sender }))
            .map_err(|error| TransportError::Io(error.to_string()))?;
        Ok(Box::new(LocalReceiver { receiver }))
    }

    fn connect_requester(
        &self,
        _: &Endpoint,
        _: Duration,
    ) -> Result<Box<dyn Requester>, TransportError> {
        Ok(Box::new(LocalRequester {
            scene: self.scene.clone(),
            commands: self.commands.clone(),
        }))
    }
}

// Sockets

pub struct LocalSender {
    sender: Sender<Vec<u8>>,
}

impl FrameSender for LocalSender {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        self.sender
            .send(frame.to_vec())
            .map_err(|_| TransportError::SocketClosed)
    }
}

pub struct LocalReceiver {
    receiver: Receiver<Vec<u8>>,
}

impl FrameReceiver for LocalReceiver {
    fn receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(frame) => Ok(Some(frame)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(TransportError::SocketClosed),
        }
    }
}

pub struct LocalRequester {
    scene: SceneServer,
    commands: Arc<Mutex<Vec<String>>>,
}

impl Requester for LocalRequester {
    fn request(&mut self, command: &[u8]) -> Result<Vec<u8>, TransportError> {
        let command_text = String::from_utf8_lossy(command).into_owned();
        debug!("Local scene request '{}'", command_text);
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command_text);
        Ok(self.scene.respond(command))
    }
}

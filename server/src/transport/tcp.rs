use std::{
    io::ErrorKind,
    net::{SocketAddr, TcpListener, TcpStream},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{debug, info, warn};

use scenesync_shared::{join_with_grace, TcpFrameReceiver, TcpFrameSender};

use crate::{
    error::SyncServerError, scene_server::SceneServer, server_config::ServerConfig,
    sync_server::SyncServer,
};

/// Serves scene transfers and relays live updates over TCP
pub struct TcpServer {
    config: ServerConfig,
    scene: SceneServer,
    sync: SyncServer,
    running: Arc<AtomicBool>,
    acceptors: Vec<(String, JoinHandle<()>)>,
    scene_addr: Option<SocketAddr>,
    subscribe_addr: Option<SocketAddr>,
    publish_addr: Option<SocketAddr>,
}

impl TcpServer {
    pub fn new(config: ServerConfig, scene: SceneServer) -> Self {
        let sync = SyncServer::new(&config);
        Self {
            config,
            scene,
            sync,
            running: Arc::new(AtomicBool::new(false)),
            acceptors: Vec::new(),
            scene_addr: None,
            subscribe_addr: None,
            publish_addr: None,
        }
    }

    /// Binds the scene, subscribe and publish ports and starts accepting.
    /// Port 0 binds an ephemeral port, see the `*_addr` accessors.
    pub fn listen(&mut self) -> Result<(), SyncServerError> {
        let scene_listener = self.bind(self.config.scene_port)?;
        let subscribe_listener = self.bind(self.config.subscribe_port)?;
        let publish_listener = self.bind(self.config.publish_port)?;
        self.scene_addr = scene_listener.local_addr().ok();
        self.subscribe_addr = subscribe_listener.local_addr().ok();
        self.publish_addr = publish_listener.local_addr().ok();
        self.running.store(true, Ordering::Relaxed);

        let scene = self.scene.clone();
        let running = self.running.clone();
        let poll_interval = self.config.poll_interval;
        self.spawn_acceptor("scene", scene_listener, move |stream, peer| {
            serve_scene(&scene, stream, peer, running.clone(), poll_interval)
        })?;

        let sync = self.sync.clone();
        let write_timeout = self.config.write_timeout;
        self.spawn_acceptor("subscribe", subscribe_listener, move |stream, peer| {
            // a peer that stops reading fails its writer instead of pinning it
            if let Err(error) = stream.set_write_timeout(Some(write_timeout)) {
                warn!("Rejecting subscriber {}: {}", peer, error);
                return;
            }
            if let Err(error) = sync.add_subscriber(Box::new(TcpFrameSender::new(stream))) {
                warn!("Dropping subscriber {}: {}", peer, error);
            }
        })?;

        let sync = self.sync.clone();
        self.spawn_acceptor("publish", publish_listener, move |stream, peer| {
            let receiver = Box::new(TcpFrameReceiver::new(stream));
            if let Err(error) = sync.add_publisher(receiver, peer.to_string()) {
                warn!("Dropping publisher {}: {}", peer, error);
            }
        })?;

        info!(
            "Listening: scene {:?}, subscribe {:?}, publish {:?}",
            self.scene_addr, self.subscribe_addr, self.publish_addr
        );
        Ok(())
    }

    pub fn scene_addr(&self) -> Option<SocketAddr> {
        self.scene_addr
    }

    pub fn subscribe_addr(&self) -> Option<SocketAddr> {
        self.subscribe_addr
    }

    pub fn publish_addr(&self) -> Option<SocketAddr> {
        self.publish_addr
    }

    pub fn scene_server(&self) -> &SceneServer {
        &self.scene
    }

    pub fn sync_server(&self) -> &SyncServer {
        &self.sync
    }

    /// Stops accepting, stops every relay thread and closes every connection.
    /// Scene connection threads exit once they notice the stop.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        for (name, handle) in self.acceptors.drain(..) {
            join_with_grace(&name, handle, self.config.shutdown_grace);
        }
        self.sync.shutdown();
    }

    fn bind(&self, port: u16) -> Result<TcpListener, SyncServerError> {
        let address = format!("{}:{}", self.config.bind_host, port);
        let listener = TcpListener::bind(&address).map_err(|error| SyncServerError::Bind {
            address: address.clone(),
            reason: error.to_string(),
        })?;
        // accept polls so the acceptor can observe shutdown
        listener
            .set_nonblocking(true)
            .map_err(|error| SyncServerError::Bind {
                address,
                reason: error.to_string(),
            })?;
        Ok(listener)
    }

    fn spawn_acceptor(
        &mut self,
        name: &str,
        listener: TcpListener,
        mut on_accept: impl FnMut(TcpStream, SocketAddr) + Send + 'static,
    ) -> Result<(), SyncServerError> {
        let running = self.running.clone();
        let poll_interval = self.config.poll_interval;
        let thread_name = format!("{} acceptor", name);
        let handle = thread::Builder::new()
            .name(format!("scenesync-{}-acceptor", name))
            .spawn(move || {
                while running.load(Ordering::Relaxed) {
                    match listener.accept() {
                        Ok((stream, peer)) => {
                            if let Err(error) = prepare(&stream) {
                                warn!("Rejecting connection from {}: {}", peer, error);
                                continue;
                            }
                            debug!("Accepted connection from {}", peer);
                            on_accept(stream, peer);
                        }
                        Err(error) if error.kind() == ErrorKind::WouldBlock => {
                            thread::sleep(poll_interval)
                        }
                        Err(error) => {
                            warn!("Accept failed: {}", error);
                            thread::sleep(poll_interval);
                        }
                    }
                }
            })
            .map_err(|error| SyncServerError::Spawn {
                name: thread_name.clone(),
                reason: error.to_string(),
            })?;
        self.acceptors.push((thread_name, handle));
        Ok(())
    }
}

impl Drop for TcpServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// accepted streams may inherit the listener's non-blocking mode
fn prepare(stream: &TcpStream) -> std::io::Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_nodelay(true)
}

fn serve_scene(
    scene: &SceneServer,
    stream: TcpStream,
    peer: SocketAddr,
    running: Arc<AtomicBool>,
    poll_interval: Duration,
) {
    let writer = match stream.try_clone() {
        Ok(writer) => writer,
        Err(error) => {
            warn!("Cannot serve scene to {}: {}", peer, error);
            return;
        }
    };
    let scene = scene.clone();
    let spawned = thread::Builder::new()
        .name(format!("scenesync-scene-{}", peer))
        .spawn(move || {
            scene.serve(
                Box::new(TcpFrameReceiver::new(stream)),
                Box::new(TcpFrameSender::new(writer)),
                &running,
                poll_interval,
            );
            debug!("Scene connection {} closed", peer);
        });
    if let Err(error) = spawned {
        warn!("Cannot serve scene to {}: {}", peer, error);
    }
}

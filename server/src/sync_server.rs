use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{debug, info, warn};

use scenesync_shared::{join_with_grace, FrameReceiver, FrameSender, SenderId, FRAME_HEADER_SIZE};

use crate::{
    error::SyncServerError,
    server_config::ServerConfig,
    subscriber_writer::{Delivery, SubscriberWriter},
    sync_relay::SyncRelay,
};

/// Relays every frame published by a client to every subscribed client.
/// Cloning yields another handle onto the same relay.
#[derive(Clone)]
pub struct SyncServer {
    hub: Arc<RelayHub>,
    running: Arc<AtomicBool>,
    poll_interval: Duration,
    shutdown_grace: Duration,
    subscriber_capacity: usize,
}

struct RelayHub {
    relay: Mutex<SyncRelay>,
    subscribers: Mutex<Vec<SubscriberWriter>>,
    publishers: Mutex<Vec<(String, JoinHandle<()>)>>,
    next_subscriber: AtomicUsize,
}

impl SyncServer {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            hub: Arc::new(RelayHub {
                relay: Mutex::new(SyncRelay::new()),
                subscribers: Mutex::new(Vec::new()),
                publishers: Mutex::new(Vec::new()),
                next_subscriber: AtomicUsize::new(0),
            }),
            running: Arc::new(AtomicBool::new(true)),
            poll_interval: config.poll_interval,
            shutdown_grace: config.shutdown_grace,
            subscriber_capacity: config.subscriber_capacity,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Adds a connection that receives every relayed frame. Frames are
    /// written from a dedicated thread; a subscriber that falls
    /// `subscriber_capacity` frames behind is dropped.
    pub fn add_subscriber(&self, subscriber: Box<dyn FrameSender>) -> Result<(), SyncServerError> {
        let index = self.hub.next_subscriber.fetch_add(1, Ordering::Relaxed);
        let writer = SubscriberWriter::start(
            format!("subscriber-{}", index),
            subscriber,
            self.subscriber_capacity,
            self.running.clone(),
            self.poll_interval,
        )?;
        let mut subscribers = lock(&self.hub.subscribers);
        subscribers.push(writer);
        info!("Subscriber joined, {} connected", subscribers.len());
        Ok(())
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.hub.subscribers).len()
    }

    /// Reads frames from one publishing connection on its own thread
    pub fn add_publisher(
        &self,
        receiver: Box<dyn FrameReceiver>,
        peer: String,
    ) -> Result<(), SyncServerError> {
        let server = self.clone();
        let thread_name = format!("publisher {}", peer);
        let handle = thread::Builder::new()
            .name(format!("scenesync-publisher-{}", peer))
            .spawn(move || server.publisher_loop(receiver, &peer))
            .map_err(|error| SyncServerError::Spawn {
                name: thread_name.clone(),
                reason: error.to_string(),
            })?;

        let mut publishers = lock(&self.hub.publishers);
        publishers.retain(|(_, handle)| !handle.is_finished());
        publishers.push((thread_name, handle));
        Ok(())
    }

    /// Relays one published frame, returns how many subscribers remain
    pub fn handle_frame(&self, frame: &[u8]) -> usize {
        let outgoing = lock(&self.hub.relay).relay(frame);
        self.broadcast(&outgoing)
    }

    /// Tells every subscriber the locks of a departed sender are gone
    pub fn release_sender(&self, sender_id: SenderId) -> usize {
        let unlocks = lock(&self.hub.relay).release_sender(sender_id);
        self.broadcast(&unlocks)
    }

    /// Runs `inspect` against the relay state
    pub fn with_relay<T>(&self, inspect: impl FnOnce(&SyncRelay) -> T) -> T {
        inspect(&lock(&self.hub.relay))
    }

    /// Forgets cached states and locks, for when a new scene is served
    pub fn reset(&self) {
        lock(&self.hub.relay).clear();
    }

    fn broadcast(&self, frames: &[Vec<u8>]) -> usize {
        let mut subscribers = lock(&self.hub.subscribers);
        if frames.is_empty() {
            return subscribers.len();
        }
        let mut index = 0;
        while index < subscribers.len() {
            match deliver(&subscribers[index], frames) {
                Delivery::Queued => index += 1,
                delivery => {
                    let writer = subscribers.swap_remove(index);
                    if delivery == Delivery::Lagging {
                        warn!("Subscriber {} is not reading, dropping it", writer.name());
                    } else {
                        debug!("Subscriber {} is gone", writer.name());
                    }
                    // detached; it exits once its pending write returns
                    drop(writer.close());
                }
            }
        }
        subscribers.len()
    }

    fn publisher_loop(&self, mut receiver: Box<dyn FrameReceiver>, peer: &str) {
        debug!("Publisher {} connected", peer);
        let mut senders = HashSet::new();

        while self.is_running() {
            match receiver.receive(self.poll_interval) {
                Ok(Some(frame)) => {
                    if frame.len() >= FRAME_HEADER_SIZE {
                        senders.insert(frame[0]);
                    }
                    self.handle_frame(&frame);
                }
                Ok(None) => {}
                Err(error) => {
                    if !self.is_running() {
                        debug!("Publisher {} closed during shutdown", peer);
                    } else if error.is_closed() {
                        info!("Publisher {} disconnected", peer);
                    } else {
                        warn!("Publisher {} failed: {}", peer, error);
                    }
                    break;
                }
            }
        }

        if self.is_running() {
            for sender_id in senders {
                self.release_sender(sender_id);
            }
        }
    }

    /// Stops every publisher thread and drops every subscriber
    pub fn shutdown(&self) {
        if !self.running.swap(false, Ordering::Relaxed) {
            return;
        }
        let publishers: Vec<_> = lock(&self.hub.publishers).drain(..).collect();
        for (name, handle) in publishers {
            join_with_grace(&name, handle, self.shutdown_grace);
        }
        let writers: Vec<_> = lock(&self.hub.subscribers).drain(..).collect();
        for writer in writers {
            let (name, handle) = writer.close();
            join_with_grace(&name, handle, self.shutdown_grace);
        }
        info!("Sync relay stopped");
    }
}

fn deliver(writer: &SubscriberWriter, frames: &[Vec<u8>]) -> Delivery {
    for frame in frames {
        let delivery = writer.push(frame);
        if delivery != Delivery::Queued {
            return delivery;
        }
    }
    Delivery::Queued
}

// a panicked relay thread leaves the data usable, keep serving
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

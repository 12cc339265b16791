use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{debug, info, warn};

use scenesync_shared::{join_with_grace, Connector, Endpoint, FrameReceiver, TransportError};

use crate::client_config::ClientConfig;

/// Receives update bus frames on a dedicated thread and hands them to the
/// main thread through a bounded queue
pub struct UpdateSubscriber {
    running: Arc<AtomicBool>,
    inbound: Receiver<Vec<u8>>,
    last_received: Arc<Mutex<Instant>>,
    dropped: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
    shutdown_grace: Duration,
}

impl UpdateSubscriber {
    pub fn start(connector: &dyn Connector, config: &ClientConfig) -> Result<Self, TransportError> {
        let endpoint = config.subscribe_endpoint();
        let receiver = connector.connect_subscriber(&endpoint)?;
        Self::spawn(receiver, endpoint, config)
    }

    /// Starts the subscriber thread over an already connected receiver
    pub fn spawn(
        receiver: Box<dyn FrameReceiver>,
        endpoint: Endpoint,
        config: &ClientConfig,
    ) -> Result<Self, TransportError> {
        let (sender, inbound) = crossbeam_channel::bounded(config.inbound_capacity.max(1));
        let running = Arc::new(AtomicBool::new(true));
        let last_received = Arc::new(Mutex::new(Instant::now()));
        let dropped = Arc::new(AtomicU64::new(0));

        let subscriber_loop = SubscriberLoop {
            receiver,
            endpoint,
            sender,
            overflow: inbound.clone(),
            running: running.clone(),
            last_received: last_received.clone(),
            dropped: dropped.clone(),
            poll_interval: config.poll_interval,
            receive_timeout: config.receive_timeout,
        };
        let handle = thread::Builder::new()
            .name("scenesync-subscriber".to_string())
            .spawn(move || subscriber_loop.run())
            .map_err(|error| TransportError::Io(error.to_string()))?;

        Ok(Self {
            running,
            inbound,
            last_received,
            dropped,
            handle: Some(handle),
            shutdown_grace: config.shutdown_grace,
        })
    }

    /// Takes every frame received so far, without blocking
    pub fn drain(&self) -> Vec<Vec<u8>> {
        self.inbound.try_iter().collect()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
            && self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// When the last frame arrived, or when the subscriber started
    pub fn last_received(&self) -> Instant {
        match self.last_received.lock() {
            Ok(instant) => *instant,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Frames discarded because the queue was full
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            join_with_grace("subscriber", handle, self.shutdown_grace);
        }
    }
}

impl Drop for UpdateSubscriber {
    fn drop(&mut self) {
        self.stop();
    }
}

struct SubscriberLoop {
    receiver: Box<dyn FrameReceiver>,
    endpoint: Endpoint,
    sender: Sender<Vec<u8>>,
    // second handle on the queue, used to evict the oldest frame
    overflow: Receiver<Vec<u8>>,
    running: Arc<AtomicBool>,
    last_received: Arc<Mutex<Instant>>,
    dropped: Arc<AtomicU64>,
    poll_interval: Duration,
    receive_timeout: Duration,
}

impl SubscriberLoop {
    fn run(mut self) {
        debug!("Subscriber listening on {}", self.endpoint);
        let mut reported_stale = false;

        while self.running.load(Ordering::Relaxed) {
            match self.receiver.receive(self.poll_interval) {
                Ok(Some(frame)) => {
                    self.touch();
                    reported_stale = false;
                    self.enqueue(frame);
                }
                Ok(None) => {
                    if !reported_stale && self.silence() >= self.receive_timeout {
                        info!(
                            "No updates from {} for {:?}, connection may be stale",
                            self.endpoint, self.receive_timeout
                        );
                        reported_stale = true;
                    }
                }
                Err(error) => {
                    if !self.running.load(Ordering::Relaxed) {
                        debug!("Subscriber socket closed during shutdown: {}", error);
                    } else if error.is_closed() {
                        warn!("Update bus {} closed the connection", self.endpoint);
                    } else {
                        warn!("Subscriber on {} failed: {}", self.endpoint, error);
                    }
                    break;
                }
            }
        }
        self.running.store(false, Ordering::Relaxed);
        debug!("Subscriber on {} stopped", self.endpoint);
    }

    fn enqueue(&self, frame: Vec<u8>) {
        match self.sender.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(frame)) => {
                let _ = self.overflow.try_recv();
                self.dropped.fetch_add(1, Ordering::Relaxed);
                debug!("Inbound update queue full, dropped the oldest frame");
                let _ = self.sender.try_send(frame);
            }
            Err(TrySendError::Disconnected(_)) => {
                self.running.store(false, Ordering::Relaxed);
            }
        }
    }

    fn touch(&self) {
        if let Ok(mut last_received) = self.last_received.lock() {
            *last_received = Instant::now();
        }
    }

    fn silence(&self) -> Duration {
        match self.last_received.lock() {
            Ok(last_received) => last_received.elapsed(),
            Err(_) => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::RecvTimeoutError;

    use super::*;

    // Feeds frames pushed through a channel into the subscriber
    struct ChannelReceiver(Receiver<Vec<u8>>);

    impl FrameReceiver for ChannelReceiver {
        fn receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
            match self.0.recv_timeout(timeout) {
                Ok(frame) => Ok(Some(frame)),
                Err(RecvTimeoutError::Timeout) => Ok(None),
                Err(RecvTimeoutError::Disconnected) => Err(TransportError::SocketClosed),
            }
        }
    }

    fn config(capacity: usize) -> ClientConfig {
        ClientConfig {
            inbound_capacity: capacity,
            poll_interval: Duration::from_millis(5),
            ..ClientConfig::default()
        }
    }

    fn wait_until(mut condition: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while !condition() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn test_frames_reach_the_queue_in_order() {
        let (feed, frames) = crossbeam_channel::unbounded();
        let mut subscriber =
            UpdateSubscriber::spawn(Box::new(ChannelReceiver(frames)), Endpoint::new("bus", 1), &config(8))
                .unwrap();

        for index in 0..3u8 {
            feed.send(vec![index]).unwrap();
        }
        let mut received = Vec::new();
        wait_until(|| {
            received.extend(subscriber.drain());
            received.len() == 3
        });

        assert_eq!(received, vec![vec![0], vec![1], vec![2]]);
        subscriber.stop();
        assert!(!subscriber.is_running());
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let (feed, frames) = crossbeam_channel::unbounded();
        let subscriber =
            UpdateSubscriber::spawn(Box::new(ChannelReceiver(frames)), Endpoint::new("bus", 1), &config(2))
                .unwrap();

        for index in 0..5u8 {
            feed.send(vec![index]).unwrap();
        }
        wait_until(|| subscriber.dropped_frames() == 3);

        assert_eq!(subscriber.drain(), vec![vec![3], vec![4]]);
    }

    #[test]
    fn test_closed_socket_stops_loop() {
        let (feed, frames) = crossbeam_channel::unbounded::<Vec<u8>>();
        let subscriber =
            UpdateSubscriber::spawn(Box::new(ChannelReceiver(frames)), Endpoint::new("bus", 1), &config(2))
                .unwrap();

        drop(feed);
        wait_until(|| !subscriber.is_running());

        assert!(!subscriber.is_running());
    }
}

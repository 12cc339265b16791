use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use log::{debug, info};

use scenesync_shared::FrameSender;

use crate::error::SyncServerError;

/// What happened to a frame handed to a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    Queued,
    /// The subscriber's queue is full, it stopped reading
    Lagging,
    /// The subscriber's connection is gone
    Gone,
}

/// Writes relayed frames to one subscriber from its own thread, so the relay
/// only ever pushes onto a bounded queue
pub(crate) struct SubscriberWriter {
    name: String,
    outbound: Sender<Vec<u8>>,
    handle: JoinHandle<()>,
}

impl SubscriberWriter {
    pub(crate) fn start(
        name: String,
        frame_sender: Box<dyn FrameSender>,
        capacity: usize,
        running: Arc<AtomicBool>,
        poll_interval: Duration,
    ) -> Result<Self, SyncServerError> {
        let (outbound, queue) = crossbeam_channel::bounded(capacity.max(1));
        let loop_name = name.clone();
        let handle = thread::Builder::new()
            .name(format!("scenesync-{}", name))
            .spawn(move || writer_loop(&loop_name, frame_sender, queue, &running, poll_interval))
            .map_err(|error| SyncServerError::Spawn {
                name: name.clone(),
                reason: error.to_string(),
            })?;

        Ok(Self {
            name,
            outbound,
            handle,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Queues a frame without blocking the relay
    pub(crate) fn push(&self, frame: &[u8]) -> Delivery {
        match self.outbound.try_send(frame.to_vec()) {
            Ok(()) => Delivery::Queued,
            Err(TrySendError::Full(_)) => Delivery::Lagging,
            Err(TrySendError::Disconnected(_)) => Delivery::Gone,
        }
    }

    /// Closes the queue; the thread exits once its current write returns
    pub(crate) fn close(self) -> (String, JoinHandle<()>) {
        let Self { name, handle, .. } = self;
        (name, handle)
    }
}

fn writer_loop(
    name: &str,
    mut frame_sender: Box<dyn FrameSender>,
    queue: Receiver<Vec<u8>>,
    running: &AtomicBool,
    poll_interval: Duration,
) {
    while running.load(Ordering::Relaxed) {
        match queue.recv_timeout(poll_interval) {
            Ok(frame) => {
                if let Err(error) = frame_sender.send(&frame) {
                    if running.load(Ordering::Relaxed) {
                        info!("Subscriber {} left: {}", name, error);
                    } else {
                        debug!("Subscriber {} closed during shutdown: {}", name, error);
                    }
                    return;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            // dropped by the relay
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!("Subscriber {} writer stopped", name);
}

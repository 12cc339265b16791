use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use log::{debug, warn};

use scenesync_shared::{join_with_grace, FrameSender, TransportError};

use crate::error::SenderError;

/// Tuning shared by every sender's publisher thread
#[derive(Clone, Debug)]
pub struct PublisherSettings {
    pub capacity: usize,
    pub poll_interval: Duration,
    pub shutdown_grace: Duration,
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self {
            capacity: 256,
            poll_interval: Duration::from_millis(50),
            shutdown_grace: Duration::from_secs(1),
        }
    }
}

/// Owns the publisher thread of one sender and the queue feeding it
pub struct Publisher {
    name: String,
    outbound: Sender<Vec<u8>>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    shutdown_grace: Duration,
}

impl Publisher {
    pub fn start(
        name: &str,
        frame_sender: Box<dyn FrameSender>,
        settings: &PublisherSettings,
    ) -> Result<Self, SenderError> {
        let (outbound, queue) = crossbeam_channel::bounded(settings.capacity.max(1));
        let running = Arc::new(AtomicBool::new(true));

        let loop_running = running.clone();
        let loop_name = name.to_string();
        let poll_interval = settings.poll_interval;
        let handle = thread::Builder::new()
            .name(format!("scenesync-{}", name))
            .spawn(move || publisher_loop(&loop_name, frame_sender, queue, loop_running, poll_interval))
            .map_err(|error| SenderError::Transport(TransportError::Io(error.to_string())))?;

        Ok(Self {
            name: name.to_string(),
            outbound,
            running,
            handle: Some(handle),
            shutdown_grace: settings.shutdown_grace,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
            && self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Queues a frame without blocking the caller
    pub fn enqueue(&self, frame: Vec<u8>) -> Result<(), SenderError> {
        if !self.is_running() {
            return Err(SenderError::NotRunning {
                name: self.name.clone(),
            });
        }
        self.outbound.try_send(frame).map_err(|error| match error {
            TrySendError::Full(_) => SenderError::QueueFull {
                name: self.name.clone(),
            },
            TrySendError::Disconnected(_) => SenderError::NotRunning {
                name: self.name.clone(),
            },
        })
    }

    /// Asks the thread to write what is queued and exit, then joins it
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            join_with_grace(&self.name, handle, self.shutdown_grace);
        }
    }
}

impl Drop for Publisher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn publisher_loop(
    name: &str,
    mut frame_sender: Box<dyn FrameSender>,
    queue: Receiver<Vec<u8>>,
    running: Arc<AtomicBool>,
    poll_interval: Duration,
) {
    debug!("Publisher {} started", name);
    while running.load(Ordering::Relaxed) {
        match queue.recv_timeout(poll_interval) {
            Ok(frame) => {
                if !write(name, frame_sender.as_mut(), &frame, &running) {
                    running.store(false, Ordering::Relaxed);
                    return;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // drain what was queued before the stop request
    let mut drained = 0;
    for frame in queue.try_iter() {
        if !write(name, frame_sender.as_mut(), &frame, &running) {
            break;
        }
        drained += 1;
    }
    running.store(false, Ordering::Relaxed);
    debug!("Publisher {} stopped, {} queued frames flushed", name, drained);
}

fn write(name: &str, frame_sender: &mut dyn FrameSender, frame: &[u8], running: &AtomicBool) -> bool {
    match frame_sender.send(frame) {
        Ok(()) => true,
        Err(error) if error.is_closed() && !running.load(Ordering::Relaxed) => {
            debug!("Publisher {} socket closed during shutdown", name);
            false
        }
        Err(error) => {
            warn!("Publisher {} failed to send: {}", name, error);
            !error.is_closed()
        }
    }
}

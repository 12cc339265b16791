use std::{
    io::{ErrorKind, Read},
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket},
    time::{Duration, Instant},
};

use log::debug;

use crate::transport::{
    endpoint::Endpoint,
    error::TransportError,
    frame::{io_error, write_frame, FrameDecoder},
    Connector, FrameReceiver, FrameSender, Requester,
};

const READ_CHUNK: usize = 64 * 1024;
// zero is rejected by set_read_timeout
const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// Connects to scene and relay servers over TCP with length-prefixed frames
#[derive(Debug, Clone)]
pub struct TcpConnector {
    connect_timeout: Duration,
}

impl TcpConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    fn connect(&self, endpoint: &Endpoint) -> Result<TcpStream, TransportError> {
        let addresses = resolve(endpoint)?;
        let mut last_error = String::from("no addresses resolved");
        for address in addresses {
            match TcpStream::connect_timeout(&address, self.connect_timeout) {
                Ok(stream) => {
                    stream.set_nodelay(true).map_err(io_error)?;
                    debug!("Connected to {} ({})", endpoint, address);
                    return Ok(stream);
                }
                Err(error) => last_error = error.to_string(),
            }
        }
        Err(TransportError::ConnectFailed {
            endpoint: endpoint.to_string(),
            reason: last_error,
        })
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl Connector for TcpConnector {
    fn connect_publisher(&self, endpoint: &Endpoint) -> Result<Box<dyn FrameSender>, TransportError> {
        Ok(Box::new(TcpFrameSender::new(self.connect(endpoint)?)))
    }

    fn connect_subscriber(&self, endpoint: &Endpoint) -> Result<Box<dyn FrameReceiver>, TransportError> {
        Ok(Box::new(TcpFrameReceiver::new(self.connect(endpoint)?)))
    }

    fn connect_requester(
        &self,
        endpoint: &Endpoint,
        timeout: Duration,
    ) -> Result<Box<dyn Requester>, TransportError> {
        Ok(Box::new(TcpRequester::new(self.connect(endpoint)?, timeout)))
    }

    fn local_ip(&self, endpoint: &Endpoint) -> Option<IpAddr> {
        // connecting a UDP socket picks the outgoing interface without sending anything
        let target = resolve(endpoint).ok()?.into_iter().next()?;
        let unspecified: SocketAddr = match target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(unspecified).ok()?;
        socket.connect(target).ok()?;
        Some(socket.local_addr().ok()?.ip())
    }
}

fn resolve(endpoint: &Endpoint) -> Result<Vec<SocketAddr>, TransportError> {
    (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()
        .map(Iterator::collect)
        .map_err(|error| TransportError::ConnectFailed {
            endpoint: endpoint.to_string(),
            reason: error.to_string(),
        })
}

// Sender

pub struct TcpFrameSender {
    stream: TcpStream,
}

impl TcpFrameSender {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl FrameSender for TcpFrameSender {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        write_frame(&mut self.stream, frame)
    }
}

// Receiver

pub struct TcpFrameReceiver {
    stream: TcpStream,
    decoder: FrameDecoder,
    chunk: Vec<u8>,
}

impl TcpFrameReceiver {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            decoder: FrameDecoder::new(),
            chunk: vec![0u8; READ_CHUNK],
        }
    }

    /// Reads until a frame completes or `timeout` passes
    fn read_frame(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        if let Some(frame) = self.decoder.next_frame()? {
            return Ok(Some(frame));
        }

        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            self.stream
                .set_read_timeout(Some(remaining.max(MIN_READ_TIMEOUT)))
                .map_err(io_error)?;

            match self.stream.read(&mut self.chunk) {
                Ok(0) => return Err(TransportError::SocketClosed),
                Ok(read) => {
                    self.decoder.push(&self.chunk[..read]);
                    if let Some(frame) = self.decoder.next_frame()? {
                        return Ok(Some(frame));
                    }
                }
                Err(error) if matches!(error.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Ok(None);
                }
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => return Err(io_error(error)),
            }
        }
    }
}

impl FrameReceiver for TcpFrameReceiver {
    fn receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        self.read_frame(timeout)
    }
}

// Requester

pub struct TcpRequester {
    receiver: TcpFrameReceiver,
    timeout: Duration,
}

impl TcpRequester {
    pub fn new(stream: TcpStream, timeout: Duration) -> Self {
        Self {
            receiver: TcpFrameReceiver::new(stream),
            timeout,
        }
    }
}

impl Requester for TcpRequester {
    fn request(&mut self, command: &[u8]) -> Result<Vec<u8>, TransportError> {
        write_frame(&mut self.receiver.stream, command)?;
        self.receiver
            .read_frame(self.timeout)?
            .ok_or(TransportError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })
    }
}

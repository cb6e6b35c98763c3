//! Byte-stream transports backed by real connections.

use std::fs::File;
use std::io::Read;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use sniffer_traits::Transport;
use tracing::{debug, info, warn};

use crate::error::{HwError, Result};

/// Range link over TCP (e.g. a serial-to-TCP bridge on the sensor board).
pub struct TcpTransport {
    stream: TcpStream,
    peer: String,
}

impl TcpTransport {
    pub fn connect(address: &str, timeout: Duration) -> Result<Self> {
        let addr = address
            .to_socket_addrs()
            .map_err(|e| HwError::Resolve(format!("{address}: {e}")))?
            .next()
            .ok_or_else(|| HwError::Resolve(format!("{address}: no addresses")))?;
        let stream = TcpStream::connect_timeout(&addr, timeout)?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!(error = %e, "set_nodelay failed");
        }
        info!(peer = %addr, "range transport connected");
        Ok(Self {
            stream,
            peer: addr.to_string(),
        })
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }
}

impl Transport for TcpTransport {
    fn read(&mut self, buf: &mut [u8]) -> std::result::Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        self.stream
            .read(buf)
            .map_err(|e| Box::new(HwError::Io(e)) as Box<dyn std::error::Error + Send + Sync>)
    }

    fn closer(&self) -> Option<Box<dyn Fn() + Send + Sync>> {
        match self.stream.try_clone() {
            Ok(handle) => {
                let peer = self.peer.clone();
                Some(Box::new(move || {
                    // Unblocks the reader with EOF/error.
                    if let Err(e) = handle.shutdown(Shutdown::Both) {
                        debug!(peer = %peer, error = %e, "socket shutdown failed");
                    }
                }))
            }
            Err(e) => {
                warn!(error = %e, "cannot clone socket; ingestion stop will wait for the next read");
                None
            }
        }
    }
}

/// Range link over a character device such as an RFCOMM serial port.
///
/// Reads on a device cannot be interrupted from another thread, so this
/// transport offers no closer.
pub struct DeviceTransport {
    file: File,
    path: PathBuf,
}

impl DeviceTransport {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        info!(device = %path.display(), "range device opened");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Transport for DeviceTransport {
    fn read(&mut self, buf: &mut [u8]) -> std::result::Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        self.file
            .read(buf)
            .map_err(|e| Box::new(HwError::Io(e)) as Box<dyn std::error::Error + Send + Sync>)
    }
}

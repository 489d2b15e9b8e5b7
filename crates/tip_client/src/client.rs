use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::protocol;
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use tracing::{debug, info, warn};

/// Anything that can produce the current temperature in kelvin.
///
/// Every call must go to the source; implementations do not cache.
pub trait TemperatureSource {
    fn read_kelvin(&mut self) -> Result<f64>;
}

impl<T: TemperatureSource + ?Sized> TemperatureSource for Box<T> {
    fn read_kelvin(&mut self) -> Result<f64> {
        (**self).read_kelvin()
    }
}

/// One blocking TCP session with a TIP service.
///
/// A failed exchange leaves the session unusable: a late reply may still be
/// in flight, so every later command fails with `Disconnected`.
pub struct TipClient {
    name: String,
    peer: SocketAddr,
    timeout_ms: u64,
    broken: bool,
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl TipClient {
    /// Connect with default port and timeout.
    pub fn connect(name: &str, address: &str) -> Result<Self> {
        Self::connect_with(name, &ClientConfig::new(address))
    }

    pub fn connect_with(name: &str, config: &ClientConfig) -> Result<Self> {
        let target = config.target();
        let addrs: Vec<SocketAddr> = target
            .to_socket_addrs()
            .map_err(|source| ClientError::Connect {
                address: target.clone(),
                source,
            })?
            .collect();
        if addrs.is_empty() {
            return Err(ClientError::Resolve(target));
        }

        let mut last_err = None;
        let mut stream = None;
        for addr in &addrs {
            let attempt = match config.timeout() {
                Some(t) => TcpStream::connect_timeout(addr, t),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    debug!(%addr, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }
        let stream = match stream {
            Some(s) => s,
            None => {
                return Err(ClientError::Connect {
                    address: target,
                    source: last_err
                        .unwrap_or_else(|| io::Error::new(ErrorKind::NotFound, "no address")),
                })
            }
        };

        stream.set_read_timeout(config.timeout())?;
        stream.set_write_timeout(config.timeout())?;
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr()?;
        let writer = stream.try_clone()?;

        info!(name, %peer, "tip session open");
        Ok(Self {
            name: name.to_string(),
            peer,
            timeout_ms: config.timeout_ms,
            broken: false,
            reader: BufReader::new(stream),
            writer,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// True once an exchange failed; the session no longer talks to the service.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Send one command line and return the raw response line.
    pub fn command(&mut self, command: &str) -> Result<String> {
        if self.broken {
            return Err(ClientError::Disconnected);
        }
        match self.exchange(command) {
            Ok(line) => {
                debug!(name = %self.name, command, response = line.trim_end(), "tip exchange");
                Ok(line)
            }
            Err(e) => {
                self.broken = true;
                warn!(name = %self.name, peer = %self.peer, error = %e, "tip session broken");
                Err(e)
            }
        }
    }

    fn exchange(&mut self, command: &str) -> Result<String> {
        let timeout_ms = self.timeout_ms;
        self.writer
            .write_all(protocol::request_line(command).as_bytes())
            .and_then(|_| self.writer.flush())
            .map_err(|e| classify(e, timeout_ms))?;

        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(|e| classify(e, timeout_ms))?;
        if n == 0 {
            return Err(ClientError::Disconnected);
        }
        Ok(line)
    }
}

impl TemperatureSource for TipClient {
    fn read_kelvin(&mut self) -> Result<f64> {
        let line = self.command(protocol::GET_TEMPERATURE)?;
        protocol::parse_reading(&line)
    }
}

fn classify(e: io::Error, timeout_ms: u64) -> ClientError {
    match e.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => ClientError::Timeout { timeout_ms },
        ErrorKind::UnexpectedEof
        | ErrorKind::BrokenPipe
        | ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted => ClientError::Disconnected,
        ErrorKind::InvalidData => ClientError::Malformed(e.to_string()),
        _ => ClientError::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_maps_timeouts() {
        let e = io::Error::new(ErrorKind::WouldBlock, "x");
        assert!(matches!(
            classify(e, 250),
            ClientError::Timeout { timeout_ms: 250 }
        ));
    }

    #[test]
    fn classify_maps_resets_to_disconnected() {
        for kind in [ErrorKind::ConnectionReset, ErrorKind::BrokenPipe] {
            assert!(matches!(
                classify(io::Error::new(kind, "x"), 0),
                ClientError::Disconnected
            ));
        }
    }

    #[test]
    fn classify_keeps_other_io_errors() {
        let e = io::Error::new(ErrorKind::PermissionDenied, "nope");
        assert!(matches!(classify(e, 0), ClientError::Io(_)));
    }

    #[test]
    fn boxed_source_delegates() {
        struct Fixed(f64);
        impl TemperatureSource for Fixed {
            fn read_kelvin(&mut self) -> Result<f64> {
                Ok(self.0)
            }
        }
        let mut src: Box<dyn TemperatureSource> = Box::new(Fixed(1.5));
        assert_eq!(src.read_kelvin().unwrap(), 1.5);
    }
}

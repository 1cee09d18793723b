//! OS port probing
//!
//! A probe binds a TCP listener, reads back the port the OS gave it and drops
//! the listener straight away. Nothing stops another process from taking the
//! same number before the caller binds it for real.

use crate::error::PortError;
use log::trace;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener};

/// Probe asks something (normally the OS) for a free TCP port
pub trait Probe: Send + Sync {
    /// Obtain a free port. `None` or `Some(0)` lets the OS pick one,
    /// any other value asks for exactly that port.
    fn probe(&self, preferred: Option<u16>) -> Result<u16, PortError>;
}

/// OsProbe binds a real listening socket on `host`
#[derive(Debug, Clone)]
pub struct OsProbe {
    host: IpAddr,
}

impl OsProbe {
    /// Create a probe binding on the given address
    pub fn new(host: IpAddr) -> Self {
        OsProbe { host }
    }

    /// Address the probe binds on
    pub fn host(&self) -> IpAddr {
        self.host
    }
}

impl Default for OsProbe {
    fn default() -> Self {
        Self::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }
}

impl Probe for OsProbe {
    fn probe(&self, preferred: Option<u16>) -> Result<u16, PortError> {
        let requested = preferred.unwrap_or(0);
        let addr = SocketAddr::new(self.host, requested);

        let unavailable = |source| PortError::PortUnavailable {
            port: requested,
            source,
        };

        // Listener is dropped at the end of this scope, closing the socket
        let listener = TcpListener::bind(addr).map_err(unavailable)?;
        let port = listener.local_addr().map_err(unavailable)?.port();

        trace!("Probed port {} (requested {})", port, requested);
        Ok(port)
    }
}

impl<P: Probe + ?Sized> Probe for &P {
    fn probe(&self, preferred: Option<u16>) -> Result<u16, PortError> {
        (**self).probe(preferred)
    }
}

impl<P: Probe + ?Sized> Probe for Box<P> {
    fn probe(&self, preferred: Option<u16>) -> Result<u16, PortError> {
        (**self).probe(preferred)
    }
}

//! Session adapter.
//!
//! Receives envelopes published on a session and hands them to the recorder
//! in arrival order over a bounded channel. A session is a UDP multicast
//! group `225.0.0.<cid>` on port [`SESSION_PORT`]; every datagram carries
//! one or more envelope records (see [`envrec_core::codec`]).

use log::{debug, error, info, warn};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio_graceful_shutdown::SubsystemHandle;

use envrec_core::{decode_records, Envelope};

use crate::RecorderError;

/// UDP port shared by all sessions
pub const SESSION_PORT: u16 = 12175;

/// Largest datagram accepted
const MAX_DATAGRAM: usize = 65535;

/// Multicast group of a session
pub fn multicast_group(cid: u16) -> Result<Ipv4Addr, RecorderError> {
    match cid {
        1..=254 => Ok(Ipv4Addr::new(225, 0, 0, cid as u8)),
        _ => Err(RecorderError::InvalidCid(cid)),
    }
}

/// Running state of a session, polled by the flush scheduler.
#[derive(Debug, Clone)]
pub struct Liveness {
    running: Arc<AtomicBool>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Mark the session as no longer running
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end of a session.
pub struct UdpSession {
    cid: u16,
    socket: UdpSocket,
    liveness: Liveness,
    tx: mpsc::Sender<Envelope>,
}

impl UdpSession {
    /// Join the multicast group of `cid`. Must be called within a tokio runtime.
    pub fn bind(
        cid: u16,
        liveness: Liveness,
        tx: mpsc::Sender<Envelope>,
    ) -> Result<Self, RecorderError> {
        let group = multicast_group(cid)?;
        let socket = new_multicast_socket(group)?;
        let socket = UdpSocket::from_std(socket.into())?;
        info!("Joined session {} at {}:{}", cid, group, SESSION_PORT);

        Ok(Self {
            cid,
            socket,
            liveness,
            tx,
        })
    }

    /// Receive until shutdown is requested, the recorder goes away or the
    /// socket fails. The session is marked as stopped on exit.
    pub async fn run(self, subsys: SubsystemHandle) -> Result<(), RecorderError> {
        let result = self.receive_loop(&subsys).await;
        self.liveness.stop();
        if let Err(e) = &result {
            error!("Session {}: {}", self.cid, e);
            subsys.request_shutdown();
        }
        result
    }

    async fn receive_loop(&self, subsys: &SubsystemHandle) -> Result<(), RecorderError> {
        let mut buf = vec![0u8; MAX_DATAGRAM];

        loop {
            tokio::select! {
                _ = subsys.on_shutdown_requested() => {
                    debug!("Session {}: shutdown requested", self.cid);
                    return Ok(());
                }
                r = self.socket.recv_from(&mut buf) => {
                    let (len, from) = r?;
                    if !self.deliver(&buf[..len], from).await {
                        info!("Session {}: recorder is gone", self.cid);
                        subsys.request_shutdown();
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Forward every envelope of a datagram. Returns false once the
    /// receiving side has closed.
    async fn deliver(&self, datagram: &[u8], from: SocketAddr) -> bool {
        let envelopes = match decode_records(datagram) {
            Ok(envelopes) => envelopes,
            Err(e) => {
                debug!("Ignoring datagram of {} bytes from {}: {}", datagram.len(), from, e);
                return true;
            }
        };

        for mut envelope in envelopes {
            envelope.stamp_received();
            if self.tx.capacity() == 0 {
                warn!("Session {}: recorder is falling behind", self.cid);
            }
            if self.tx.send(envelope).await.is_err() {
                return false;
            }
        }
        true
    }
}

fn new_multicast_socket(group: Ipv4Addr) -> io::Result<Socket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_nonblocking(true)?;
    socket.set_reuse_address(true)?;
    bind_to_multicast(&socket, group)?;
    Ok(socket)
}

/// On unixes we bind to the multicast address, which filters out other groups
#[cfg(unix)]
fn bind_to_multicast(socket: &Socket, group: Ipv4Addr) -> io::Result<()> {
    let socketaddr = SocketAddr::new(IpAddr::V4(group), SESSION_PORT);
    socket.bind(&SockAddr::from(socketaddr))?;
    socket.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)?;
    Ok(())
}

/// On Windows it is improper to bind to the multicast address
#[cfg(windows)]
fn bind_to_multicast(socket: &Socket, group: Ipv4Addr) -> io::Result<()> {
    socket.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)?;
    let socketaddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), SESSION_PORT);
    socket.bind(&SockAddr::from(socketaddr))?;
    Ok(())
}

//! Data channel manager.
//!
//! A session owns one [`DataChannel`]. PASV binds a listener and spawns a
//! task that accepts a single connection and hands it over through a
//! oneshot channel; PORT only records the client endpoint and the outbound
//! connect is deferred until a transfer asks for the connection.
//!
//! [`DataChannel::await_ready`] moves the connection out to the transfer,
//! leaving the channel inactive. The transfer ends the data connection by
//! dropping it, so at most one data connection exists per session.

use log::{debug, error, info, trace};
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

#[derive(Error, Debug)]
pub enum DataChanError {
    #[error("no PASV or PORT command issued")]
    NotConfigured,

    #[error("timed out waiting for the data connection")]
    Timeout,

    #[error("passive listener closed before a connection arrived")]
    AcceptFailed,

    #[error("failed to connect to {0}: {1}")]
    Connect(SocketAddrV4, #[source] io::Error),
}

impl DataChanError {
    pub fn to_ftp_response(&self) -> &'static str {
        match self {
            DataChanError::NotConfigured => "425 Use PORT or PASV first.\r\n",
            _ => "425 Can't open data connection.\r\n",
        }
    }
}

#[derive(Debug)]
enum State {
    Inactive,
    PassiveListening {
        addr: SocketAddrV4,
        accept: JoinHandle<()>,
        ready: oneshot::Receiver<TcpStream>,
    },
    PassiveConnected(TcpStream),
    ActivePending(SocketAddrV4),
}

#[derive(Debug)]
pub struct DataChannel {
    state: State,
    peer: String,
}

impl DataChannel {
    pub fn new(peer: impl Into<String>) -> Self {
        Self {
            state: State::Inactive,
            peer: peer.into(),
        }
    }

    /// Name of the current state, after picking up any accepted connection.
    pub fn state_name(&mut self) -> &'static str {
        self.poll_accepted();
        match self.state {
            State::Inactive => "INACTIVE",
            State::PassiveListening { .. } => "PASSIVE_LISTENING",
            State::PassiveConnected(_) => "PASSIVE_CONNECTED",
            State::ActivePending(_) => "ACTIVE_PENDING",
        }
    }

    /// Closes any passive listener and data connection.
    pub fn teardown(&mut self) {
        match std::mem::replace(&mut self.state, State::Inactive) {
            State::Inactive => {}
            State::PassiveListening { addr, accept, .. } => {
                accept.abort();
                debug!("{}: passive listener on {} closed", self.peer, addr);
            }
            State::PassiveConnected(_) => {
                debug!("{}: unused passive data connection closed", self.peer);
            }
            State::ActivePending(addr) => {
                trace!("{}: forgetting active target {}", self.peer, addr);
            }
        }
    }

    /// Tears down the previous channel, then binds an ephemeral listener on
    /// `ip` and starts accepting one connection in the background.
    pub async fn enter_passive(&mut self, ip: Ipv4Addr) -> io::Result<SocketAddrV4> {
        self.teardown();

        let listener = TcpListener::bind((ip, 0)).await?;
        let addr = match listener.local_addr()? {
            std::net::SocketAddr::V4(addr) => addr,
            std::net::SocketAddr::V6(addr) => SocketAddrV4::new(ip, addr.port()),
        };

        let (tx, ready) = oneshot::channel();
        let peer = self.peer.clone();
        let accept = tokio::spawn(async move {
            match listener.accept().await {
                Ok((stream, from)) => {
                    info!("{}: incoming passive data connection from {}", peer, from);
                    if tx.send(stream).is_err() {
                        trace!("{}: passive connection arrived after teardown", peer);
                    }
                }
                Err(e) => error!("{}: failed to accept data connection: {}", peer, e),
            }
        });

        debug!("{}: passive data connection listening on {}", self.peer, addr);
        self.state = State::PassiveListening {
            addr,
            accept,
            ready,
        };
        Ok(addr)
    }

    /// Tears down the previous channel and records the client endpoint.
    pub fn enter_active(&mut self, addr: SocketAddrV4) {
        self.teardown();
        self.state = State::ActivePending(addr);
    }

    /// Waits until a data connection is usable and hands it over.
    ///
    /// Passive: returns the accepted connection, waiting for the client for
    /// at most `wait`. Active: connects out to the recorded endpoint now.
    /// The channel is inactive afterwards whatever the outcome.
    pub async fn await_ready(&mut self, wait: Duration) -> Result<TcpStream, DataChanError> {
        match std::mem::replace(&mut self.state, State::Inactive) {
            State::Inactive => Err(DataChanError::NotConfigured),
            State::PassiveConnected(stream) => {
                trace!("{}: a data connection exists", self.peer);
                Ok(stream)
            }
            State::PassiveListening {
                addr,
                accept,
                ready,
            } => {
                trace!("{}: passive, waiting for the client on {}", self.peer, addr);
                match timeout(wait, ready).await {
                    Ok(Ok(stream)) => Ok(stream),
                    Ok(Err(_)) => Err(DataChanError::AcceptFailed),
                    Err(_) => {
                        accept.abort();
                        Err(DataChanError::Timeout)
                    }
                }
            }
            State::ActivePending(addr) => {
                info!("{}: opening data connection to {}", self.peer, addr);
                match timeout(wait, TcpStream::connect(addr)).await {
                    Ok(Ok(stream)) => Ok(stream),
                    Ok(Err(e)) => Err(DataChanError::Connect(addr, e)),
                    Err(_) => Err(DataChanError::Timeout),
                }
            }
        }
    }

    fn poll_accepted(&mut self) {
        if let State::PassiveListening { ready, .. } = &mut self.state {
            match ready.try_recv() {
                Ok(stream) => self.state = State::PassiveConnected(stream),
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.state = State::Inactive;
                }
            }
        }
    }
}

impl Drop for DataChannel {
    fn drop(&mut self) {
        self.teardown();
    }
}

/*!
 * External Collaborators
 *
 * Interfaces consumed by this layer's callers but implemented elsewhere:
 * the descriptor event loop, the socket factory and the whole-file loader.
 * Only the shapes live here; descriptors cross the boundary as raw values
 * because the event loop owns registrations beyond any borrow.
 */

use crate::syscalls::SocketDesc;
use std::io;
use std::path::Path;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

/// Raw descriptor value handed to the event loop
#[cfg(unix)]
pub type RawDesc = std::os::fd::RawFd;
#[cfg(windows)]
pub type RawDesc = std::os::windows::io::RawSocket;

bitflags::bitflags! {
    /// Readiness interest and result mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventFlags: u32 {
        const READ = 0x0001;
        const WRITE = 0x0002;
        const ERROR = 0x0004;
        /// Leave the descriptor open when the registration is destroyed
        const DONT_CLOSE = 0x0080;
    }
}

/// Invoked with the ready descriptor and the events that fired
pub type EventCallback = Box<dyn FnMut(RawDesc, EventFlags) + Send>;

/// Opaque registration handle issued by an [`EventNotifier`]
pub type EventId = u64;

/// Descriptor readiness loop
#[cfg_attr(test, automock)]
pub trait EventNotifier {
    /// Register `fd` with no interest set
    fn create(&mut self, fd: RawDesc, callback: EventCallback) -> EventId;

    /// Unregister and close the descriptor unless `DONT_CLOSE` is set
    fn destroy(&mut self, id: EventId);

    /// Point an existing registration at a new descriptor and callback
    fn install(&mut self, id: EventId, fd: RawDesc, callback: EventCallback);

    /// Unregister without closing
    fn remove(&mut self, id: EventId);

    /// Replace the interest mask
    fn set(&mut self, id: EventId, events: EventFlags);

    fn add(&mut self, id: EventId, events: EventFlags);

    fn del(&mut self, id: EventId, events: EventFlags);

    /// Dispatch callbacks until no registrations remain
    fn run_loop(&mut self);
}

/// Socket flavour requested from a [`SocketFactory`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketKind {
    Stream,
    Datagram,
}

/// Creates client and server sockets
#[cfg_attr(test, automock)]
pub trait SocketFactory {
    fn loopback_client(&self, port: u16, kind: SocketKind) -> io::Result<SocketDesc>;

    fn network_client(&self, host: &str, port: u16, kind: SocketKind) -> io::Result<SocketDesc>;

    fn network_client_timeout(
        &self,
        host: &str,
        port: u16,
        kind: SocketKind,
        timeout: Duration,
    ) -> io::Result<SocketDesc>;

    fn loopback_server(&self, port: u16, kind: SocketKind) -> io::Result<SocketDesc>;

    /// Server bound to the wildcard address
    fn inaddr_any_server(&self, port: u16, kind: SocketKind) -> io::Result<SocketDesc>;
}

/// Whole-file reads
#[cfg_attr(test, automock)]
pub trait FileLoader {
    fn load_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        self.load_file(path).map(|data| data.len() as u64)
    }
}

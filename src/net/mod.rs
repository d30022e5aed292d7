/*!
 * Socket Tuning
 *
 * Receive-buffer sizing and Nagle control on top of the raw `setsockopt`
 * relay, plus a config-driven bundle applying both to a fresh socket.
 */

use crate::config::SysConfig;
use crate::syscalls::{self, SocketRef, IPPROTO_TCP, SOL_SOCKET, SO_RCVBUF, TCP_NODELAY};
use serde::{Deserialize, Serialize};
use std::io;
use tracing::trace;

/// Request a receive buffer of `size` bytes.
///
/// The native result is returned unchanged. The kernel may round or
/// double the value; no read-back is done.
pub fn set_recv_buffer_size(sock: SocketRef<'_>, size: i32) -> io::Result<()> {
    syscalls::setsockopt(sock, SOL_SOCKET, SO_RCVBUF, &size.to_ne_bytes())
}

/// Disable Nagle's algorithm. Failure is ignored: non-TCP sockets reject
/// the option and callers do not care.
pub fn disable_nagle(sock: SocketRef<'_>) {
    let on: i32 = 1;
    if let Err(e) = syscalls::setsockopt(sock, IPPROTO_TCP, TCP_NODELAY, &on.to_ne_bytes()) {
        trace!(error = %e, "TCP_NODELAY not applied");
    }
}

/// Tuning applied to sockets as they are created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocketTuning {
    pub recv_buffer_size: Option<i32>,
    pub nodelay: bool,
}

impl Default for SocketTuning {
    fn default() -> Self {
        Self {
            recv_buffer_size: None,
            nodelay: true,
        }
    }
}

impl SocketTuning {
    pub fn from_config(config: &SysConfig) -> Self {
        Self {
            recv_buffer_size: config.recv_buffer_size,
            nodelay: config.tcp_nodelay,
        }
    }

    /// Apply the buffer size, then the Nagle setting.
    ///
    /// Only a failed buffer resize is reported.
    pub fn apply(&self, sock: SocketRef<'_>) -> io::Result<()> {
        if let Some(size) = self.recv_buffer_size {
            set_recv_buffer_size(sock, size)?;
        }
        if self.nodelay {
            disable_nagle(sock);
        }
        Ok(())
    }
}

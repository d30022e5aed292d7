/*!
 * Process Initialization
 *
 * One pass before any other primitive is used. Windows needs the socket
 * library started; POSIX has nothing to do beyond logging.
 */

use crate::config::SysConfig;
use std::io;
use tracing::info;

/// Name of the platform family this build targets
pub const fn platform_name() -> &'static str {
    if cfg!(windows) {
        "windows"
    } else {
        "posix"
    }
}

/// Prepare the process for socket and thread use.
///
/// Safe to call more than once.
pub fn init(config: &SysConfig) -> io::Result<()> {
    platform_init()?;
    info!(
        platform = platform_name(),
        thread_stack_size = ?config.thread_stack_size,
        recv_buffer_size = ?config.recv_buffer_size,
        tcp_nodelay = config.tcp_nodelay,
        "host primitives initialized"
    );
    Ok(())
}

#[cfg(unix)]
fn platform_init() -> io::Result<()> {
    Ok(())
}

#[cfg(windows)]
fn platform_init() -> io::Result<()> {
    use windows::Win32::Networking::WinSock::{WSAStartup, WSADATA};

    let mut data = WSADATA::default();
    // SAFETY: `data` is a valid out-pointer. Startup is reference counted,
    // so repeated calls are balanced by process exit.
    let rc = unsafe { WSAStartup(0x0202, &mut data) };
    if rc != 0 {
        return Err(io::Error::from_raw_os_error(rc));
    }
    Ok(())
}

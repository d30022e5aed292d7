/*!
 * Syscalls Module
 * Retry-safe file and socket syscall wrappers
 *
 * One set of names for both platform families. The build selects the
 * backend; the raw platform calls never leave the backend modules.
 *
 * - POSIX: calls failing with EINTR are re-issued (open, creat, read,
 *   write, accept), and created descriptors get FD_CLOEXEC explicitly.
 * - Windows: handles are non-inheritable on creation; unlink clears a
 *   read-only attribute and retries once.
 *
 * Errors are the native codes carried in `std::io::Error`.
 */

mod traits;
mod types;

#[cfg(unix)]
mod posix;
#[cfg(unix)]
mod retry;
#[cfg(windows)]
mod windows;

pub use traits::{FileSyscalls, InheritanceControl, SocketSyscalls};
pub use types::{OpenFlags, DEFAULT_CREATE_MODE};

#[cfg(unix)]
pub use posix::PosixSyscalls as PlatformSyscalls;
#[cfg(unix)]
pub use posix::{IPPROTO_TCP, SOL_SOCKET, SO_RCVBUF, TCP_NODELAY};

#[cfg(windows)]
pub use windows::WindowsSyscalls as PlatformSyscalls;
#[cfg(windows)]
pub use windows::{IPPROTO_TCP, SOL_SOCKET, SO_RCVBUF, TCP_NODELAY};

use std::io;
use std::io::SeekFrom;
use std::path::Path;

/// Owned file descriptor for the host platform
pub type FileDesc = <PlatformSyscalls as FileSyscalls>::File;
/// Borrowed file descriptor for the host platform
pub type FileRef<'a> = <PlatformSyscalls as FileSyscalls>::FileRef<'a>;
/// Owned socket for the host platform
pub type SocketDesc = <PlatformSyscalls as SocketSyscalls>::Socket;
/// Borrowed socket for the host platform
pub type SocketRef<'a> = <PlatformSyscalls as SocketSyscalls>::SocketRef<'a>;

/// Borrow an owned file descriptor
#[inline]
pub fn file_ref(fd: &FileDesc) -> FileRef<'_> {
    #[cfg(unix)]
    {
        std::os::fd::AsFd::as_fd(fd)
    }
    #[cfg(windows)]
    {
        std::os::windows::io::AsHandle::as_handle(fd)
    }
}

/// Borrow an owned socket
#[inline]
pub fn socket_ref(sock: &SocketDesc) -> SocketRef<'_> {
    #[cfg(unix)]
    {
        std::os::fd::AsFd::as_fd(sock)
    }
    #[cfg(windows)]
    {
        std::os::windows::io::AsSocket::as_socket(sock)
    }
}

/// Open a file. A create-capable open uses [`DEFAULT_CREATE_MODE`].
#[inline]
pub fn open<P: AsRef<Path>>(path: P, flags: OpenFlags) -> io::Result<FileDesc> {
    PlatformSyscalls::open(path.as_ref(), flags, None)
}

/// Open a file with an explicit creation mode.
///
/// The mode is ignored unless `flags` can create the file.
#[inline]
pub fn open_mode<P: AsRef<Path>>(path: P, flags: OpenFlags, mode: u32) -> io::Result<FileDesc> {
    PlatformSyscalls::open(path.as_ref(), flags, Some(mode))
}

#[inline]
pub fn creat<P: AsRef<Path>>(path: P, mode: u32) -> io::Result<FileDesc> {
    PlatformSyscalls::creat(path.as_ref(), mode)
}

#[inline]
pub fn read(fd: FileRef<'_>, buf: &mut [u8]) -> io::Result<usize> {
    PlatformSyscalls::read(fd, buf)
}

#[inline]
pub fn write(fd: FileRef<'_>, buf: &[u8]) -> io::Result<usize> {
    PlatformSyscalls::write(fd, buf)
}

#[inline]
pub fn lseek(fd: FileRef<'_>, pos: SeekFrom) -> io::Result<u64> {
    PlatformSyscalls::lseek(fd, pos)
}

#[inline]
pub fn close(fd: FileDesc) -> io::Result<()> {
    PlatformSyscalls::close(fd)
}

/// Remove a file.
///
/// On Windows a read-only file is made writable and the removal retried
/// once. POSIX never retries.
#[inline]
pub fn unlink<P: AsRef<Path>>(path: P) -> io::Result<()> {
    PlatformSyscalls::unlink(path.as_ref())
}

/// Create a directory. `mode` has no effect on Windows.
#[inline]
pub fn mkdir<P: AsRef<Path>>(path: P, mode: u32) -> io::Result<()> {
    PlatformSyscalls::mkdir(path.as_ref(), mode)
}

/// Mark a descriptor non-inheritable by child processes.
///
/// Creating wrappers already do this; it is exposed for descriptors that
/// came from elsewhere. A no-op on Windows.
#[inline]
pub fn close_on_exec(fd: FileRef<'_>) {
    PlatformSyscalls::close_on_exec(fd)
}

#[inline]
pub fn accept(listener: SocketRef<'_>) -> io::Result<SocketDesc> {
    PlatformSyscalls::accept(listener)
}

/// Shut down both directions of a socket
#[inline]
pub fn shutdown(sock: SocketRef<'_>) -> io::Result<()> {
    PlatformSyscalls::shutdown(sock)
}

#[inline]
pub fn setsockopt(sock: SocketRef<'_>, level: i32, name: i32, value: &[u8]) -> io::Result<()> {
    PlatformSyscalls::setsockopt(sock, level, name, value)
}

#[inline]
pub fn socketpair() -> io::Result<(SocketDesc, SocketDesc)> {
    PlatformSyscalls::socketpair()
}

#[inline]
pub fn close_socket(sock: SocketDesc) -> io::Result<()> {
    PlatformSyscalls::close_socket(sock)
}

/*!
 * Syscall Traits
 * The single interface both platform backends implement
 */

use super::types::OpenFlags;
use std::io;
use std::io::SeekFrom;
use std::path::Path;

/// File descriptor syscalls
///
/// Every creating operation returns a descriptor that has already been
/// through [`InheritanceControl::close_on_exec`].
pub trait FileSyscalls {
    /// Owned file descriptor
    type File;

    /// Borrowed file descriptor
    type FileRef<'a>: Copy;

    /// Open an existing file, or create one when `flags` request it.
    ///
    /// `mode` is only read when `flags.will_create()` is true.
    fn open(path: &Path, flags: OpenFlags, mode: Option<u32>) -> io::Result<Self::File>;

    /// Create or truncate a file for writing
    fn creat(path: &Path, mode: u32) -> io::Result<Self::File>;

    fn read(fd: Self::FileRef<'_>, buf: &mut [u8]) -> io::Result<usize>;

    fn write(fd: Self::FileRef<'_>, buf: &[u8]) -> io::Result<usize>;

    /// Reposition the file offset, returning the new offset from the start
    fn lseek(fd: Self::FileRef<'_>, pos: SeekFrom) -> io::Result<u64>;

    /// Close the descriptor, surfacing the native close result
    fn close(fd: Self::File) -> io::Result<()>;

    fn unlink(path: &Path) -> io::Result<()>;

    fn mkdir(path: &Path, mode: u32) -> io::Result<()>;
}

/// Socket syscalls
pub trait SocketSyscalls {
    /// Owned socket
    type Socket;

    /// Borrowed socket
    type SocketRef<'a>: Copy;

    /// Accept a connection on a listening socket
    fn accept(listener: Self::SocketRef<'_>) -> io::Result<Self::Socket>;

    /// Shut down both directions of a connected socket
    fn shutdown(sock: Self::SocketRef<'_>) -> io::Result<()>;

    fn setsockopt(sock: Self::SocketRef<'_>, level: i32, name: i32, value: &[u8]) -> io::Result<()>;

    /// Create a connected pair of stream sockets
    fn socketpair() -> io::Result<(Self::Socket, Self::Socket)>;

    fn close_socket(sock: Self::Socket) -> io::Result<()>;
}

/// Child-process inheritance control
pub trait InheritanceControl: FileSyscalls {
    /// Mark a descriptor non-inheritable. Best effort, never fails.
    fn close_on_exec(fd: Self::FileRef<'_>);
}

/*!
 * Windows Syscall Backend
 * Handle and socket wrappers; handles are created non-inheritable, so no
 * post-creation step is needed
 */

use super::traits::*;
use super::types::OpenFlags;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::mem::ManuallyDrop;
use std::net::{Ipv4Addr, Shutdown, TcpListener, TcpStream};
use std::os::windows::io::{
    AsRawHandle, AsRawSocket, BorrowedHandle, BorrowedSocket, FromRawHandle, FromRawSocket,
    IntoRawHandle, IntoRawSocket, OwnedHandle, OwnedSocket,
};
use std::path::Path;
use tracing::debug;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::Networking::WinSock::{closesocket, setsockopt, SOCKET, SOCKET_ERROR};

pub const SOL_SOCKET: i32 = 0xffff;
pub const SO_RCVBUF: i32 = 0x1002;
pub const IPPROTO_TCP: i32 = 6;
pub const TCP_NODELAY: i32 = 0x0001;

/// Win32 error returned by DeleteFileW for read-only files
const ERROR_ACCESS_DENIED: i32 = 5;

/// Windows implementation of the syscall traits
pub struct WindowsSyscalls;

/// View a borrowed handle as a `File` without taking ownership
fn borrowed_file(fd: BorrowedHandle<'_>) -> ManuallyDrop<File> {
    // SAFETY: the handle stays open for the borrow and ManuallyDrop
    // prevents the temporary File from closing it.
    ManuallyDrop::new(unsafe { File::from_raw_handle(fd.as_raw_handle()) })
}

fn borrowed_stream(sock: BorrowedSocket<'_>) -> ManuallyDrop<TcpStream> {
    // SAFETY: see `borrowed_file`.
    ManuallyDrop::new(unsafe { TcpStream::from_raw_socket(sock.as_raw_socket()) })
}

fn borrowed_listener(sock: BorrowedSocket<'_>) -> ManuallyDrop<TcpListener> {
    // SAFETY: see `borrowed_file`.
    ManuallyDrop::new(unsafe { TcpListener::from_raw_socket(sock.as_raw_socket()) })
}

fn native_options(flags: OpenFlags) -> OpenOptions {
    let mut options = OpenOptions::new();
    options
        .read(flags.read || !flags.is_writable())
        .write(flags.write)
        .append(flags.append)
        .truncate(flags.truncate)
        .create(flags.create)
        .create_new(flags.create_new);
    options
}

/// A mode without the owner-write bit produces a read-only file
fn apply_create_mode(path: &Path, mode: u32) -> io::Result<()> {
    if mode & 0o200 == 0 {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_readonly(true);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

impl FileSyscalls for WindowsSyscalls {
    type File = OwnedHandle;
    type FileRef<'a> = BorrowedHandle<'a>;

    fn open(path: &Path, flags: OpenFlags, mode: Option<u32>) -> io::Result<OwnedHandle> {
        let existed = path.exists();
        let file = native_options(flags).open(path)?;

        if flags.will_create() && !existed {
            if let Some(mode) = mode {
                apply_create_mode(path, mode)?;
            }
        }

        Ok(file.into())
    }

    fn creat(path: &Path, mode: u32) -> io::Result<OwnedHandle> {
        // Truncating an existing file keeps its attributes.
        let existed = path.exists();
        let file = native_options(OpenFlags::create_truncate()).open(path)?;
        if !existed {
            apply_create_mode(path, mode)?;
        }
        Ok(file.into())
    }

    fn read(fd: BorrowedHandle<'_>, buf: &mut [u8]) -> io::Result<usize> {
        (&*borrowed_file(fd)).read(buf)
    }

    fn write(fd: BorrowedHandle<'_>, buf: &[u8]) -> io::Result<usize> {
        (&*borrowed_file(fd)).write(buf)
    }

    fn lseek(fd: BorrowedHandle<'_>, pos: SeekFrom) -> io::Result<u64> {
        (&*borrowed_file(fd)).seek(pos)
    }

    fn close(fd: OwnedHandle) -> io::Result<()> {
        let raw = fd.into_raw_handle();
        // SAFETY: ownership was released by `into_raw_handle`.
        unsafe { CloseHandle(HANDLE(raw as _)) }.map_err(|_| io::Error::last_os_error())
    }

    fn unlink(path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.raw_os_error() == Some(ERROR_ACCESS_DENIED) => {
                // Read-only attribute: clear it and try exactly once more.
                debug!(path = %path.display(), "clearing read-only attribute before unlink");
                let mut perms = fs::metadata(path)?.permissions();
                #[allow(clippy::permissions_set_readonly_false)]
                perms.set_readonly(false);
                fs::set_permissions(path, perms)?;
                fs::remove_file(path)
            }
            result => result,
        }
    }

    fn mkdir(path: &Path, _mode: u32) -> io::Result<()> {
        fs::create_dir(path)
    }
}

impl InheritanceControl for WindowsSyscalls {
    #[inline]
    fn close_on_exec(_fd: BorrowedHandle<'_>) {}
}

impl SocketSyscalls for WindowsSyscalls {
    type Socket = OwnedSocket;
    type SocketRef<'a> = BorrowedSocket<'a>;

    fn accept(listener: BorrowedSocket<'_>) -> io::Result<OwnedSocket> {
        let (stream, _peer) = borrowed_listener(listener).accept()?;
        Ok(stream.into())
    }

    fn shutdown(sock: BorrowedSocket<'_>) -> io::Result<()> {
        borrowed_stream(sock).shutdown(Shutdown::Both)
    }

    fn setsockopt(sock: BorrowedSocket<'_>, level: i32, name: i32, value: &[u8]) -> io::Result<()> {
        let socket = SOCKET(sock.as_raw_socket() as usize);
        // SAFETY: `value` is valid for its length; the socket is borrowed open.
        let rc = unsafe { setsockopt(socket, level, name, Some(value)) };
        if rc == SOCKET_ERROR {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn socketpair() -> io::Result<(OwnedSocket, OwnedSocket)> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
        let client = TcpStream::connect(listener.local_addr()?)?;
        let (server, _peer) = listener.accept()?;
        Ok((client.into(), server.into()))
    }

    fn close_socket(sock: OwnedSocket) -> io::Result<()> {
        let raw = sock.into_raw_socket();
        // SAFETY: ownership was released by `into_raw_socket`.
        if unsafe { closesocket(SOCKET(raw as usize)) } == SOCKET_ERROR {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

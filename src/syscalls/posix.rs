/*!
 * POSIX Syscall Backend
 * EINTR-retrying wrappers with explicit close-on-exec after creation
 */

use super::retry::retry_on_interrupt;
use super::traits::*;
use super::types::{OpenFlags, DEFAULT_CREATE_MODE};
use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg, FdFlag};
use nix::libc;
use nix::sys::socket::{self, AddressFamily, SockFlag, SockType};
use nix::sys::stat::Mode;
use std::ffi::CString;
use std::io;
use std::io::SeekFrom;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;
use tracing::debug;

pub const SOL_SOCKET: i32 = libc::SOL_SOCKET;
pub const SO_RCVBUF: i32 = libc::SO_RCVBUF;
pub const IPPROTO_TCP: i32 = libc::IPPROTO_TCP;
pub const TCP_NODELAY: i32 = libc::TCP_NODELAY;

/// POSIX implementation of the syscall traits
pub struct PosixSyscalls;

fn to_cstring(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| io::Error::from(Errno::EINVAL))
}

fn native_flags(flags: OpenFlags) -> libc::c_int {
    let mut oflag = match (flags.read, flags.is_writable()) {
        (true, true) => libc::O_RDWR,
        (false, true) => libc::O_WRONLY,
        _ => libc::O_RDONLY,
    };

    if flags.append {
        oflag |= libc::O_APPEND;
    }
    if flags.truncate {
        oflag |= libc::O_TRUNC;
    }
    if flags.create {
        oflag |= libc::O_CREAT;
    }
    if flags.create_new {
        oflag |= libc::O_CREAT | libc::O_EXCL;
    }

    oflag
}

/// Take ownership of a freshly created descriptor and mark it close-on-exec
fn adopt(raw: RawFd) -> OwnedFd {
    // SAFETY: `raw` was just returned by a successful creating syscall and
    // nothing else owns it.
    let fd = unsafe { OwnedFd::from_raw_fd(raw) };
    PosixSyscalls::close_on_exec(fd.as_fd());
    fd
}

impl FileSyscalls for PosixSyscalls {
    type File = OwnedFd;
    type FileRef<'a> = BorrowedFd<'a>;

    fn open(path: &Path, flags: OpenFlags, mode: Option<u32>) -> io::Result<OwnedFd> {
        let cpath = to_cstring(path)?;
        let oflag = native_flags(flags);

        let raw = if flags.will_create() {
            let mode = mode.unwrap_or(DEFAULT_CREATE_MODE) as libc::c_uint;
            retry_on_interrupt("open", || {
                // SAFETY: `cpath` is a valid NUL-terminated string for the call.
                Errno::result(unsafe { libc::open(cpath.as_ptr(), oflag, mode) })
            })?
        } else {
            // The two-argument form: no mode is passed when nothing can be created.
            retry_on_interrupt("open", || {
                // SAFETY: as above.
                Errno::result(unsafe { libc::open(cpath.as_ptr(), oflag) })
            })?
        };

        Ok(adopt(raw))
    }

    fn creat(path: &Path, mode: u32) -> io::Result<OwnedFd> {
        let cpath = to_cstring(path)?;
        let raw = retry_on_interrupt("creat", || {
            // SAFETY: `cpath` is a valid NUL-terminated string for the call.
            Errno::result(unsafe { libc::creat(cpath.as_ptr(), mode as libc::mode_t) })
        })?;

        Ok(adopt(raw))
    }

    fn read(fd: BorrowedFd<'_>, buf: &mut [u8]) -> io::Result<usize> {
        let n = retry_on_interrupt("read", || {
            // SAFETY: `buf` is valid for `buf.len()` writable bytes.
            Errno::result(unsafe {
                libc::read(fd.as_raw_fd(), buf.as_mut_ptr().cast(), buf.len())
            })
        })?;
        Ok(n as usize)
    }

    fn write(fd: BorrowedFd<'_>, buf: &[u8]) -> io::Result<usize> {
        let n = retry_on_interrupt("write", || {
            // SAFETY: `buf` is valid for `buf.len()` readable bytes.
            Errno::result(unsafe { libc::write(fd.as_raw_fd(), buf.as_ptr().cast(), buf.len()) })
        })?;
        Ok(n as usize)
    }

    fn lseek(fd: BorrowedFd<'_>, pos: SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            SeekFrom::Start(n) => (n as libc::off_t, libc::SEEK_SET),
            SeekFrom::Current(n) => (n as libc::off_t, libc::SEEK_CUR),
            SeekFrom::End(n) => (n as libc::off_t, libc::SEEK_END),
        };

        // SAFETY: plain integer arguments on a borrowed, open descriptor.
        let off = Errno::result(unsafe { libc::lseek(fd.as_raw_fd(), offset, whence) })?;
        Ok(off as u64)
    }

    fn close(fd: OwnedFd) -> io::Result<()> {
        let raw = fd.into_raw_fd();
        // Single attempt: after EINTR the descriptor state is unspecified
        // and it may already have been reused.
        // SAFETY: ownership of `raw` was released by `into_raw_fd`.
        Errno::result(unsafe { libc::close(raw) })?;
        Ok(())
    }

    fn unlink(path: &Path) -> io::Result<()> {
        nix::unistd::unlink(path)?;
        Ok(())
    }

    fn mkdir(path: &Path, mode: u32) -> io::Result<()> {
        nix::unistd::mkdir(path, Mode::from_bits_truncate(mode as libc::mode_t))?;
        Ok(())
    }
}

impl InheritanceControl for PosixSyscalls {
    fn close_on_exec(fd: BorrowedFd<'_>) {
        if let Err(e) = fcntl(fd.as_raw_fd(), FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC)) {
            debug!(fd = fd.as_raw_fd(), error = %e, "failed to set FD_CLOEXEC");
        }
    }
}

impl SocketSyscalls for PosixSyscalls {
    type Socket = OwnedFd;
    type SocketRef<'a> = BorrowedFd<'a>;

    fn accept(listener: BorrowedFd<'_>) -> io::Result<OwnedFd> {
        let raw = retry_on_interrupt("accept", || {
            // SAFETY: null address pointers are permitted by accept(2).
            Errno::result(unsafe {
                libc::accept(listener.as_raw_fd(), ptr::null_mut(), ptr::null_mut())
            })
        })?;

        Ok(adopt(raw))
    }

    fn shutdown(sock: BorrowedFd<'_>) -> io::Result<()> {
        socket::shutdown(sock.as_raw_fd(), socket::Shutdown::Both)?;
        Ok(())
    }

    fn setsockopt(sock: BorrowedFd<'_>, level: i32, name: i32, value: &[u8]) -> io::Result<()> {
        // SAFETY: `value` is valid for `value.len()` readable bytes.
        Errno::result(unsafe {
            libc::setsockopt(
                sock.as_raw_fd(),
                level,
                name,
                value.as_ptr().cast(),
                value.len() as libc::socklen_t,
            )
        })?;
        Ok(())
    }

    fn socketpair() -> io::Result<(OwnedFd, OwnedFd)> {
        let (a, b) = socket::socketpair(
            AddressFamily::Unix,
            SockType::Stream,
            None,
            SockFlag::empty(),
        )?;

        Self::close_on_exec(a.as_fd());
        Self::close_on_exec(b.as_fd());
        Ok((a, b))
    }

    fn close_socket(sock: OwnedFd) -> io::Result<()> {
        Self::close(sock)
    }
}

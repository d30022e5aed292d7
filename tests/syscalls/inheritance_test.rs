/*!
 * Close-on-exec Tests
 */

use hostsys::syscalls::{self, file_ref, socket_ref, OpenFlags};
use nix::fcntl::{fcntl, FcntlArg, FdFlag};
use nix::libc;
use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};
use std::process::Command;
use tempfile::TempDir;

fn has_cloexec(fd: BorrowedFd<'_>) -> bool {
    let bits = fcntl(fd.as_raw_fd(), FcntlArg::F_GETFD).unwrap();
    FdFlag::from_bits_truncate(bits).contains(FdFlag::FD_CLOEXEC)
}

fn visible_to_child(fd: RawFd) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("test -e /dev/fd/{fd}"))
        .status()
        .unwrap()
        .success()
}

#[test]
fn test_created_files_are_cloexec() {
    let dir = TempDir::new().unwrap();

    let opened = syscalls::open(dir.path().join("a"), OpenFlags::create_truncate()).unwrap();
    assert!(has_cloexec(file_ref(&opened)));

    let created = syscalls::creat(dir.path().join("b"), 0o644).unwrap();
    assert!(has_cloexec(file_ref(&created)));

    let reopened = syscalls::open(dir.path().join("a"), OpenFlags::read_only()).unwrap();
    assert!(has_cloexec(file_ref(&reopened)));
}

#[test]
fn test_created_sockets_are_cloexec() {
    let (a, b) = syscalls::socketpair().unwrap();
    assert!(has_cloexec(socket_ref(&a)));
    assert!(has_cloexec(socket_ref(&b)));

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let _client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
    let accepted = syscalls::accept(listener.as_fd()).unwrap();
    assert!(has_cloexec(socket_ref(&accepted)));
}

#[test]
fn test_close_on_exec_marks_foreign_descriptor() {
    let dir = TempDir::new().unwrap();
    let fd = syscalls::open(dir.path().join("c"), OpenFlags::create_truncate()).unwrap();

    // SAFETY: dup returns a fresh descriptor that we own.
    let raw = unsafe { libc::dup(fd.as_raw_fd()) };
    assert!(raw >= 0);
    let dup = unsafe { OwnedFd::from_raw_fd(raw) };
    assert!(!has_cloexec(dup.as_fd()));

    syscalls::close_on_exec(dup.as_fd());
    assert!(has_cloexec(dup.as_fd()));
}

#[test]
fn test_child_cannot_see_created_descriptor() {
    let dir = TempDir::new().unwrap();
    let fd = syscalls::open(dir.path().join("d"), OpenFlags::create_truncate()).unwrap();
    assert!(!visible_to_child(fd.as_raw_fd()));

    // A plain dup is inherited, which shows the probe works.
    // SAFETY: dup returns a fresh descriptor that we own.
    let raw = unsafe { libc::dup(fd.as_raw_fd()) };
    assert!(raw >= 0);
    let dup = unsafe { OwnedFd::from_raw_fd(raw) };
    assert!(visible_to_child(dup.as_raw_fd()));
}

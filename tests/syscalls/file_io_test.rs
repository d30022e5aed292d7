/*!
 * File I/O Tests
 */

use hostsys::syscalls::{self, file_ref, OpenFlags};
use pretty_assertions::assert_eq;
use std::io::{ErrorKind, SeekFrom};
use tempfile::TempDir;

#[test]
fn test_write_seek_read_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.bin");

    let fd = syscalls::open(&path, OpenFlags::create_truncate().with_read()).unwrap();
    assert_eq!(syscalls::write(file_ref(&fd), b"hello world").unwrap(), 11);
    assert_eq!(syscalls::lseek(file_ref(&fd), SeekFrom::Start(6)).unwrap(), 6);

    let mut buf = [0u8; 16];
    let n = syscalls::read(file_ref(&fd), &mut buf).unwrap();
    assert_eq!(&buf[..n], b"world");

    // End of file reads zero bytes
    assert_eq!(syscalls::read(file_ref(&fd), &mut buf).unwrap(), 0);
    syscalls::close(fd).unwrap();
}

#[test]
fn test_open_missing_without_create_fails() {
    let dir = TempDir::new().unwrap();
    let err = syscalls::open(dir.path().join("absent"), OpenFlags::read_only()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.raw_os_error().is_some());
}

#[test]
fn test_create_new_refuses_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("once");

    let fd = syscalls::open_mode(&path, OpenFlags::create_new(), 0o644).unwrap();
    syscalls::close(fd).unwrap();

    let err = syscalls::open_mode(&path, OpenFlags::create_new(), 0o644).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

#[test]
fn test_mode_ignored_without_create() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("existing");
    std::fs::write(&path, b"abc").unwrap();

    // A zero mode would make a new file unreadable; here it must not matter.
    let fd = syscalls::open_mode(&path, OpenFlags::read_only(), 0).unwrap();
    let mut buf = [0u8; 3];
    assert_eq!(syscalls::read(file_ref(&fd), &mut buf).unwrap(), 3);
    assert_eq!(&buf, b"abc");
    syscalls::close(fd).unwrap();
}

#[test]
fn test_creat_truncates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.txt");
    std::fs::write(&path, b"old contents").unwrap();

    let fd = syscalls::creat(&path, 0o644).unwrap();
    syscalls::write(file_ref(&fd), b"new").unwrap();
    syscalls::close(fd).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"new");
}

#[cfg(unix)]
#[test]
fn test_creat_applies_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("private");
    let fd = syscalls::creat(&path, 0o600).unwrap();
    syscalls::close(fd).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_append_writes_at_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("append.txt");
    std::fs::write(&path, b"one").unwrap();

    let fd = syscalls::open(&path, OpenFlags::append_only()).unwrap();
    syscalls::write(file_ref(&fd), b"two").unwrap();
    syscalls::close(fd).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"onetwo");
}

#[test]
fn test_mkdir() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("sub");

    syscalls::mkdir(&sub, 0o755).unwrap();
    assert!(sub.is_dir());

    let err = syscalls::mkdir(&sub, 0o755).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

#[test]
fn test_from_posix_flags_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("numeric");

    // O_WRONLY | O_CREAT | O_TRUNC
    let flags = OpenFlags::from_posix(0o1 | 0o100 | 0o1000);
    let fd = syscalls::open(&path, flags).unwrap();
    syscalls::write(file_ref(&fd), b"x").unwrap();
    syscalls::close(fd).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"x");
}

#[test]
fn test_creat_keeps_existing_file_attributes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kept");
    std::fs::write(&path, b"previous").unwrap();

    // A read-only mode only applies to files creat brings into existence.
    let fd = syscalls::creat(&path, 0o444).unwrap();
    syscalls::close(fd).unwrap();

    let meta = std::fs::metadata(&path).unwrap();
    assert!(!meta.permissions().readonly());
    assert_eq!(meta.len(), 0);
}

/*!
 * Unlink Tests
 */

use hostsys::syscalls;
use std::io::ErrorKind;
use tempfile::TempDir;

#[test]
fn test_unlink_removes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("victim");
    std::fs::write(&path, b"x").unwrap();

    syscalls::unlink(&path).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_unlink_missing_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = syscalls::unlink(dir.path().join("never-created")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_unlink_read_only_file() {
    // POSIX removal depends on the directory only; Windows clears the
    // attribute and retries.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("locked");
    std::fs::write(&path, b"x").unwrap();

    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_readonly(true);
    std::fs::set_permissions(&path, perms).unwrap();

    syscalls::unlink(&path).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_creat_without_write_bit_then_unlink() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ro-created");

    let fd = syscalls::creat(&path, 0o444).unwrap();
    syscalls::close(fd).unwrap();
    assert!(std::fs::metadata(&path).unwrap().permissions().readonly());

    syscalls::unlink(&path).unwrap();
    assert!(!path.exists());
}

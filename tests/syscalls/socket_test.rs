/*!
 * Socket Wrapper Tests
 */

use hostsys::net::{disable_nagle, set_recv_buffer_size, SocketTuning};
use hostsys::syscalls::{self, socket_ref, SocketDesc, SocketRef, SOL_SOCKET, SO_RCVBUF};
use std::io::{Read, Write};
use std::net::{Ipv4Addr, TcpListener, TcpStream};

#[cfg(unix)]
fn stream_ref(stream: &TcpStream) -> SocketRef<'_> {
    std::os::fd::AsFd::as_fd(stream)
}

#[cfg(windows)]
fn stream_ref(stream: &TcpStream) -> SocketRef<'_> {
    std::os::windows::io::AsSocket::as_socket(stream)
}

#[cfg(unix)]
fn into_stream(sock: SocketDesc) -> std::os::unix::net::UnixStream {
    sock.into()
}

#[cfg(windows)]
fn into_stream(sock: SocketDesc) -> TcpStream {
    sock.into()
}

fn tcp_pair() -> (TcpListener, TcpStream) {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
    (listener, client)
}

#[test]
fn test_socketpair_is_connected() {
    let (a, b) = syscalls::socketpair().unwrap();
    let mut a = into_stream(a);
    let mut b = into_stream(b);

    a.write_all(b"ping").unwrap();
    let mut buf = [0u8; 4];
    b.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"ping");

    b.write_all(b"pong").unwrap();
    a.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"pong");
}

#[test]
fn test_shutdown_signals_eof() {
    let (a, b) = syscalls::socketpair().unwrap();
    syscalls::shutdown(socket_ref(&a)).unwrap();

    let mut b = into_stream(b);
    let mut buf = [0u8; 8];
    assert_eq!(b.read(&mut buf).unwrap(), 0);

    syscalls::close_socket(a).unwrap();
}

#[test]
fn test_accept_returns_connected_socket() {
    let (listener, mut client) = tcp_pair();

    let accepted = syscalls::accept(stream_ref_listener(&listener)).unwrap();
    client.write_all(b"hi").unwrap();

    let mut server: TcpStream = accepted.into();
    let mut buf = [0u8; 2];
    server.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"hi");
}

#[cfg(unix)]
fn stream_ref_listener(listener: &TcpListener) -> SocketRef<'_> {
    std::os::fd::AsFd::as_fd(listener)
}

#[cfg(windows)]
fn stream_ref_listener(listener: &TcpListener) -> SocketRef<'_> {
    std::os::windows::io::AsSocket::as_socket(listener)
}

#[test]
fn test_setsockopt_relays_native_error() {
    let (_listener, client) = tcp_pair();
    // Option name no platform defines at this level
    let err = syscalls::setsockopt(stream_ref(&client), SOL_SOCKET, 0x7fff_0000, &1i32.to_ne_bytes())
        .unwrap_err();
    assert!(err.raw_os_error().is_some());

    syscalls::setsockopt(stream_ref(&client), SOL_SOCKET, SO_RCVBUF, &65536i32.to_ne_bytes())
        .unwrap();
}

#[test]
fn test_disable_nagle_on_tcp() {
    let (_listener, client) = tcp_pair();
    client.set_nodelay(false).unwrap();

    disable_nagle(stream_ref(&client));
    assert!(client.nodelay().unwrap());
}

#[cfg(unix)]
#[test]
fn test_disable_nagle_ignores_unsupported_socket() {
    let (a, _b) = syscalls::socketpair().unwrap();
    // AF_UNIX rejects TCP_NODELAY; the failure is swallowed.
    disable_nagle(socket_ref(&a));
}

#[cfg(unix)]
#[test]
fn test_recv_buffer_size_applied() {
    use nix::sys::socket::{getsockopt, sockopt};

    let (_listener, client) = tcp_pair();
    set_recv_buffer_size(stream_ref(&client), 32 * 1024).unwrap();

    // Linux reports double the requested size
    let size = getsockopt(&client, sockopt::RcvBuf).unwrap();
    assert!(size >= 32 * 1024, "receive buffer is {size}");
}

#[test]
fn test_tuning_apply() {
    let (_listener, client) = tcp_pair();
    client.set_nodelay(false).unwrap();

    let tuning = SocketTuning {
        recv_buffer_size: Some(16 * 1024),
        nodelay: true,
    };
    tuning.apply(stream_ref(&client)).unwrap();
    assert!(client.nodelay().unwrap());
}

#[cfg(unix)]
#[test]
fn test_recv_buffer_error_is_native() {
    use hostsys::syscalls::{file_ref, OpenFlags};

    let dir = tempfile::TempDir::new().unwrap();
    let fd = syscalls::open(dir.path().join("plain"), OpenFlags::create_truncate()).unwrap();

    // A regular file is not a socket; the errno comes back untouched.
    let err = set_recv_buffer_size(file_ref(&fd), 4096).unwrap_err();
    assert_eq!(err.raw_os_error(), Some(nix::libc::ENOTSOCK));
}

use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use socket2::SockRef;
use tcp_sock::client::{ClientPool, probe_connection};
use tcp_sock::socket::{
    RecvOutcome, create_client_socket, create_server_socket, is_port_available,
    recv_msg_blocking, recv_msg_timeout, send_message, set_socket_buffer_size,
    socket_buffer_size,
};
use tcp_sock::SocketError;

const TEST_PORT: u16 = 12347;
const TEST_IP: &str = "127.0.0.1";
const MAX_CLIENTS: i32 = 5;
const MESSAGE: &[u8] = b"Hello, server!";

// Helper to start a listening server on an ephemeral port
fn start_test_server() -> (TcpListener, u16) {
    let listener = create_server_socket(0, MAX_CLIENTS).expect("server socket creation failed");
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

// Helper that accepts one client on a background thread
fn accept_in_background(listener: TcpListener) -> thread::JoinHandle<TcpStream> {
    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("failed to accept client connection");
        stream
    })
}

// Echo server: receive once, wait, send the same bytes back
fn echo_with_delay(listener: TcpListener, delay: Duration) -> thread::JoinHandle<TcpStream> {
    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("failed to accept client connection");
        let mut buf = [0u8; 128];
        let n = recv_msg_blocking(&stream, &mut buf).unwrap();
        assert!(n > 0);
        thread::sleep(delay);
        send_message(&stream, &buf[..n]).unwrap();
        stream
    })
}

#[test]
fn test_create_server_socket() {
    let (listener, port) = start_test_server();
    assert_ne!(port, 0);
    assert!(!is_port_available(port));
    drop(listener);
}

#[test]
fn test_create_client_socket() {
    let (listener, port) = start_test_server();
    let server = accept_in_background(listener);

    let client = create_client_socket(TEST_IP, port).expect("failed to create client socket");
    let accepted = server.join().unwrap();

    assert_eq!(accepted.peer_addr().unwrap(), client.local_addr().unwrap());
}

#[test]
fn test_tcp_keepalive_options() {
    let (listener, _) = start_test_server();
    let sock = SockRef::from(&listener);

    assert!(sock.keepalive().unwrap(), "SO_KEEPALIVE is not set correctly");
    assert_eq!(sock.keepalive_time().unwrap(), Duration::from_secs(10));
    assert_eq!(sock.keepalive_interval().unwrap(), Duration::from_secs(5));
    assert_eq!(sock.keepalive_retries().unwrap(), 3);
}

#[test]
fn test_accepted_client_inherits_keepalive() {
    let (listener, port) = start_test_server();
    let server = accept_in_background(listener);

    let _client = create_client_socket(TEST_IP, port).unwrap();
    let accepted = server.join().unwrap();

    assert!(SockRef::from(&accepted).keepalive().unwrap());
}

#[test]
fn test_handle_client_disconnection() {
    let (listener, port) = start_test_server();
    let server = accept_in_background(listener);

    let client = create_client_socket(TEST_IP, port).unwrap();
    let accepted = server.join().unwrap();

    let mut pool = ClientPool::new(MAX_CLIENTS as usize);
    let slot = pool.insert(accepted).unwrap();
    assert!(probe_connection(pool.get(slot).unwrap()).is_connected());

    drop(client);
    thread::sleep(Duration::from_millis(100));

    assert!(probe_connection(pool.get(slot).unwrap()).is_disconnected());

    let reports = pool.check_client_connections();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].liveness.is_disconnected());
    assert!(pool.get(slot).is_none());
    assert!(pool.is_empty());
}

#[test]
fn test_client_send_without_server_response() {
    let (listener, port) = start_test_server();
    let server = accept_in_background(listener);

    let client = create_client_socket(TEST_IP, port).unwrap();
    // Keep the server side open but silent.
    let _accepted = server.join().unwrap();

    assert_eq!(send_message(&client, MESSAGE).unwrap(), MESSAGE.len());

    let mut buf = [0u8; 128];
    let outcome = recv_msg_timeout(&client, &mut buf, Duration::from_secs(1)).unwrap();
    assert_eq!(outcome, RecvOutcome::TimedOut, "server responded unexpectedly");
}

#[test]
fn test_send_and_receive_blocking() {
    let (listener, port) = start_test_server();
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 128];
        let n = recv_msg_blocking(&stream, &mut buf).unwrap();
        assert!(n > 0);
        send_message(&stream, &buf[..n]).unwrap();
        stream
    });

    let client = create_client_socket(TEST_IP, port).unwrap();
    let sent = send_message(&client, MESSAGE).unwrap();
    assert_eq!(sent, MESSAGE.len());

    let mut received = [0u8; 128];
    let n = recv_msg_blocking(&client, &mut received[..sent]).unwrap();
    assert_eq!(n, sent);
    assert_eq!(&received[..n], MESSAGE);

    drop(client);
    server.join().unwrap();
}

#[test]
fn test_receive_with_timeout_timeout_expected() {
    let (listener, port) = start_test_server();
    let server = echo_with_delay(listener, Duration::from_millis(200));

    let client = create_client_socket(TEST_IP, port).unwrap();
    assert_eq!(send_message(&client, MESSAGE).unwrap(), MESSAGE.len());

    let mut buf = [0u8; 128];
    let outcome = recv_msg_timeout(&client, &mut buf, Duration::from_millis(100)).unwrap();
    assert_eq!(outcome, RecvOutcome::TimedOut);

    drop(client);
    server.join().unwrap();
}

#[test]
fn test_receive_with_timeout_successful_receive() {
    let (listener, port) = start_test_server();
    let server = echo_with_delay(listener, Duration::from_millis(200));

    let client = create_client_socket(TEST_IP, port).unwrap();
    assert_eq!(send_message(&client, MESSAGE).unwrap(), MESSAGE.len());

    let mut buf = [0u8; 128];
    let outcome = recv_msg_timeout(&client, &mut buf, Duration::from_millis(300)).unwrap();
    assert_eq!(outcome, RecvOutcome::Received(MESSAGE.len()));
    assert_eq!(&buf[..MESSAGE.len()], MESSAGE);

    drop(client);
    server.join().unwrap();
}

// Fixed-port scenario: a 100 ms wait misses the delayed echo, a 300 ms wait
// from the start of the exchange gets it.
#[test]
fn test_delayed_echo_on_fixed_port() {
    if !is_port_available(TEST_PORT) {
        eprintln!("Port {} is already in use. Skipping test.", TEST_PORT);
        return;
    }

    let listener = create_server_socket(TEST_PORT, MAX_CLIENTS).unwrap();
    let server = echo_with_delay(listener, Duration::from_millis(200));

    let client = create_client_socket(TEST_IP, TEST_PORT).unwrap();
    assert_eq!(send_message(&client, MESSAGE).unwrap(), 14);

    let mut buf = [0u8; 128];
    let first = recv_msg_timeout(&client, &mut buf, Duration::from_millis(100)).unwrap();
    assert_eq!(first, RecvOutcome::TimedOut);

    let second = recv_msg_timeout(&client, &mut buf, Duration::from_millis(300)).unwrap();
    assert_eq!(second, RecvOutcome::Received(14));
    assert_eq!(&buf[..14], b"Hello, server!");

    drop(client);
    server.join().unwrap();
}

#[test]
fn test_invalid_address_is_rejected() {
    for ip in ["localhost", "::1", "256.0.0.1", "1.2.3"] {
        assert!(
            matches!(create_client_socket(ip, 80), Err(SocketError::InvalidAddress(_))),
            "{} should be rejected",
            ip
        );
    }
}

#[test]
fn test_socket_buffer_size() {
    let (listener, port) = start_test_server();
    let server = accept_in_background(listener);
    let client = create_client_socket(TEST_IP, port).unwrap();
    let _accepted = server.join().unwrap();

    set_socket_buffer_size(&client, 16 * 1024, 24 * 1024).unwrap();
    let (rx, tx) = socket_buffer_size(&client).unwrap();
    assert!(rx >= 16 * 1024);
    assert!(tx >= 24 * 1024);
}

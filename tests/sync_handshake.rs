use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use retrows::handshake::UpgradeRequest;
use retrows::session::Session;
use retrows::version::ProtocolVersion;

use log::debug;

const HYBI_REQUEST: &[u8] = b"\
    GET /ws HTTP/1.1\r\n\
    Host: www.example.com\r\n\
    Upgrade: websocket\r\n\
    Connection: Upgrade\r\n\
    Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\r\n";

// the draft-76 handshake example, challenge body included
const LEGACY76_REQUEST: &[u8] = b"\
    GET /demo HTTP/1.1\r\n\
    Host: example.com\r\n\
    Connection: Upgrade\r\n\
    Sec-WebSocket-Key2: 12998 5 Y3 1  .P00\r\n\
    Sec-WebSocket-Protocol: sample\r\n\
    Upgrade: WebSocket\r\n\
    Sec-WebSocket-Key1: 4 @1  46546xW%0l 1 5\r\n\
    Origin: http://example.com\r\n\r\n\
    ^n:ds[4U";

const LEGACY75_REQUEST: &[u8] = b"\
    GET /old HTTP/1.1\r\n\
    Host: example.com\r\n\
    Upgrade: WebSocket\r\n\
    Connection: Upgrade\r\n\
    Origin: http://example.com\r\n\r\n";

fn accept_one(lis: TcpListener, expect: ProtocolVersion) {
    let (mut tcp, _) = lis.accept().unwrap();
    debug!("server: tcp accepted!");

    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let request = loop {
        let n = tcp.read(&mut chunk).unwrap();
        assert!(n > 0, "peer quit during handshake");
        buf.extend_from_slice(&chunk[..n]);
        match UpgradeRequest::decode(&buf) {
            Ok((request, _)) => break request,
            Err(retrows::error::HandshakeError::NotEnoughData) => continue,
            Err(e) => panic!("bad request: {}", e),
        }
    };

    let ws = Session::upgrade(tcp, &request).unwrap();
    debug!("server: websocket accepted!");
    assert_eq!(ws.version(), expect);
}

fn run_client(addr: &str, request: &[u8]) -> Vec<u8> {
    debug!("client: sleep 500ms..");
    thread::sleep(Duration::from_millis(500));
    let mut tcp = TcpStream::connect(addr).unwrap();
    debug!("client: tcp connected!");

    tcp.write_all(request).unwrap();

    // the server drops the connection right after the handshake,
    // so the whole reply ends with eof
    let mut reply = Vec::new();
    tcp.read_to_end(&mut reply).unwrap();
    debug!("client: reply received");
    reply
}

#[test]
fn hybi_handshake() {
    let _ = env_logger::try_init();
    const ADDR: &str = "127.0.0.1:10082";

    let lis = TcpListener::bind(ADDR).unwrap();
    let t1 = thread::spawn(move || accept_one(lis, ProtocolVersion::Hybi));
    let t2 = thread::spawn(|| {
        let reply = run_client(ADDR, HYBI_REQUEST);
        let text = String::from_utf8(reply).unwrap();
        assert!(text.starts_with("HTTP/1.1 101 Switching Protocols\r\n"));
        assert!(text.contains("Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n"));
    });

    t1.join().unwrap();
    t2.join().unwrap();
}

#[test]
fn legacy76_handshake() {
    let _ = env_logger::try_init();
    const ADDR: &str = "127.0.0.1:10083";

    let lis = TcpListener::bind(ADDR).unwrap();
    let t1 = thread::spawn(move || accept_one(lis, ProtocolVersion::Legacy76));
    let t2 = thread::spawn(|| {
        let reply = run_client(ADDR, LEGACY76_REQUEST);
        let text = String::from_utf8_lossy(&reply);
        assert!(text.starts_with("HTTP/1.1 101 Web Socket Protocol Handshake\r\n"));
        assert!(text.contains("Sec-WebSocket-Origin: http://example.com\r\n"));
        assert!(text.contains("Sec-WebSocket-Protocol: sample\r\n"));
        assert!(text.contains("Sec-WebSocket-Location: ws://example.com/demo\r\n"));
        assert!(reply.ends_with(b"8jKS'y:G*Co,Wxa-"));
    });

    t1.join().unwrap();
    t2.join().unwrap();
}

#[test]
fn legacy75_handshake() {
    let _ = env_logger::try_init();
    const ADDR: &str = "127.0.0.1:10084";

    let lis = TcpListener::bind(ADDR).unwrap();
    let t1 = thread::spawn(move || accept_one(lis, ProtocolVersion::Legacy75));
    let t2 = thread::spawn(|| {
        let reply = run_client(ADDR, LEGACY75_REQUEST);
        let text = String::from_utf8(reply).unwrap();
        assert!(text.starts_with("HTTP/1.1 101 Web Socket Protocol Handshake\r\n"));
        assert!(text.contains("WebSocket-Origin: http://example.com\r\n"));
        assert!(text.contains("WebSocket-Location: ws://example.com/old\r\n"));
    });

    t1.join().unwrap();
    t2.join().unwrap();
}

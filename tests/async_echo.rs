#![cfg(feature = "async")]

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use retrows::handshake::UpgradeRequest;
use retrows::message::Message;
use retrows::session::AsyncSession;

use log::debug;

const ADDR: &str = "127.0.0.1:10085";

const REQUEST: &[u8] = b"\
    GET /echo HTTP/1.1\r\n\
    Host: www.example.com\r\n\
    Upgrade: websocket\r\n\
    Connection: Upgrade\r\n\
    Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\r\n";

async fn read_request(tcp: &mut TcpStream) -> UpgradeRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = tcp.read(&mut chunk).await.unwrap();
        assert!(n > 0, "peer quit during handshake");
        buf.extend_from_slice(&chunk[..n]);
        match UpgradeRequest::decode(&buf) {
            Ok((request, _)) => return request,
            Err(retrows::error::HandshakeError::NotEnoughData) => continue,
            Err(e) => panic!("bad request: {}", e),
        }
    }
}

async fn read_reply_head(tcp: &mut TcpStream) -> Vec<u8> {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        tcp.read_exact(&mut byte).await.unwrap();
        head.push(byte[0]);
    }
    head
}

async fn write_masked_text(tcp: &mut TcpStream, key: [u8; 4], text: &str) {
    assert!(text.len() < 126);
    let mut wire = vec![0x81, 0x80 | text.len() as u8];
    wire.extend_from_slice(&key);
    for (i, b) in text.bytes().enumerate() {
        wire.push(b ^ key[i & 0x03]);
    }
    tcp.write_all(&wire).await.unwrap();
}

async fn read_text_frame(tcp: &mut TcpStream) -> String {
    let mut head = [0u8; 2];
    tcp.read_exact(&mut head).await.unwrap();
    assert_eq!(head[0], 0x81);
    assert!(head[1] < 126);

    let mut payload = vec![0u8; head[1] as usize];
    tcp.read_exact(&mut payload).await.unwrap();
    String::from_utf8(payload).unwrap()
}

#[tokio::test]
async fn async_echo() {
    let _ = env_logger::try_init();

    let lis = TcpListener::bind(ADDR).await.unwrap();

    let t1 = tokio::spawn(async move {
        let (mut tcp, _) = lis.accept().await.unwrap();
        debug!("server: tcp accepted!");
        let request = read_request(&mut tcp).await;
        let mut ws = AsyncSession::upgrade(tcp, &request).await.unwrap();
        debug!("server: websocket accepted!");

        loop {
            match ws.receive().await.unwrap() {
                Some(Message::Text(text)) => {
                    debug!("server: echo..");
                    ws.send(&text).await.unwrap();
                }
                Some(Message::Close(_)) | None => {
                    debug!("server: close");
                    break;
                }
                Some(other) => panic!("unexpected message: {:?}", other),
            }
        }
        ws.close().await.unwrap();
    });

    let t2 = tokio::spawn(async {
        debug!("client: sleep 500ms..");
        tokio::time::sleep(Duration::from_millis(500)).await;
        let mut tcp = TcpStream::connect(ADDR).await.unwrap();
        debug!("client: tcp connected!");

        tcp.write_all(REQUEST).await.unwrap();
        let head = read_reply_head(&mut tcp).await;
        assert!(head.starts_with(b"HTTP/1.1 101 Switching Protocols\r\n"));
        debug!("client: websocket connected!");

        for text in ["ECHO ECHO ECHO!", "caf\u{00e9} \u{3053}\u{3093}"] {
            let key: [u8; 4] = rand::random();
            write_masked_text(&mut tcp, key, text).await;

            let back = read_text_frame(&mut tcp).await;
            debug!("client: receive message: {}", back);
            assert_eq!(back, text);
        }

        let key: [u8; 4] = rand::random();
        let mut close = vec![0x88, 0x80];
        close.extend_from_slice(&key);
        tcp.write_all(&close).await.unwrap();
        debug!("client: close");
    });

    t1.await.unwrap();
    t2.await.unwrap();
}

//
// Copyright 2026 The Teleterm Developers. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! End-to-end session tests against a local TCP server.

use std::sync::Arc;
use std::time::{Duration, Instant};
use teleterm_client::{ClientConfig, ClientError, CursorPosition, TerminalSession};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::sleep;

const IAC: u8 = 255;
const DO: u8 = 253;
const WONT: u8 = 252;

async fn local_server() -> (TcpListener, ClientConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = ClientConfig::new("127.0.0.1", port).with_tick_interval(Duration::from_millis(1));
    (listener, config)
}

async fn read_exact_bytes(stream: &mut TcpStream, len: usize) -> Vec<u8> {
    let mut buffer = vec![0u8; len];
    tokio::time::timeout(Duration::from_secs(2), stream.read_exact(&mut buffer))
        .await
        .expect("timed out reading from client")
        .expect("client hung up early");
    buffer
}

macro_rules! wait_until {
    ($probe:expr) => {
        let deadline = Instant::now() + Duration::from_secs(2);
        while !$probe {
            assert!(Instant::now() < deadline, "condition never became true");
            sleep(Duration::from_millis(5)).await;
        }
    };
}

#[tokio::test]
async fn test_remote_text_renders_and_negotiation_is_refused() {
    let (listener, config) = local_server().await;
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        stream.write_all(b"Hi\r\n").await.unwrap();
        stream.write_all(&[IAC, DO, 1]).await.unwrap();
        stream.flush().await.unwrap();
        read_exact_bytes(&mut stream, 3).await
    });

    let session = TerminalSession::connect(config).await.unwrap();
    wait_until!(session.char_at(0, 0).await == 'H');
    assert_eq!(session.char_at(1, 0).await, 'i');
    assert_eq!(session.cursor().await, CursorPosition::new(0, 1));
    assert_eq!(session.current_line().await, "");

    // The DO ECHO probe never reaches the screen and comes back as WONT.
    assert_eq!(server.await.unwrap(), vec![IAC, WONT, 1]);
    session.close().await;
}

#[tokio::test]
async fn test_send_line_appends_crlf() {
    let (listener, config) = local_server().await;
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_exact_bytes(&mut stream, 6).await
    });

    let session = TerminalSession::connect(config).await.unwrap();
    session.send_line("look").await.unwrap();
    assert_eq!(server.await.unwrap(), b"look\r\n");
    session.close().await;
}

#[tokio::test]
async fn test_local_echo_composes_the_line() {
    let (listener, config) = local_server().await;
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        sleep(Duration::from_secs(5)).await;
    });

    let session = TerminalSession::connect(config).await.unwrap();
    session.echo("connect ").await;
    session.echo_char('x').await;
    assert_eq!(session.current_line().await, "connect x");
    assert_eq!(session.char_at(8, 0).await, 'x');

    session.echo_char('\x08').await;
    assert_eq!(session.current_line().await, "connect ");
    assert_eq!(session.char_at(8, 0).await, ' ');

    session.echo_new_line().await;
    assert_eq!(session.current_line().await, "");
    assert_eq!(session.cursor().await, CursorPosition::new(0, 1));
    session.close().await;
}

#[tokio::test]
async fn test_send_after_close_is_rejected() {
    let (listener, config) = local_server().await;
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        sleep(Duration::from_secs(5)).await;
    });

    let session = TerminalSession::connect(config).await.unwrap();
    assert!(session.is_open().await);
    session.close().await;
    assert!(!session.is_open().await);
    assert!(matches!(
        session.send("anything").await,
        Err(ClientError::Closed)
    ));

    // After a local close the wait returns at once.
    tokio::time::timeout(Duration::from_millis(500), session.wait_until_closed())
        .await
        .expect("wait should return immediately after close");
}

#[tokio::test]
async fn test_cancelled_wait_does_not_consume_the_session_end() {
    let (listener, config) = local_server().await;
    let (hold_tx, hold_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let _ = hold_rx.await;
        drop(stream);
    });

    let session = Arc::new(TerminalSession::connect(config).await.unwrap());

    // A wait that loses a select race is dropped mid-await.
    let waiter = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.wait_until_closed().await }
    });
    sleep(Duration::from_millis(50)).await;
    waiter.abort();
    assert!(session.is_open().await);

    // A later wait must still block while the remote end is alive.
    let premature =
        tokio::time::timeout(Duration::from_millis(200), session.wait_until_closed()).await;
    assert!(premature.is_err(), "wait fell through on a live session");

    // And it must still complete once the remote actually hangs up.
    hold_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(2), session.wait_until_closed())
        .await
        .expect("wait did not observe the remote close");
    session.close().await;
}

#[tokio::test]
async fn test_remote_close_ends_the_session() {
    let (listener, config) = local_server().await;
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        drop(stream);
    });

    let session = TerminalSession::connect(config).await.unwrap();
    tokio::time::timeout(Duration::from_secs(2), session.wait_until_closed())
        .await
        .expect("read loop did not end after remote close");
    session.close().await;
}

#[tokio::test]
async fn test_blink_ticker_toggles_cursor_visibility() {
    let (listener, config) = local_server().await;
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        sleep(Duration::from_secs(5)).await;
    });

    let config = config.with_blink_toggle_ticks(2);
    let session = TerminalSession::connect(config).await.unwrap();
    assert!(session.cursor_visible().await);
    wait_until!(!session.cursor_visible().await);
    wait_until!(session.cursor_visible().await);
    session.close().await;
}

#[tokio::test]
async fn test_dirty_cells_surface_through_the_session() {
    let (listener, config) = local_server().await;
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        stream.write_all(b"ok").await.unwrap();
        stream.flush().await.unwrap();
        sleep(Duration::from_secs(5)).await;
    });

    let session = TerminalSession::connect(config).await.unwrap();
    wait_until!(session.char_at(1, 0).await == 'k');
    assert!(session.cell_changed(0, 0).await);
    assert!(!session.cell_changed(0, 0).await);
    assert!(session.cell_changed(1, 0).await);
    assert!(!session.cell_changed(5, 5).await);
    session.close().await;
}

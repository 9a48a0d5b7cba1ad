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

//! Connection lifecycle for one Telnet session.

use crate::filter::{TelnetEvent, TelnetFilter};
use crate::result::{ConnectionError, ConnectionResult};
use async_trait::async_trait;
use bytes::BytesMut;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, info, warn};

/// Default limit on the TCP connect.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Size of one socket read.
const READ_CHUNK: usize = 4096;

/// Receives filtered text from the background read loop.
#[async_trait]
pub trait TextSink: Send + Sync + 'static {
    /// Called with each chunk of filtered text, whenever at least one clean
    /// byte came out of a read cycle.
    async fn on_text(&self, text: &str);

    /// Called once when the read loop ends, on remote close or read error.
    async fn on_closed(&self) {}
}

/// Handle to the spawned read loop.
///
/// The loop itself terminates on stream close or read error and is never
/// retried; this handle makes that termination observable instead of silent.
#[derive(Debug)]
pub struct ListenerTask {
    handle: JoinHandle<()>,
}

impl ListenerTask {
    /// Waits for the read loop to finish.
    pub async fn join(self) {
        let _ = self.handle.await;
    }

    /// Stops the read loop without waiting for the remote side.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Whether the read loop has already terminated.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// A Telnet-aware duplex channel to one remote host.
///
/// Exactly one connection owns one socket; it is not designed for reconnect.
/// Open a fresh instance for a fresh session.
#[derive(Debug)]
pub struct TelnetConnection {
    peer: String,
    reader: Mutex<Option<OwnedReadHalf>>,
    writer: Arc<Mutex<Option<OwnedWriteHalf>>>,
    listener_abort: Mutex<Option<AbortHandle>>,
}

impl TelnetConnection {
    /// Establishes the underlying stream connection with the default timeout.
    pub async fn connect(host: &str, port: u16) -> ConnectionResult<TelnetConnection> {
        Self::connect_timeout(host, port, DEFAULT_CONNECT_TIMEOUT).await
    }

    /// Establishes the underlying stream connection.
    ///
    /// Fails with [`ConnectionError::ConnectFailed`] if the remote is
    /// unreachable or refuses, and [`ConnectionError::Timeout`] if the dial
    /// does not complete within `limit`.
    pub async fn connect_timeout(
        host: &str,
        port: u16,
        limit: Duration,
    ) -> ConnectionResult<TelnetConnection> {
        let addr = format!("{host}:{port}");
        info!("connecting to {addr}");
        let stream = match tokio::time::timeout(limit, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(ConnectionError::ConnectFailed { addr, source }),
            Err(_) => return Err(ConnectionError::Timeout(addr)),
        };
        info!("connected to {addr}");
        let (read_half, write_half) = stream.into_split();
        Ok(TelnetConnection {
            peer: addr,
            reader: Mutex::new(Some(read_half)),
            writer: Arc::new(Mutex::new(Some(write_half))),
            listener_abort: Mutex::new(None),
        })
    }

    /// The `host:port` this connection was dialed against.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Spawns the read loop.
    ///
    /// The loop reads inbound bytes, runs them through the Telnet filter,
    /// writes back a refusal for every option the remote proposes, and hands
    /// each chunk of clean text to `sink`. It ends when the stream closes or
    /// a read fails; `sink.on_closed` fires exactly once at that point.
    ///
    /// Can only be called once per connection; a second call fails with
    /// [`ConnectionError::NotConnected`].
    pub async fn listen<S: TextSink>(&self, sink: Arc<S>) -> ConnectionResult<ListenerTask> {
        let read_half = self
            .reader
            .lock()
            .await
            .take()
            .ok_or(ConnectionError::NotConnected)?;
        let writer = Arc::clone(&self.writer);
        let handle = tokio::spawn(read_loop(read_half, writer, sink));
        *self.listener_abort.lock().await = Some(handle.abort_handle());
        Ok(ListenerTask { handle })
    }

    /// Encodes `text` with IAC escaping, writes it and flushes.
    ///
    /// Outbound text goes on the wire as UTF-8, ASCII in practice. Inbound
    /// bytes above 0x7F are surfaced one character per byte (Latin-1), so
    /// non-ASCII text does not round-trip through a remote echo.
    ///
    /// Fails with [`ConnectionError::NotConnected`] after [`close`] and
    /// [`ConnectionError::WriteFailed`] if the remote reset the stream.
    ///
    /// [`close`]: TelnetConnection::close
    pub async fn write(&self, text: &str) -> ConnectionResult<()> {
        let mut guard = self.writer.lock().await;
        let write_half = guard.as_mut().ok_or(ConnectionError::NotConnected)?;
        let mut filter = TelnetFilter::new();
        let mut encoded = BytesMut::with_capacity(text.len());
        filter.encode(text, &mut encoded)?;
        write_half
            .write_all(&encoded)
            .await
            .map_err(ConnectionError::WriteFailed)?;
        write_half
            .flush()
            .await
            .map_err(ConnectionError::WriteFailed)
    }

    /// Releases the stream and stops the read loop.
    ///
    /// Safe to call repeatedly; subsequent writes fail with
    /// [`ConnectionError::NotConnected`]. Partially-filtered Telnet state
    /// dies with the read loop and is never replayed.
    pub async fn close(&self) {
        if let Some(abort) = self.listener_abort.lock().await.take() {
            abort.abort();
        }
        if let Some(mut write_half) = self.writer.lock().await.take() {
            let _ = write_half.shutdown().await;
            info!("closed connection to {}", self.peer);
        }
        self.reader.lock().await.take();
    }

    /// Whether the write path is still open.
    pub async fn is_open(&self) -> bool {
        self.writer.lock().await.is_some()
    }
}

async fn read_loop<S: TextSink>(
    mut read_half: OwnedReadHalf,
    writer: Arc<Mutex<Option<OwnedWriteHalf>>>,
    sink: Arc<S>,
) {
    let mut filter = TelnetFilter::new();
    let mut inbound = BytesMut::with_capacity(READ_CHUNK);
    let mut raw = [0u8; READ_CHUNK];
    loop {
        let count = match read_half.read(&mut raw).await {
            Ok(0) => {
                info!("remote closed the stream");
                break;
            }
            Ok(count) => count,
            Err(error) => {
                warn!("read loop terminated: {error}");
                break;
            }
        };
        inbound.extend_from_slice(&raw[..count]);

        let mut text = String::new();
        let mut refusals = Vec::new();
        loop {
            match filter.decode(&mut inbound) {
                Ok(Some(TelnetEvent::Data(byte))) => text.push(char::from(byte)),
                Ok(Some(event @ TelnetEvent::Negotiation { .. })) => {
                    if let Some(refusal) = event.refusal() {
                        refusals.push(refusal);
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    warn!("filter error: {error}");
                    break;
                }
            }
        }

        if !refusals.is_empty() {
            send_refusals(&writer, &refusals).await;
        }
        if !text.is_empty() {
            sink.on_text(&text).await;
        }
    }
    sink.on_closed().await;
}

async fn send_refusals(
    writer: &Arc<Mutex<Option<OwnedWriteHalf>>>,
    refusals: &[crate::filter::Refusal],
) {
    let mut guard = writer.lock().await;
    let Some(write_half) = guard.as_mut() else {
        return;
    };
    let mut filter = TelnetFilter::new();
    let mut encoded = BytesMut::with_capacity(refusals.len() * 3);
    for refusal in refusals {
        debug!("refusing option {} with {:?}", refusal.option, refusal.verb);
        if filter.encode(*refusal, &mut encoded).is_err() {
            return;
        }
    }
    if let Err(error) = write_half.write_all(&encoded).await {
        warn!("failed to send negotiation refusal: {error}");
        return;
    }
    if let Err(error) = write_half.flush().await {
        warn!("failed to flush negotiation refusal: {error}");
    }
}

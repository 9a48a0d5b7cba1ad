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

//! One live terminal session: a Telnet connection feeding a screen.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use teleterm_screen::{CursorPosition, Screen};
use teleterm_telnet::{ConnectionError, ListenerTask, TelnetConnection, TextSink};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::info;

/// A connected Telnet terminal session.
///
/// Owns the connection, the screen emulator and two background tasks: the
/// read loop feeding remote text into the screen, and a ticker driving the
/// cursor blink at the configured cadence. All screen access goes through
/// async accessors; the session is shareable across tasks behind an `Arc`.
pub struct TerminalSession {
    config: ClientConfig,
    screen: Arc<Mutex<Screen>>,
    connection: TelnetConnection,
    listener: ListenerTask,
    closed: Arc<watch::Sender<bool>>,
    ticker: JoinHandle<()>,
}

/// Feeds filtered remote text into the shared screen.
struct ScreenSink {
    screen: Arc<Mutex<Screen>>,
    closed: Arc<watch::Sender<bool>>,
}

#[async_trait]
impl TextSink for ScreenSink {
    async fn on_text(&self, text: &str) {
        self.screen.lock().await.feed(text);
    }

    async fn on_closed(&self) {
        info!("remote session ended");
        self.closed.send_replace(true);
    }
}

impl TerminalSession {
    /// Connects, starts the read loop and the blink ticker.
    ///
    /// The screen starts blank; remote output begins rendering as soon as
    /// this returns.
    pub async fn connect(config: ClientConfig) -> Result<TerminalSession> {
        let connection =
            TelnetConnection::connect_timeout(&config.host, config.port, config.connect_timeout)
                .await?;
        let screen = Arc::new(Mutex::new(Screen::with_blink_interval(
            config.blink_toggle_ticks,
        )));
        let (closed_tx, _closed_rx) = watch::channel(false);
        let closed = Arc::new(closed_tx);
        let sink = Arc::new(ScreenSink {
            screen: Arc::clone(&screen),
            closed: Arc::clone(&closed),
        });
        let listener = connection.listen(sink).await?;
        let ticker = spawn_ticker(Arc::clone(&screen), config.tick_interval);
        Ok(TerminalSession {
            config,
            screen,
            connection,
            listener,
            closed,
            ticker,
        })
    }

    /// The configuration this session was opened with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The `host:port` of the remote end.
    pub fn peer(&self) -> &str {
        self.connection.peer()
    }

    // ===== Outbound =====

    /// Sends text to the remote end, IAC-escaped.
    pub async fn send(&self, text: &str) -> Result<()> {
        self.connection.write(text).await.map_err(map_send_error)
    }

    /// Sends text followed by CR LF.
    pub async fn send_line(&self, line: &str) -> Result<()> {
        let mut framed = String::with_capacity(line.len() + 2);
        framed.push_str(line);
        framed.push_str("\r\n");
        self.send(&framed).await
    }

    // ===== Local echo =====

    /// Echoes one locally-typed character onto the screen.
    ///
    /// Plain ground-state semantics: printables land at the cursor,
    /// backspace erases, escape bytes are not interpreted.
    pub async fn echo_char(&self, ch: char) {
        self.screen.lock().await.write_char(ch);
    }

    /// Echoes a locally-typed string onto the screen.
    pub async fn echo(&self, text: &str) {
        self.screen.lock().await.write(text);
    }

    /// Starts a fresh screen line after local input was submitted.
    pub async fn echo_new_line(&self) {
        self.screen.lock().await.new_line();
    }

    // ===== Screen accessors =====

    /// The character at (col, row).
    pub async fn char_at(&self, col: usize, row: usize) -> char {
        self.screen.lock().await.char_at(col, row)
    }

    /// Whether the cell at (col, row) changed since last asked.
    /// Mutating query, same contract as [`Screen::cell_changed`].
    pub async fn cell_changed(&self, col: usize, row: usize) -> bool {
        self.screen.lock().await.cell_changed(col, row)
    }

    /// The current cursor position.
    pub async fn cursor(&self) -> CursorPosition {
        self.screen.lock().await.cursor()
    }

    /// Whether the blinking cursor is visible this frame.
    pub async fn cursor_visible(&self) -> bool {
        self.screen.lock().await.cursor_visible()
    }

    /// The text of the line being composed.
    pub async fn current_line(&self) -> String {
        self.screen.lock().await.current_line().to_string()
    }

    /// Blanks the display and homes the cursor.
    pub async fn clear_display(&self) {
        self.screen.lock().await.clear();
    }

    // ===== Lifecycle =====

    /// Whether the connection is still open for writing.
    pub async fn is_open(&self) -> bool {
        self.connection.is_open().await
    }

    /// Blocks until the session ends (remote close, read error or a local
    /// [`close`]). Returns immediately if it already has.
    ///
    /// Observes a watch flag rather than the read-loop handle, so it is
    /// cancellation safe: a wait that is dropped mid-await (a `select!`
    /// losing the race, a timeout) consumes nothing, and any number of
    /// later waits still block until the session actually ends.
    ///
    /// [`close`]: TerminalSession::close
    pub async fn wait_until_closed(&self) {
        let mut rx = self.closed.subscribe();
        // Cannot fail: the sender lives as long as the session.
        let _ = rx.wait_for(|closed| *closed).await;
    }

    /// Tears the session down: stops the ticker and the read loop and
    /// releases the socket. Safe to call repeatedly.
    pub async fn close(&self) {
        self.ticker.abort();
        self.listener.abort();
        self.connection.close().await;
        self.closed.send_replace(true);
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

fn spawn_ticker(screen: Arc<Mutex<Screen>>, cadence: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cadence);
        loop {
            interval.tick().await;
            screen.lock().await.tick();
        }
    })
}

fn map_send_error(error: ConnectionError) -> ClientError {
    match error {
        ConnectionError::NotConnected => ClientError::Closed,
        other => ClientError::Connection(other),
    }
}

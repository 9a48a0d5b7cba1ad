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

//! Minimal line-mode shell over a Telnet session.
//!
//! Usage: `cargo run --example shell -- <host> [port]`
//!
//! Typed lines are echoed into the screen and sent to the remote end;
//! changed screen rows are repainted to stdout a few times a second.

use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;
use teleterm_client::{ClientConfig, GRID_COLS, GRID_ROWS, TerminalSession};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "localhost".to_string());
    let port = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(23);

    let config = ClientConfig::new(host, port);
    println!("connecting to {}", config.address());
    let session = Arc::new(TerminalSession::connect(config).await?);
    println!("connected to {}", session.peer());

    let painter = {
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(250));
            loop {
                interval.tick().await;
                paint(&session).await;
            }
        })
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = session.wait_until_closed() => {
                println!("remote closed the session");
                break;
            }
            line = lines.next_line() => match line? {
                Some(line) => {
                    session.echo(&line).await;
                    session.echo_new_line().await;
                    session.send_line(&line).await?;
                }
                None => break,
            },
        }
    }

    painter.abort();
    session.close().await;
    Ok(())
}

/// Repaints every row containing at least one changed cell.
async fn paint(session: &TerminalSession) {
    let mut rows = Vec::new();
    for row in 0..GRID_ROWS {
        let mut dirty = false;
        for col in 0..GRID_COLS {
            if session.cell_changed(col, row).await {
                dirty = true;
            }
        }
        if dirty {
            let mut text = String::with_capacity(GRID_COLS);
            for col in 0..GRID_COLS {
                text.push(session.char_at(col, row).await);
            }
            rows.push((row, text));
        }
    }
    if rows.is_empty() {
        return;
    }
    let mut stdout = std::io::stdout().lock();
    for (row, text) in rows {
        let _ = writeln!(stdout, "{row:2} |{}|", text.trim_end());
    }
}

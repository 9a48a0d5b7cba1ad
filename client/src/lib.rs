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

//! # Teleterm Client
//!
//! The high-level terminal client: one [`TerminalSession`] per remote host,
//! tying the Telnet filter from `teleterm-telnet` to the screen emulator
//! from `teleterm-screen`. Remote text flows into the screen from a
//! background read loop; option negotiations are refused on the wire and
//! never reach the display.
//!
//! ## Quick Start
//!
//! ```no_run
//! use teleterm_client::{ClientConfig, TerminalSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = TerminalSession::connect(ClientConfig::new("localhost", 23)).await?;
//!     session.send_line("hello").await?;
//!     session.wait_until_closed().await;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod session;

pub use self::config::ClientConfig;
pub use self::error::{ClientError, Result};
pub use self::session::TerminalSession;

pub use teleterm_screen::{CursorPosition, GRID_COLS, GRID_ROWS, Screen};

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

//! # Teleterm Screen Emulator
//!
//! A character-cell terminal emulator over a fixed 80×25 grid. It interprets
//! a clean character stream (Telnet framing already removed) as printable
//! text plus a minimal escape-sequence subset (cursor position `ESC [ .. H`
//! and clear-to-end-of-line `ESC [ .. K`) and maintains the screen buffer,
//! cursor and line-composition state a renderer needs.
//!
//! The emulator knows nothing about sockets: feed it characters from
//! wherever they come. A second, shadow grid answers the per-cell
//! "changed since last render" query, so a renderer walking all cells once
//! per frame redraws each cell exactly once per actual content change.
//!
//! Malformed escape sequences are abandoned silently; nothing here returns
//! an error on input. Out-of-range direct grid access is a programming
//! error and panics.

mod grid;
mod screen;
mod types;

pub use self::grid::{CharGrid, GRID_COLS, GRID_ROWS};
pub use self::screen::{BLINK_TOGGLE_TICKS, Screen};
pub use self::types::CursorPosition;

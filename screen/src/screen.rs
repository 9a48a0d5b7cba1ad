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

use crate::grid::{CharGrid, GRID_COLS, GRID_ROWS};
use crate::types::CursorPosition;
use tracing::debug;

/// Ticks between cursor visibility toggles.
pub const BLINK_TOGGLE_TICKS: u32 = 20;

const ESC: char = '\x1B';
const BS: char = '\x08';

/// Escape-parser state.
///
/// Only the cursor-position (`H`) and clear-to-end-of-line (`K`) sequences
/// are recognized; anything else abandons the sequence and falls back to
/// `Ground` without touching the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EscapeState {
    /// No escape in progress; characters are text and control codes.
    Ground,
    /// ESC seen, waiting for `[`.
    EscapeSeen,
    /// Accumulating the first numeric argument.
    FirstArg(u16),
    /// `;` seen; accumulating the second numeric argument.
    SecondArg(u16, u16),
}

/// The terminal emulator: an 80×25 character grid, cursor, blink state and
/// line-composition buffer driven by one character stream.
///
/// Two entry points share the same mutation logic: [`feed`] for the remote
/// stream (escape sequences included) and [`write_char`]/[`write`] for local
/// echo (ground-state semantics only). A shadow grid answers
/// [`cell_changed`] so a renderer can redraw only what actually changed.
///
/// [`feed`]: Screen::feed
/// [`write_char`]: Screen::write_char
/// [`write`]: Screen::write
/// [`cell_changed`]: Screen::cell_changed
pub struct Screen {
    cells: CharGrid,
    shadow: CharGrid,
    cursor: CursorPosition,
    blink_ticks: u32,
    blink_toggle: u32,
    cursor_visible: bool,
    current_line: String,
    escape: EscapeState,
}

impl Screen {
    /// Creates a blank screen with the default blink cadence.
    pub fn new() -> Screen {
        Self::with_blink_interval(BLINK_TOGGLE_TICKS)
    }

    /// Creates a blank screen toggling cursor visibility every `ticks` ticks.
    ///
    /// # Panics
    /// If `ticks` is zero.
    pub fn with_blink_interval(ticks: u32) -> Screen {
        assert!(ticks > 0, "blink interval must be at least one tick");
        Screen {
            cells: CharGrid::new(),
            shadow: CharGrid::new(),
            cursor: CursorPosition::new(0, 0),
            blink_ticks: 0,
            blink_toggle: ticks,
            cursor_visible: true,
            current_line: String::new(),
            escape: EscapeState::Ground,
        }
    }

    // ===== Remote character feed =====

    /// Feeds a chunk of filtered remote text through the state machine.
    pub fn feed(&mut self, text: &str) {
        for ch in text.chars() {
            self.feed_char(ch);
        }
    }

    /// Feeds one character, escape sequences included.
    pub fn feed_char(&mut self, ch: char) {
        self.escape = match self.escape {
            EscapeState::Ground => {
                if ch == ESC {
                    EscapeState::EscapeSeen
                } else {
                    self.apply_ground(ch);
                    EscapeState::Ground
                }
            }
            EscapeState::EscapeSeen => {
                if ch == '[' {
                    EscapeState::FirstArg(0)
                } else {
                    // Unrecognized escape: dropped, not displayed.
                    debug!("dropping escape introducer {ch:?}");
                    EscapeState::Ground
                }
            }
            EscapeState::FirstArg(first) => self.advance_first_arg(first, ch),
            EscapeState::SecondArg(first, second) => self.advance_second_arg(first, second, ch),
        };
    }

    fn advance_first_arg(&mut self, first: u16, ch: char) -> EscapeState {
        match ch {
            '0'..='9' => EscapeState::FirstArg(accumulate(first, ch)),
            ';' => EscapeState::SecondArg(first, 0),
            'H' => {
                // Single-argument form: the number is a 1-based row, column 0.
                let row = usize::from(first).saturating_sub(1).min(GRID_ROWS - 1);
                self.cursor = CursorPosition::new(0, row);
                EscapeState::Ground
            }
            'K' => {
                self.clear_to_end_of_line();
                EscapeState::Ground
            }
            _ => {
                debug!("abandoning escape sequence at terminator {ch:?}");
                EscapeState::Ground
            }
        }
    }

    fn advance_second_arg(&mut self, first: u16, second: u16, ch: char) -> EscapeState {
        match ch {
            '0'..='9' => EscapeState::SecondArg(first, accumulate(second, ch)),
            'H' => {
                // Observed argument order of the protocol this client speaks:
                // first number is the column, second the row, both 1-based.
                let col = usize::from(first).saturating_sub(1).min(GRID_COLS - 1);
                let row = usize::from(second).saturating_sub(1).min(GRID_ROWS - 1);
                self.cursor = CursorPosition::new(col, row);
                EscapeState::Ground
            }
            'K' => {
                self.clear_to_end_of_line();
                EscapeState::Ground
            }
            _ => {
                debug!("abandoning escape sequence at terminator {ch:?}");
                EscapeState::Ground
            }
        }
    }

    // ===== Local input echo =====

    /// Writes one character with ground-state semantics, backspace included.
    ///
    /// This is the local-echo path: the same mutation logic as the remote
    /// stream, minus escape parsing.
    pub fn write_char(&mut self, ch: char) {
        self.apply_ground(ch);
    }

    /// Writes every character of `text` through [`write_char`](Self::write_char).
    pub fn write(&mut self, text: &str) {
        for ch in text.chars() {
            self.apply_ground(ch);
        }
    }

    fn apply_ground(&mut self, ch: char) {
        match ch {
            '\r' => self.carriage_return(),
            '\n' => self.new_line(),
            BS => self.backspace(),
            ch if ch >= ' ' => self.put_char(ch),
            _ => {} // other control codes carry no meaning here
        }
    }

    fn put_char(&mut self, ch: char) {
        self.cells.set(self.cursor.col, self.cursor.row, ch);
        self.current_line.push(ch);
        self.cursor.col += 1;
        if self.cursor.col == GRID_COLS {
            // Forced wrap: the newline motion without resetting the
            // line-composition buffer.
            self.cursor.col = 0;
            self.advance_row();
        }
    }

    fn backspace(&mut self) {
        self.current_line.pop();
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = GRID_COLS - 1;
        } else {
            // Top-left corner: nothing on screen to blank.
            return;
        }
        self.cells.set(self.cursor.col, self.cursor.row, ' ');
    }

    fn advance_row(&mut self) {
        if self.cursor.row == GRID_ROWS - 1 {
            // Pinned at the bottom: scroll instead of moving.
            self.cells.scroll_up();
        } else {
            self.cursor.row += 1;
        }
    }

    /// Moves to the start of the next row (scrolling at the bottom) and
    /// resets the line-composition buffer.
    pub fn new_line(&mut self) {
        self.current_line.clear();
        self.cursor.col = 0;
        self.advance_row();
    }

    /// Moves the cursor to column 0 of the current row.
    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
    }

    /// Blanks from the cursor column to the end of the row; cursor unmoved.
    pub fn clear_to_end_of_line(&mut self) {
        for col in self.cursor.col..GRID_COLS {
            self.cells.set(col, self.cursor.row, ' ');
        }
    }

    /// Blanks the live grid, homes the cursor, clears the line buffer and
    /// resets the escape parser. The shadow grid is untouched, so the next
    /// render pass sees every previously-occupied cell as changed.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.cursor = CursorPosition::new(0, 0);
        self.current_line.clear();
        self.escape = EscapeState::Ground;
    }

    // ===== Render-facing interface =====

    /// The character at (col, row).
    pub fn char_at(&self, col: usize, row: usize) -> char {
        self.cells.get(col, row)
    }

    /// The full contents of one row, trailing spaces included.
    pub fn row_text(&self, row: usize) -> String {
        self.cells.row_text(row)
    }

    /// Whether the cell at (col, row) changed since it was last reported.
    ///
    /// Mutating query: a `true` answer copies the live cell into the shadow
    /// grid, so with no intervening write the next answer for the same cell
    /// is `false`.
    pub fn cell_changed(&mut self, col: usize, row: usize) -> bool {
        let live = self.cells.get(col, row);
        if live != self.shadow.get(col, row) {
            self.shadow.set(col, row, live);
            true
        } else {
            false
        }
    }

    /// The current cursor position.
    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    /// Cursor column, 0 through 79.
    pub fn cursor_col(&self) -> usize {
        self.cursor.col
    }

    /// Cursor row, 0 through 24.
    pub fn cursor_row(&self) -> usize {
        self.cursor.row
    }

    /// Whether the blinking cursor is visible this frame.
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// The text of the line currently being composed.
    pub fn current_line(&self) -> &str {
        &self.current_line
    }

    /// Advances the blink counter; visibility toggles every
    /// [`BLINK_TOGGLE_TICKS`] calls (or the configured interval).
    /// Call at a fixed external cadence.
    pub fn tick(&mut self) {
        self.blink_ticks += 1;
        if self.blink_ticks >= self.blink_toggle {
            self.blink_ticks = 0;
            self.cursor_visible = !self.cursor_visible;
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("cursor", &self.cursor)
            .field("cursor_visible", &self.cursor_visible)
            .field("escape", &self.escape)
            .field("current_line", &self.current_line)
            .finish()
    }
}

fn accumulate(value: u16, digit: char) -> u16 {
    let digit = digit.to_digit(10).unwrap_or(0) as u16;
    value.saturating_mul(10).saturating_add(digit)
}

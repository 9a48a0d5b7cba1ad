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

/// Grid width in columns.
pub const GRID_COLS: usize = 80;
/// Grid height in rows.
pub const GRID_ROWS: usize = 25;

/// A fixed 80×25 grid of characters, space-initialized.
///
/// Access asserts bounds. Callers clamp cursor coordinates before touching
/// the grid, so an out-of-range index is a programming error, not a
/// recoverable condition.
#[derive(Clone)]
pub struct CharGrid {
    cells: [[char; GRID_COLS]; GRID_ROWS],
}

impl CharGrid {
    /// Creates a blank grid.
    pub fn new() -> CharGrid {
        CharGrid {
            cells: [[' '; GRID_COLS]; GRID_ROWS],
        }
    }

    /// The character at (col, row).
    ///
    /// # Panics
    /// If the coordinates are outside the grid.
    pub fn get(&self, col: usize, row: usize) -> char {
        assert!(
            col < GRID_COLS && row < GRID_ROWS,
            "cell ({col}, {row}) outside the {GRID_COLS}x{GRID_ROWS} grid"
        );
        self.cells[row][col]
    }

    /// Stores a character at (col, row).
    ///
    /// # Panics
    /// If the coordinates are outside the grid.
    pub fn set(&mut self, col: usize, row: usize, ch: char) {
        assert!(
            col < GRID_COLS && row < GRID_ROWS,
            "cell ({col}, {row}) outside the {GRID_COLS}x{GRID_ROWS} grid"
        );
        self.cells[row][col] = ch;
    }

    /// Scrolls the grid up one row: row 0 is discarded, every row shifts up,
    /// and the bottom row is blanked.
    pub fn scroll_up(&mut self) {
        self.cells.copy_within(1..GRID_ROWS, 0);
        self.cells[GRID_ROWS - 1] = [' '; GRID_COLS];
    }

    /// Blanks every cell.
    pub fn clear(&mut self) {
        self.cells = [[' '; GRID_COLS]; GRID_ROWS];
    }

    /// The full contents of one row as a `String` (spaces included).
    pub fn row_text(&self, row: usize) -> String {
        assert!(row < GRID_ROWS, "row {row} outside the grid");
        self.cells[row].iter().collect()
    }
}

impl Default for CharGrid {
    fn default() -> Self {
        Self::new()
    }
}

//! Character-cell screen surface.
//!
//! The grid is the authoritative copy of the live 80x25 screen. While the
//! view is at the bottom (offset 0) every change is mirrored to the
//! hardware [`TextBuffer`] immediately. While scrolled back the hardware
//! shows a composed view of the scrollback ring and is left stale until the
//! view returns to the bottom; any output snaps it back first.

use crate::color::{Cell, Color, Style, SCROLL_INDICATOR};
use crate::scrollback::{Row, Scrollback};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH, SCROLLBACK_LINES, TAB_WIDTH};
use core::fmt;
use myos_hal::TextBuffer;

const BACKSPACE: u8 = 0x08;

/// Glyph written in place of bytes that have no printable form.
const PLACEHOLDER: u8 = 0xfe;

/// The terminal's screen.
pub struct Screen<B> {
    buffer: B,
    grid: [Row; SCREEN_HEIGHT],
    col: usize,
    row: usize,
    style: Style,
    scrollback: Scrollback,
    /// Rows scrolled back from the bottom; 0 is the live view.
    offset: usize,
    scrolls: u64,
}

impl<B: TextBuffer> Screen<B> {
    /// Creates a blank screen drawing to `buffer`.
    ///
    /// Nothing is written to `buffer` until the first output or [`clear`].
    ///
    /// [`clear`]: Screen::clear
    pub const fn new(buffer: B) -> Self {
        Self {
            buffer,
            grid: [[Cell::BLANK; SCREEN_WIDTH]; SCREEN_HEIGHT],
            col: 0,
            row: 0,
            style: Style::DEFAULT,
            scrollback: Scrollback::new(),
            offset: 0,
            scrolls: 0,
        }
    }

    fn blank(&self) -> Cell {
        Cell::blank(self.style)
    }

    /// Blanks the screen and homes the cursor.
    ///
    /// Rows already retired to scrollback are kept.
    pub fn clear(&mut self) {
        let blank = self.blank();
        self.grid = [[blank; SCREEN_WIDTH]; SCREEN_HEIGHT];
        self.col = 0;
        self.row = 0;
        self.offset = 0;
        self.scrollback.reset_live_lengths();
        self.refresh();
    }

    /// Starts retaining scrolled-off rows. Needs the heap.
    pub fn activate_scrollback(&mut self) {
        if self.scrollback.is_active() {
            return;
        }
        self.scrollback.activate(Cell::BLANK);
        log::info!("screen: scrollback active ({} lines)", SCROLLBACK_LINES);
    }

    /// Returns true once scrolled-off rows are retained.
    pub fn is_scrollback_active(&self) -> bool {
        self.scrollback.is_active()
    }

    /// Number of rows held in scrollback.
    pub fn retained_rows(&self) -> usize {
        self.scrollback.retained()
    }

    /// Rows the view is scrolled back by.
    pub fn scroll_offset(&self) -> usize {
        self.offset
    }

    /// Returns true when the live grid is shown.
    pub fn is_at_bottom(&self) -> bool {
        self.offset == 0
    }

    /// Sets the color used by subsequent output.
    pub fn set_color(&mut self, fg: Color, bg: Color) {
        self.style = Style::new(fg, bg);
    }

    /// Current output colors.
    pub fn style(&self) -> Style {
        self.style
    }

    /// Writes one byte at the cursor and advances it.
    pub fn put_char(&mut self, c: u8) {
        if self.offset != 0 {
            self.scroll_to_bottom();
        }

        match c {
            b'\n' => {
                self.col = 0;
                self.row += 1;
            }
            b'\r' => self.col = 0,
            b'\t' => self.col = (self.col + TAB_WIDTH) & !(TAB_WIDTH - 1),
            BACKSPACE => {
                if self.col > 0 {
                    self.col -= 1;
                    self.set_cell(self.col, self.row, self.blank());
                    let slot = self.current_row_storage_index();
                    let len = self.scrollback.line_length(slot).min(self.col);
                    self.scrollback.set_line_length(slot, len);
                }
            }
            _ => {
                self.set_cell(self.col, self.row, Cell::new(c, self.style));
                let slot = self.current_row_storage_index();
                self.scrollback.set_line_length(slot, self.col + 1);
                self.col += 1;
            }
        }

        if self.col >= SCREEN_WIDTH {
            self.col = 0;
            self.row += 1;
        }
        if self.row >= SCREEN_HEIGHT {
            self.scroll();
        }
    }

    /// Writes a string. Bytes outside printable ASCII and the handled
    /// control characters are shown as a placeholder block.
    pub fn write(&mut self, s: &str) {
        for byte in s.bytes() {
            match byte {
                0x20..=0x7e | b'\n' | b'\r' | b'\t' | BACKSPACE => self.put_char(byte),
                _ => self.put_char(PLACEHOLDER),
            }
        }
    }

    /// Writes `s` in the given colors, then restores the previous ones.
    pub fn write_color(&mut self, s: &str, fg: Color, bg: Color) {
        let saved = self.style;
        self.set_color(fg, bg);
        self.write(s);
        self.style = saved;
    }

    /// Cursor position as `(column, row)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.col, self.row)
    }

    /// Moves the cursor, clamping to the grid.
    pub fn set_cursor(&mut self, col: usize, row: usize) {
        self.col = col.min(SCREEN_WIDTH - 1);
        self.row = row.min(SCREEN_HEIGHT - 1);
    }

    /// Ring slot tracking the cursor's row.
    pub fn current_row_storage_index(&self) -> usize {
        self.scrollback.slot_for_live_row(self.row)
    }

    /// Stored line length of the cursor's row.
    pub fn line_length(&self) -> usize {
        self.scrollback.line_length(self.current_row_storage_index())
    }

    /// Blanks the cursor's row and forgets its length. The cursor stays.
    pub fn clear_current_line(&mut self) {
        let blank = self.blank();
        let slot = self.current_row_storage_index();
        self.grid[self.row] = [blank; SCREEN_WIDTH];
        self.scrollback.clear_slot(slot, blank);
        self.refresh();
    }

    /// Pages the view one row back (`delta > 0`) or forward (`delta < 0`).
    ///
    /// Clamped to the retained rows. Always repaints.
    pub fn scroll_view(&mut self, delta: isize) {
        if !self.scrollback.is_active() {
            return;
        }
        if delta > 0 && self.offset < self.scrollback.retained() {
            self.offset += 1;
        } else if delta < 0 && self.offset > 0 {
            self.offset -= 1;
        }
        self.refresh();
    }

    /// Returns to the live view.
    pub fn scroll_to_bottom(&mut self) {
        if self.offset != 0 {
            self.offset = 0;
            self.refresh();
        }
    }

    /// Swaps foreground and background of the hardware cell under the
    /// cursor. Two calls restore it.
    pub fn invert_cursor_cell(&mut self) {
        let index = self.row * SCREEN_WIDTH + self.col;
        let cell = Cell::from_vga(self.buffer.read_cell(index));
        let inverted = Cell::new(cell.ch, cell.style.inverted());
        self.buffer.write_cell(index, inverted.to_vga());
    }

    /// Cell at `(col, row)` of the live grid.
    pub fn cell_at(&self, col: usize, row: usize) -> Option<Cell> {
        self.grid.get(row)?.get(col).copied()
    }

    /// Number of times the grid has scrolled since boot.
    pub fn scrolls(&self) -> u64 {
        self.scrolls
    }

    /// The hardware surface.
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    fn set_cell(&mut self, col: usize, row: usize, cell: Cell) {
        self.grid[row][col] = cell;
        if self.offset == 0 {
            self.buffer.write_cell(row * SCREEN_WIDTH + col, cell.to_vga());
        }
    }

    fn scroll(&mut self) {
        let top = self.grid[0];
        self.scrollback.retire(&top);
        self.grid.copy_within(1.., 0);
        self.grid[SCREEN_HEIGHT - 1] = [self.blank(); SCREEN_WIDTH];
        self.row = SCREEN_HEIGHT - 1;
        self.scrolls += 1;
        if self.offset == 0 {
            self.refresh();
        }
    }

    fn draw_row(&mut self, y: usize, row: &Row) {
        for (x, cell) in row.iter().enumerate() {
            self.buffer.write_cell(y * SCREEN_WIDTH + x, cell.to_vga());
        }
    }

    /// Repaints the hardware surface for the current offset.
    fn refresh(&mut self) {
        if self.offset == 0 {
            for y in 0..SCREEN_HEIGHT {
                let row = self.grid[y];
                self.draw_row(y, &row);
            }
            return;
        }

        let retained = self.scrollback.retained();
        let top = retained - self.offset;
        for y in 0..SCREEN_HEIGHT {
            let source = top + y;
            let row = match source.checked_sub(retained) {
                Some(live) => self.grid[live],
                None => match self.scrollback.row(source) {
                    Some(row) => *row,
                    None => continue,
                },
            };
            self.draw_row(y, &row);
        }
        self.buffer
            .write_cell(SCREEN_WIDTH - 1, SCROLL_INDICATOR.to_vga());
    }
}

impl<B: TextBuffer> fmt::Write for Screen<B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockBuffer;

    /// Hardware row text with the scroll indicator stripped.
    fn shown(s: &Screen<MockBuffer>, row: usize) -> String {
        let text = s.buffer().row_text(row);
        text.trim_end_matches('^').trim_end().into()
    }

    fn screen() -> Box<Screen<MockBuffer>> {
        let mut screen = Box::new(Screen::new(MockBuffer::new()));
        screen.clear();
        screen
    }

    fn active_screen() -> Box<Screen<MockBuffer>> {
        let mut screen = screen();
        screen.activate_scrollback();
        screen
    }

    #[test]
    fn test_write_mirrors_to_hardware() {
        let mut s = screen();
        s.write("hello\nworld");
        assert_eq!(s.buffer().row_text(0), "hello");
        assert_eq!(s.buffer().row_text(1), "world");
        assert_eq!(s.cursor(), (5, 1));
        assert_eq!(s.line_length(), 5);
        assert_eq!(s.buffer().cells[0], 0x0768);
    }

    #[test]
    fn test_control_characters() {
        let mut s = screen();
        s.write("ab\tc");
        assert_eq!(s.cursor(), (5, 0));
        assert_eq!(s.cell_at(4, 0).map(|c| c.ch), Some(b'c'));

        s.write("\rX");
        assert_eq!(s.buffer().row_text(0), "Xb  c");

        s.write("\x08\x08");
        assert_eq!(s.cursor(), (0, 0));
        assert_eq!(s.buffer().row_text(0), " b  c");
        assert_eq!(s.line_length(), 0);

        s.write("\x08");
        assert_eq!(s.cursor(), (0, 0));

        s.write("\u{1}");
        assert_eq!(s.cell_at(0, 0).map(|c| c.ch), Some(0xfe));
    }

    #[test]
    fn test_backspace_shortens_line_length() {
        let mut s = screen();
        s.write("abcdef");
        s.set_cursor(3, 0);
        s.put_char(0x08);
        assert_eq!(s.line_length(), 2);
        assert_eq!(s.buffer().row_text(0), "ab def");
    }

    #[test]
    fn test_long_line_wraps() {
        let mut s = screen();
        let line: String = "x".repeat(SCREEN_WIDTH + 3);
        s.write(&line);
        assert_eq!(s.cursor(), (3, 1));
        assert_eq!(s.buffer().row_text(1), "xxx");
    }

    #[test]
    fn test_scrolling_without_scrollback_drops_rows() {
        let mut s = screen();
        for i in 0..30 {
            s.write(&format!("line {}\n", i));
        }
        assert_eq!(s.retained_rows(), 0);
        assert_eq!(s.scrolls(), 6);
        assert_eq!(s.buffer().row_text(0), "line 6");
        assert_eq!(s.cursor(), (0, SCREEN_HEIGHT - 1));

        s.scroll_view(1);
        assert_eq!(s.scroll_offset(), 0);
    }

    #[test]
    fn test_scrollback_keeps_newest_rows() {
        let mut s = active_screen();
        for i in 0..300 {
            s.write(&format!("L{}\n", i));
        }
        assert_eq!(s.scrolls(), 276);
        assert_eq!(s.retained_rows(), SCROLLBACK_LINES);

        for _ in 0..SCROLLBACK_LINES {
            s.scroll_view(1);
        }
        assert_eq!(s.scroll_offset(), SCROLLBACK_LINES);
        assert_eq!(shown(&s, 0), "L76");
        assert_eq!(shown(&s, 1), "L77");
        assert_eq!(shown(&s, 24), "L100");
        assert_eq!(s.buffer().cells[SCREEN_WIDTH - 1], SCROLL_INDICATOR.to_vga());
    }

    #[test]
    fn test_scroll_view_composes_ring_and_grid() {
        let mut s = active_screen();
        for i in 0..30 {
            s.write(&format!("L{}\n", i));
        }
        assert_eq!(s.retained_rows(), 6);

        s.scroll_view(1);
        s.scroll_view(1);
        assert!(!s.is_at_bottom());
        assert_eq!(shown(&s, 0), "L4");
        assert_eq!(shown(&s, 1), "L5");
        assert_eq!(shown(&s, 2), "L6");
        assert_eq!(s.buffer().cells[SCREEN_WIDTH - 1], SCROLL_INDICATOR.to_vga());

        s.scroll_view(-1);
        assert_eq!(shown(&s, 0), "L5");
        s.scroll_view(-1);
        assert!(s.is_at_bottom());
        assert_eq!(s.buffer().row_text(0), "L6");
    }

    #[test]
    fn test_scroll_view_at_top_still_repaints() {
        let mut s = active_screen();
        for i in 0..26 {
            s.write(&format!("L{}\n", i));
        }
        s.scroll_view(5);
        s.scroll_view(5);
        s.scroll_view(5);
        assert_eq!(s.scroll_offset(), 2);

        s.buffer.cells[0] = 0;
        s.buffer.cells[SCREEN_WIDTH - 1] = 0;
        s.scroll_view(1);
        assert_eq!(s.scroll_offset(), 2);
        assert_eq!(shown(&s, 0), "L0");
        assert_eq!(s.buffer().cells[SCREEN_WIDTH - 1], SCROLL_INDICATOR.to_vga());
    }

    #[test]
    fn test_output_snaps_back_to_live_view() {
        let mut s = active_screen();
        for i in 0..40 {
            s.write(&format!("L{}\n", i));
        }
        s.scroll_view(1);
        s.scroll_view(1);
        s.put_char(b'z');
        assert!(s.is_at_bottom());
        assert_eq!(s.buffer().row_text(0), "L16");
        assert_eq!(s.buffer().row_text(24), "z");
    }

    #[test]
    fn test_scrolled_view_stays_stale_on_scroll() {
        let mut s = active_screen();
        for i in 0..30 {
            s.write(&format!("L{}\n", i));
        }
        s.scroll_view(1);
        let shown = s.buffer().row_text(0);
        // Direct grid scroll while scrolled back does not repaint.
        s.scroll();
        assert_eq!(s.buffer().row_text(0), shown);
        assert_eq!(s.retained_rows(), 7);
    }

    #[test]
    fn test_clear_current_line() {
        let mut s = active_screen();
        s.set_color(Color::White, Color::Blue);
        s.write("first\nsecond");
        s.clear_current_line();

        assert_eq!(s.line_length(), 0);
        let blank = Cell::blank(Style::new(Color::White, Color::Blue));
        for col in 0..SCREEN_WIDTH {
            assert_eq!(s.cell_at(col, 1), Some(blank));
        }
        assert_eq!(s.buffer().row_text(0), "first");
        assert_eq!(s.buffer().row_text(1), "");
    }

    #[test]
    fn test_line_lengths_follow_rows_through_scrolls() {
        let mut s = active_screen();
        for _ in 0..SCREEN_HEIGHT - 1 {
            s.write("\n");
        }
        s.write("abc");
        s.write("\n");
        s.set_cursor(0, SCREEN_HEIGHT - 2);
        assert_eq!(s.line_length(), 3);
        s.set_cursor(0, SCREEN_HEIGHT - 1);
        assert_eq!(s.line_length(), 0);
    }

    #[test]
    fn test_invert_cursor_cell_twice_is_identity() {
        let mut s = screen();
        s.write("a");
        s.set_cursor(0, 0);
        let before = s.buffer().cells[0];

        s.invert_cursor_cell();
        assert_eq!(s.buffer().cells[0], 0x7061);
        s.invert_cursor_cell();
        assert_eq!(s.buffer().cells[0], before);
    }

    #[test]
    fn test_write_color_restores_style() {
        let mut s = screen();
        s.write_color("ok", Color::LightGreen, Color::Black);
        assert_eq!(s.style(), Style::DEFAULT);
        assert_eq!(
            s.cell_at(0, 0).map(|c| c.style),
            Some(Style::new(Color::LightGreen, Color::Black))
        );
    }

    #[test]
    fn test_set_cursor_clamps() {
        let mut s = screen();
        s.set_cursor(500, 500);
        assert_eq!(s.cursor(), (SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1));
    }

    #[test]
    fn test_clear_keeps_scrollback() {
        let mut s = active_screen();
        for i in 0..30 {
            s.write(&format!("L{}\n", i));
        }
        s.clear();
        assert_eq!(s.retained_rows(), 6);
        assert_eq!(s.cursor(), (0, 0));
        assert_eq!(s.buffer().row_text(0), "");
    }
}
